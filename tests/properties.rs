use proptest::prelude::*;
use serde_json::Value;

use cborlog::{Error, Options, decode::Transcoder, decode_if_binary_to_string};

fn transcode(bytes: &[u8]) -> Result<String, Error> {
    let options = Options::default();
    let mut t = Transcoder::new(bytes, Vec::new(), &options);
    t.decode_object()?;
    Ok(String::from_utf8(t.into_writer()).unwrap())
}

fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    ciborium::into_writer(value, &mut out).unwrap();
    out
}

/// Encode with break-terminated arrays and maps, as the log encoder does.
fn encode_indefinite(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Array(items) => {
            out.push(0x9f);
            for item in items {
                encode_indefinite(item, out);
            }
            out.push(0xff);
        }
        Value::Object(entries) => {
            out.push(0xbf);
            for (key, value) in entries {
                ciborium::into_writer(key, &mut *out).unwrap();
                encode_indefinite(value, out);
            }
            out.push(0xff);
        }
        leaf => ciborium::into_writer(leaf, &mut *out).unwrap(),
    }
}

/// JSON documents without floats (the reference encoder shrinks floats to
/// half precision, which the log encoder never emits).
fn json_tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        "[a-zA-Z0-9 _\"\\\\\t\n\r/é世-]{0,12}".prop_map(Value::String),
    ];

    leaf.prop_recursive(6, 64, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn json_record() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,6}", json_tree(), 1..6)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

proptest! {
    #[test]
    fn signed_integers_render_as_decimal(n in any::<i64>()) {
        prop_assert_eq!(transcode(&encode(&Value::from(n))).unwrap(), n.to_string());
    }

    #[test]
    fn unsigned_integers_render_as_decimal(n in any::<u64>()) {
        prop_assert_eq!(transcode(&encode(&Value::from(n))).unwrap(), n.to_string());
    }

    #[test]
    fn doubles_render_shortest_round_trip(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let mut bytes = vec![0xfb];
        bytes.extend(v.to_be_bytes());

        let text = transcode(&bytes).unwrap();
        prop_assert!(!text.contains(['e', 'E']));
        prop_assert_eq!(text.parse::<f64>().unwrap().to_bits(), v.to_bits());
        prop_assert_eq!(text, v.to_string());
    }

    #[test]
    fn singles_render_shortest_round_trip(v in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
        let mut bytes = vec![0xfa];
        bytes.extend(v.to_be_bytes());

        let text = transcode(&bytes).unwrap();
        prop_assert!(!text.contains(['e', 'E']));
        prop_assert_eq!(text.parse::<f32>().unwrap().to_bits(), v.to_bits());
        prop_assert_eq!(text, v.to_string());
    }

    #[test]
    fn definite_documents_match_json_encoder(value in json_tree()) {
        let text = transcode(&encode(&value)).unwrap();
        prop_assert_eq!(text, serde_json::to_string(&value).unwrap());
    }

    #[test]
    fn indefinite_documents_match_json_encoder(value in json_tree()) {
        let mut bytes = Vec::new();
        encode_indefinite(&value, &mut bytes);

        let text = transcode(&bytes).unwrap();
        prop_assert_eq!(text, serde_json::to_string(&value).unwrap());
    }

    #[test]
    fn record_streams_decode_line_by_line(records in prop::collection::vec(json_record(), 1..4)) {
        let mut bytes = Vec::new();
        for record in &records {
            encode_indefinite(record, &mut bytes);
        }

        let text = decode_if_binary_to_string(&bytes, &Options::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        prop_assert!(text.ends_with('\n'));
        prop_assert_eq!(lines.len(), records.len());
        for (line, record) in lines.iter().zip(&records) {
            prop_assert_eq!(serde_json::from_str::<Value>(line).unwrap(), record.clone());
        }
    }

    #[test]
    fn truncated_records_are_errors(record in json_record(), cut in any::<prop::sample::Index>()) {
        let mut bytes = Vec::new();
        encode_indefinite(&record, &mut bytes);

        let end = 1 + cut.index(bytes.len() - 1);
        let e = decode_if_binary_to_string(&bytes[..end], &Options::default()).unwrap_err();
        prop_assert!(e.error.is_malformed_input());
    }
}
