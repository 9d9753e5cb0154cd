use chrono::FixedOffset;

use cborlog::{Error, Options, TimeFormat, decode::Transcoder};

fn transcode_with(bytes: &[u8], options: &Options) -> Result<String, Error> {
    let mut t = Transcoder::new(bytes, Vec::new(), options);
    t.decode_object()?;
    Ok(String::from_utf8(t.into_writer()).unwrap())
}

fn transcode(bytes: &[u8]) -> Result<String, Error> {
    transcode_with(bytes, &Options::default())
}

/// 2020-09-13T12:26:40Z as integer seconds.
const INTEGER_TIMESTAMP: &[u8] = &[0xc1, 0x1a, 0x5f, 0x5e, 0x10, 0x00];

fn float_timestamp(secs: f64) -> Vec<u8> {
    let mut bytes = vec![0xc1, 0xfb];
    bytes.extend(secs.to_be_bytes());
    bytes
}

#[test]
fn timestamp_integer() {
    let text = transcode(INTEGER_TIMESTAMP).unwrap();
    assert_eq!(text, "\"2020-09-13T12:26:40Z\"");
}

#[test]
fn timestamp_float() {
    let text = transcode(&float_timestamp(1_600_000_000.5)).unwrap();
    assert_eq!(text, "\"2020-09-13T12:26:40.5Z\"");
}

#[test]
fn timestamp_float_whole_seconds() {
    let text = transcode(&float_timestamp(1_600_000_000.0)).unwrap();
    assert_eq!(text, "\"2020-09-13T12:26:40Z\"");
}

#[test]
fn timestamp_float_single_precision() {
    let mut bytes = vec![0xc1, 0xfa];
    bytes.extend(1.25f32.to_be_bytes());
    let text = transcode(&bytes).unwrap();
    assert_eq!(text, "\"1970-01-01T00:00:01.25Z\"");
}

#[test]
fn timestamp_float_before_epoch() {
    let text = transcode(&float_timestamp(-1.5)).unwrap();
    assert_eq!(text, "\"1969-12-31T23:59:58.5Z\"");
}

#[test]
fn timestamp_negative_integer() {
    let text = transcode(&[0xc1, 0x20]).unwrap();
    assert_eq!(text, "\"1969-12-31T23:59:59Z\"");
}

#[test]
fn timestamp_time_zone() {
    let options = Options::default().with_time_zone(FixedOffset::east_opt(2 * 3600).unwrap());

    let text = transcode_with(INTEGER_TIMESTAMP, &options).unwrap();
    assert_eq!(text, "\"2020-09-13T14:26:40+02:00\"");

    let text = transcode_with(&float_timestamp(1_600_000_000.25), &options).unwrap();
    assert_eq!(text, "\"2020-09-13T14:26:40.25+02:00\"");
}

#[test]
fn timestamp_granularities_differ() {
    let integer = transcode(INTEGER_TIMESTAMP).unwrap();
    let float = transcode(&float_timestamp(1_600_000_000.125)).unwrap();

    assert!(!integer.contains('.'));
    assert_eq!(float, "\"2020-09-13T12:26:40.125Z\"");
}

#[test]
fn timestamp_custom_formats() {
    let options = Options::default()
        .with_integer_time_format(TimeFormat::strftime("%Y/%m/%d %H:%M").unwrap())
        .with_nano_time_format(TimeFormat::Rfc3339);

    let text = transcode_with(INTEGER_TIMESTAMP, &options).unwrap();
    assert_eq!(text, "\"2020/09/13 12:26\"");

    let text = transcode_with(&float_timestamp(1_600_000_000.5), &options).unwrap();
    assert_eq!(text, "\"2020-09-13T12:26:40Z\"");
}

#[test]
fn timestamp_invalid_format_rejected() {
    let e = TimeFormat::strftime("%Y-%").unwrap_err();
    assert_eq!(e.0, "%Y-%");
}

#[test]
fn timestamp_format_keeps_valid_pattern() {
    match TimeFormat::strftime("%H:%M").unwrap() {
        TimeFormat::Strftime(pattern) => assert_eq!(pattern.as_str(), "%H:%M"),
        other => panic!("unexpected format {other:?}"),
    }
}

#[test]
fn timestamp_invalid_payloads() {
    assert!(matches!(transcode(&[0xc1, 0x61, b'x']), Err(Error::InvalidTimestampEncoding)));
    assert!(matches!(
        transcode(&[0xc1, 0xfb, 0x7f, 0xf8, 0, 0, 0, 0, 0, 0]),
        Err(Error::InvalidTimestampEncoding)
    ));
    // Beyond i64 seconds.
    assert!(matches!(
        transcode(&[0xc1, 0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        Err(Error::InvalidTimestampEncoding)
    ));
}

#[test]
fn network_address_ipv4() {
    let text = transcode(&[0xd9, 0x01, 0x04, 0x44, 192, 168, 1, 1]).unwrap();
    assert_eq!(text, "\"192.168.1.1\"");
}

#[test]
fn network_address_ipv6() {
    let mut bytes = vec![0xd9, 0x01, 0x04, 0x50];
    bytes.extend("2001:db8::1".parse::<std::net::Ipv6Addr>().unwrap().octets());
    assert_eq!(transcode(&bytes).unwrap(), "\"2001:db8::1\"");
}

#[test]
fn network_address_ipv4_mapped() {
    let mut bytes = vec![0xd9, 0x01, 0x04, 0x50];
    bytes.extend("::ffff:10.0.0.1".parse::<std::net::Ipv6Addr>().unwrap().octets());
    assert_eq!(transcode(&bytes).unwrap(), "\"10.0.0.1\"");
}

#[test]
fn network_address_mac() {
    let bytes = [0xd9, 0x01, 0x04, 0x46, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab];
    assert_eq!(transcode(&bytes).unwrap(), "\"01:23:45:67:89:ab\"");
}

#[test]
fn network_address_bad_length() {
    let bytes = [0xd9, 0x01, 0x04, 0x45, 1, 2, 3, 4, 5];
    assert!(matches!(transcode(&bytes), Err(Error::InvalidNetworkAddressLength(5))));
}

#[test]
fn network_prefix_ipv4() {
    let bytes = [0xd9, 0x01, 0x05, 0xa1, 0x44, 192, 168, 0, 0, 0x18, 24];
    assert_eq!(transcode(&bytes).unwrap(), "\"192.168.0.0/24\"");
}

#[test]
fn network_prefix_ipv6() {
    let mut bytes = vec![0xd9, 0x01, 0x05, 0xa1, 0x50];
    bytes.extend("2001:db8::".parse::<std::net::Ipv6Addr>().unwrap().octets());
    bytes.extend([0x18, 32]);
    assert_eq!(transcode(&bytes).unwrap(), "\"2001:db8::/32\"");
}

#[test]
fn network_prefix_invalid_structure() {
    // Not a one-entry map.
    let bytes = [0xd9, 0x01, 0x05, 0xa2, 0x44, 10, 0, 0, 0, 0x08];
    assert!(matches!(transcode(&bytes), Err(Error::InvalidNetworkPrefixStructure)));

    // Prefix longer than the address.
    let bytes = [0xd9, 0x01, 0x05, 0xa1, 0x44, 10, 0, 0, 0, 0x18, 33];
    assert!(matches!(transcode(&bytes), Err(Error::InvalidNetworkPrefixStructure)));

    // Address of the wrong length.
    let bytes = [0xd9, 0x01, 0x05, 0xa1, 0x43, 10, 0, 0, 0x08];
    assert!(matches!(transcode(&bytes), Err(Error::InvalidNetworkAddressLength(3))));
}

#[test]
fn embedded_json() {
    let mut bytes = vec![0xd9, 0x01, 0x06, 0x47];
    bytes.extend(br#"{"a":1}"#);
    assert_eq!(transcode(&bytes).unwrap(), r#"{"a":1}"#);
}

#[test]
fn embedded_json_requires_byte_string() {
    let bytes = [0xd9, 0x01, 0x06, 0x62, b'{', b'}'];
    assert!(matches!(transcode(&bytes), Err(Error::InvalidMajorType { .. })));
}

#[test]
fn hex_string() {
    let bytes = [0xd9, 0x01, 0x07, 0x43, 0xde, 0xad, 0x01];
    assert_eq!(transcode(&bytes).unwrap(), "\"dead01\"");
}

#[test]
fn unsupported_tags() {
    assert!(matches!(transcode(&[0xc2, 0x40]), Err(Error::UnsupportedTagCode(2))));
    assert!(matches!(
        transcode(&[0xd9, 0x01, 0x08, 0x40]),
        Err(Error::UnsupportedTagCode(264))
    ));
}

#[test]
fn tags_inside_records() {
    let mut bytes = vec![0xbf, 0x64, b't', b'i', b'm', b'e'];
    bytes.extend(INTEGER_TIMESTAMP);
    bytes.extend([0x62, b'i', b'p', 0xd9, 0x01, 0x04, 0x44, 127, 0, 0, 1, 0xff]);

    let text = transcode(&bytes).unwrap();
    assert_eq!(text, r#"{"time":"2020-09-13T12:26:40Z","ip":"127.0.0.1"}"#);
}
