use crate::segment::{
    BuildError, MAX_VERSION, RUDP_VERSION, SYN_HEADER_LEN, Segment, SegmentKind, SynParameters,
};

#[test]
fn syn_parameters_occupy_fixed_offsets() {
    let syn = Segment::syn(7, SynParameters::default()).expect("syn");
    assert_eq!(syn.header_length() as usize, SYN_HEADER_LEN);
    assert_eq!(syn.length() as usize, SYN_HEADER_LEN);

    let bytes = syn.to_bytes();
    assert_eq!(bytes.len(), 22);
    assert_eq!(&bytes[..4], &[0x80, 22, 7, 0]);
    assert_eq!(bytes[4], RUDP_VERSION << 4);
    assert_eq!(bytes[5], 3, "max outstanding segments");
    assert_eq!(bytes[6], 0x01, "option flags");
    assert_eq!(bytes[7], 0, "spare");
    assert_eq!(&bytes[8..10], &128u16.to_be_bytes());
    assert_eq!(&bytes[10..12], &600u16.to_be_bytes());
    assert_eq!(&bytes[12..14], &300u16.to_be_bytes());
    assert_eq!(&bytes[14..16], &2000u16.to_be_bytes());
    assert_eq!(&bytes[16..20], &[3, 3, 3, 3]);
    assert_eq!(&bytes[20..22], &[0, 0], "checksum placeholder");
}

#[test]
fn syn_parameters_decode_field_by_field() {
    let params = SynParameters {
        version: 1,
        max_outstanding_segs: 16,
        option_flags: 0x03,
        max_segment_size: 1400,
        retransmission_timeout_ms: 1000,
        cumulative_ack_timeout_ms: 150,
        null_segment_timeout_ms: 0,
        max_retrans: 0,
        max_cumulative_acks: 8,
        max_out_of_sequence: 12,
        max_auto_reset: 255,
    };
    let wire = Segment::syn(42, params).expect("syn").to_bytes_with_checksum();

    let decoded = Segment::parse(&wire).expect("valid SYN");
    assert_eq!(decoded.kind(), SegmentKind::Syn);
    assert_eq!(decoded.sequence_number(), 42);
    assert_eq!(decoded.acknowledgment_number(), None);
    assert_eq!(decoded.syn_parameters(), Some(&params));
    assert_eq!(decoded.describe(), "SYN [ SEQ = 42, ACK = N/A, LEN = 22 ]");
}

#[test]
fn spare_bits_are_ignored_on_decode() {
    let mut wire = Segment::syn(1, SynParameters::default())
        .expect("syn")
        .to_bytes();
    wire[4] |= 0x0f;
    wire[7] = 0xaa;
    let sum = crate::segment::checksum(&wire);
    wire[20..22].copy_from_slice(&sum.to_be_bytes());

    let decoded = Segment::parse(&wire).expect("valid SYN");
    assert_eq!(decoded.syn_parameters(), Some(&SynParameters::default()));
}

#[test]
fn non_syn_segments_have_no_parameters() {
    assert!(Segment::ack(1, 1).syn_parameters().is_none());
}

#[test]
fn version_must_fit_its_nibble() {
    let params = SynParameters {
        version: 0x12,
        ..SynParameters::default()
    };
    assert_eq!(
        Segment::syn(1, params),
        Err(BuildError::VersionOutOfRange { version: 0x12 })
    );

    // 最大可表示版本仍能原样往返
    let params = SynParameters {
        version: MAX_VERSION,
        ..SynParameters::default()
    };
    let syn = Segment::syn(1, params).expect("largest version");
    let wire = syn.to_bytes_with_checksum();
    assert_eq!(wire[4], 0xf0);
    let decoded = Segment::parse(&wire).expect("valid SYN");
    assert_eq!(decoded, syn);
    assert_eq!(decoded.syn_parameters().map(|p| p.version), Some(MAX_VERSION));
}
