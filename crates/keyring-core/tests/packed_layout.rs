//! # Packed Layout Conformance
//!
//! Hardcoded vectors pinning the packed encoding byte-for-byte. A verifier
//! contract reconstructs exactly these bytes before checking the RSA
//! signature, so any drift here breaks every emitted fixture.

use keyring_core::{
    encode_packed, CredentialFields, EncodingError, PackedMessage, RawCredentialFields,
    FIXED_PREFIX_LEN,
};
use num_bigint::BigInt;

fn reference_fields() -> RawCredentialFields {
    RawCredentialFields {
        trading_address: "0x0123456789abcDEF0123456789abCDef01234567".to_string(),
        policy_id: 123_456,
        create_before: 1_625_247_600,
        valid_until: 1_627_849_600,
        cost: BigInt::from(1_000_000_000_000_000_000u64),
        backdoor: b"example_backdoor_data".to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Vector 1: reference credential
// ---------------------------------------------------------------------------

#[test]
fn reference_credential_layout() {
    let msg = encode_packed(&reference_fields()).expect("reference fields encode");
    let bytes = msg.as_bytes();

    assert_eq!(bytes.len(), 52 + 21);
    assert_eq!(bytes[20], 0x00, "reserved byte at offset 20");
    assert_eq!(&bytes[21..24], &[0x01, 0xE2, 0x40], "policy id 123456");
    assert_eq!(&bytes[52..], b"example_backdoor_data");
}

// ---------------------------------------------------------------------------
// Vector 2: all-zero fields, empty backdoor
// ---------------------------------------------------------------------------

#[test]
fn zero_credential_is_address_then_zeros() {
    let raw = RawCredentialFields {
        trading_address: format!("0x{}", "ff".repeat(20)),
        policy_id: 0,
        create_before: 0,
        valid_until: 0,
        cost: BigInt::from(0u8),
        backdoor: Vec::new(),
    };
    let msg = encode_packed(&raw).unwrap();
    assert_eq!(msg.len(), FIXED_PREFIX_LEN);
    assert_eq!(&msg.as_bytes()[..20], &[0xff; 20]);
    assert!(msg.as_bytes()[20..].iter().all(|b| *b == 0));
}

// ---------------------------------------------------------------------------
// Vector 3: every fixed-width field at its maximum
// ---------------------------------------------------------------------------

#[test]
fn saturated_credential() {
    let raw = RawCredentialFields {
        trading_address: format!("0x{}", "00".repeat(20)),
        policy_id: (1 << 24) - 1,
        create_before: u32::MAX.into(),
        valid_until: u32::MAX.into(),
        cost: (BigInt::from(1u8) << 160usize) - 1u8,
        backdoor: vec![0xAA],
    };
    let msg = encode_packed(&raw).unwrap();
    let bytes = msg.as_bytes();
    assert_eq!(bytes[20], 0x00);
    assert!(bytes[21..52].iter().all(|b| *b == 0xff));
    assert_eq!(bytes[52], 0xAA);
}

// ---------------------------------------------------------------------------
// Width enforcement
// ---------------------------------------------------------------------------

#[test]
fn each_overflow_is_an_encoding_error() {
    let cases: [(&str, fn(&mut RawCredentialFields)); 4] = [
        ("policy_id", |r| r.policy_id = 1 << 24),
        ("create_before", |r| r.create_before = 1 << 32),
        ("valid_until", |r| r.valid_until = 1 << 32),
        ("cost", |r| r.cost = BigInt::from(1u8) << 160usize),
    ];
    for (name, mutate) in cases {
        let mut raw = reference_fields();
        mutate(&mut raw);
        match encode_packed(&raw) {
            Err(EncodingError::FieldOutOfRange { field, .. }) => assert_eq!(field, name),
            other => panic!("{name}: expected FieldOutOfRange, got {other:?}"),
        }
    }
}

#[test]
fn short_and_long_addresses_rejected() {
    let too_long = format!("0x{}", "11".repeat(21));
    for addr in ["0x", "0x00", too_long.as_str()] {
        let mut raw = reference_fields();
        raw.trading_address = addr.to_string();
        assert!(
            matches!(encode_packed(&raw), Err(EncodingError::InvalidAddress(_))),
            "address {addr} should be rejected"
        );
    }
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn repeated_encoding_is_byte_identical() {
    let fields = reference_fields().validate().unwrap();
    let first = PackedMessage::encode(&fields);
    for _ in 0..10 {
        assert_eq!(PackedMessage::encode(&fields), first);
    }
    assert_eq!(CredentialFields::decode(first.as_bytes()).unwrap(), fields);
}
