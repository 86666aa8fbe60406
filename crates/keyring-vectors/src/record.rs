//! # Signed Vector Records
//!
//! One JSON object per generated vector:
//!
//! ```json
//! {
//!   "tradingAddress": "0x0123...4567",
//!   "policyId": 123456,
//!   "createBefore": 1625247600,
//!   "validUntil": 1627849600,
//!   "cost": 1000000000000000000,
//!   "backdoor": "0x6578...",
//!   "key": "0xc3a1...",
//!   "signature": "0x5e0f...",
//!   "expected": true
//! }
//! ```
//!
//! Records keep their fields in raw form. A hand-written record with
//! `expected: false` may hold an out-of-range value, non-hex backdoor text
//! or a malformed key, and it must still load so that re-verification can
//! report on it. Numbers are integers of any size and are written as bare
//! JSON numbers (see [`json_integer`](crate::json_integer)). The backdoor
//! is kept as text until it is re-encoded.

use keyring_core::fields::{POLICY_ID_LEN, TIMESTAMP_LEN};
use keyring_core::{
    hexstr, CredentialFields, EncodingError, PackedMessage, RawCredentialFields,
};
use keyring_crypto::{
    verify_hex, CredentialPublicKey, CredentialSignature, VerificationError, DIGEST_LEN,
};
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A single test vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedVector {
    pub trading_address: String,
    #[serde(with = "crate::json_integer")]
    pub policy_id: BigInt,
    #[serde(with = "crate::json_integer")]
    pub create_before: BigInt,
    #[serde(with = "crate::json_integer")]
    pub valid_until: BigInt,
    #[serde(with = "crate::json_integer")]
    pub cost: BigInt,
    /// Backdoor bytes as `0x`-prefixed hex.
    pub backdoor: String,
    /// Public modulus as `0x`-prefixed hex. The exponent is always 3.
    pub key: String,
    /// PKCS#1 v1.5 signature as `0x`-prefixed hex.
    pub signature: String,
    /// Whether `signature` is supposed to verify.
    pub expected: bool,
}

/// Result of re-checking one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The signature verifies over the re-encoded fields.
    Valid,
    /// Everything parsed, but the signature does not verify.
    Invalid,
    /// The fields, key or signature could not be parsed at all.
    Malformed(String),
}

impl RecordOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// The payload an on-chain client submits for one credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubmission {
    #[serde(with = "keyring_core::hexstr::serde_bytes")]
    pub encoded_message: Vec<u8>,
    pub key: String,
    pub signature: String,
}

impl SignedVector {
    /// Build a record from validated fields and the key material that
    /// signed them.
    pub fn new(
        fields: &CredentialFields,
        key: &CredentialPublicKey,
        signature: &CredentialSignature,
        expected: bool,
    ) -> Self {
        let raw = fields.to_raw();
        Self {
            trading_address: raw.trading_address,
            policy_id: BigInt::from(raw.policy_id),
            create_before: BigInt::from(raw.create_before),
            valid_until: BigInt::from(raw.valid_until),
            cost: raw.cost,
            backdoor: hexstr::encode_prefixed(&raw.backdoor),
            key: key.modulus_hex(),
            signature: signature.to_hex(),
            expected,
        }
    }

    /// The record's field values, unvalidated.
    ///
    /// Fails only when a value cannot be represented in raw form at all:
    /// a number outside `i64` or a backdoor that is not hex.
    pub fn raw_fields(&self) -> Result<RawCredentialFields, EncodingError> {
        Ok(RawCredentialFields {
            trading_address: self.trading_address.clone(),
            policy_id: narrow("policy_id", &self.policy_id, POLICY_ID_LEN)?,
            create_before: narrow("create_before", &self.create_before, TIMESTAMP_LEN)?,
            valid_until: narrow("valid_until", &self.valid_until, TIMESTAMP_LEN)?,
            cost: self.cost.clone(),
            backdoor: hexstr::decode_prefixed(&self.backdoor)?,
        })
    }

    /// Re-encode the record's fields into the signed message.
    pub fn encoded_message(&self) -> Result<PackedMessage, EncodingError> {
        keyring_core::encode_packed(&self.raw_fields()?)
    }

    /// Parse the record's public key.
    pub fn public_key(&self) -> Result<CredentialPublicKey, VerificationError> {
        CredentialPublicKey::from_hex(&self.key)
    }

    /// Keccak-256 of the record's modulus bytes.
    pub fn key_hash(&self) -> Result<[u8; DIGEST_LEN], VerificationError> {
        Ok(self.public_key()?.key_hash())
    }

    /// Re-encode the fields and verify the signature against the record's
    /// own key.
    pub fn check(&self) -> RecordOutcome {
        let message = match self.encoded_message() {
            Ok(message) => message,
            Err(e) => return RecordOutcome::Malformed(e.to_string()),
        };
        match verify_hex(message.as_bytes(), &self.signature, &self.key) {
            Ok(true) => RecordOutcome::Valid,
            Ok(false) => RecordOutcome::Invalid,
            Err(e) => RecordOutcome::Malformed(e.to_string()),
        }
    }

    /// The `(encodedMessage, key, signature)` triple for submission.
    pub fn submission(&self) -> Result<CredentialSubmission, EncodingError> {
        Ok(CredentialSubmission {
            encoded_message: self.encoded_message()?.into_bytes(),
            key: self.key.clone(),
            signature: self.signature.clone(),
        })
    }
}

fn narrow(field: &'static str, value: &BigInt, width: usize) -> Result<i64, EncodingError> {
    value.to_i64().ok_or_else(|| {
        if value.sign() == Sign::Minus {
            EncodingError::NegativeValue {
                field,
                value: value.to_string(),
            }
        } else {
            EncodingError::FieldOutOfRange {
                field,
                width,
                value: value.to_string(),
            }
        }
    })
}

impl CredentialSubmission {
    /// Render the encoded message as prefixed hex.
    pub fn encoded_message_hex(&self) -> String {
        hexstr::encode_prefixed(&self.encoded_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyring_crypto::CredentialKeyPair;

    fn reference_fields() -> CredentialFields {
        RawCredentialFields {
            trading_address: "0x0123456789abcDEF0123456789abCDef01234567".to_string(),
            policy_id: 123_456,
            create_before: 1_625_247_600,
            valid_until: 1_627_849_600,
            cost: BigInt::from(1_000_000_000_000_000_000u64),
            backdoor: b"example_backdoor_data".to_vec(),
        }
        .validate()
        .unwrap()
    }

    fn signed_record() -> SignedVector {
        let fields = reference_fields();
        let kp = CredentialKeyPair::generate().unwrap();
        let sig = kp.sign(&PackedMessage::encode(&fields)).unwrap();
        SignedVector::new(&fields, kp.public_key(), &sig, true)
    }

    #[test]
    fn json_shape_uses_camel_case_and_hex() {
        let record = signed_record();
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "backdoor",
                "cost",
                "createBefore",
                "expected",
                "key",
                "policyId",
                "signature",
                "tradingAddress",
                "validUntil"
            ]
        );
        assert_eq!(
            obj["tradingAddress"],
            "0x0123456789abcdef0123456789abcdef01234567"
        );
        assert_eq!(obj["policyId"], 123_456);
        assert_eq!(obj["cost"], 1_000_000_000_000_000_000u64);
        assert_eq!(obj["backdoor"], "0x6578616d706c655f6261636b646f6f725f64617461");
        assert_eq!(obj["expected"], true);
        assert!(obj["key"].as_str().unwrap().starts_with("0x"));
        assert_eq!(obj["signature"].as_str().unwrap().len(), 2 + 256);
    }

    #[test]
    fn generated_record_checks_valid() {
        let record = signed_record();
        assert_eq!(record.check(), RecordOutcome::Valid);
    }

    #[test]
    fn altered_field_checks_invalid() {
        let mut record = signed_record();
        record.policy_id += 1;
        assert_eq!(record.check(), RecordOutcome::Invalid);
    }

    #[test]
    fn out_of_range_field_checks_malformed() {
        let mut record = signed_record();
        record.policy_id = BigInt::from(1 << 24);
        assert!(matches!(record.check(), RecordOutcome::Malformed(_)));
    }

    #[test]
    fn values_beyond_i64_check_malformed() {
        let mut record = signed_record();
        record.valid_until = BigInt::from(1u8) << 70usize;
        assert!(matches!(
            record.raw_fields(),
            Err(EncodingError::FieldOutOfRange {
                field: "valid_until",
                ..
            })
        ));
        assert!(matches!(record.check(), RecordOutcome::Malformed(_)));

        record.valid_until = -(BigInt::from(1u8) << 70usize);
        assert!(matches!(
            record.raw_fields(),
            Err(EncodingError::NegativeValue { .. })
        ));
    }

    #[test]
    fn non_hex_backdoor_checks_malformed() {
        let mut record = signed_record();
        record.backdoor = "0xnot-hex".to_string();
        assert!(matches!(record.check(), RecordOutcome::Malformed(_)));
    }

    #[test]
    fn hand_written_record_with_oversized_numbers_loads() {
        let record = signed_record();
        let json = format!(
            r#"{{
                "tradingAddress": "{}",
                "policyId": 100000000000000000000,
                "createBefore": 1625247600,
                "validUntil": -1,
                "cost": 1461501637330902918203684832716283019655932542976,
                "backdoor": "0xzz",
                "key": "{}",
                "signature": "{}",
                "expected": false
            }}"#,
            record.trading_address, record.key, record.signature
        );
        let loaded: SignedVector = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.policy_id, "100000000000000000000".parse::<BigInt>().unwrap());
        assert_eq!(loaded.cost, BigInt::from(1u8) << 160usize);
        assert!(matches!(loaded.check(), RecordOutcome::Malformed(_)));
    }

    #[test]
    fn large_cost_is_written_as_a_number() {
        let mut record = signed_record();
        record.cost = BigInt::from(1u8) << 100usize;
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""cost":1267650600228229401496703205376"#));
        let back: SignedVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn garbage_key_checks_malformed() {
        let mut record = signed_record();
        record.key = "0x03".to_string();
        assert!(matches!(record.check(), RecordOutcome::Malformed(_)));
    }

    #[test]
    fn submission_triple_matches_record() {
        let record = signed_record();
        let submission = record.submission().unwrap();
        assert_eq!(submission.encoded_message.len(), 73);
        assert_eq!(submission.key, record.key);
        assert_eq!(submission.signature, record.signature);
        assert_eq!(
            submission.encoded_message_hex(),
            record.encoded_message().unwrap().to_hex()
        );

        let json = serde_json::to_value(&submission).unwrap();
        assert!(json.get("encodedMessage").is_some());
    }

    #[test]
    fn key_hash_is_keccak_of_modulus() {
        let record = signed_record();
        let pk = record.public_key().unwrap();
        assert_eq!(record.key_hash().unwrap(), keyring_crypto::key_hash(&pk.modulus_bytes()));
    }
}
