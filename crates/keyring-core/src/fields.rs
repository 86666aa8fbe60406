//! # Credential Fields
//!
//! The typed input tuple signed into every credential:
//!
//! | Field           | Packed width | Range            |
//! |-----------------|--------------|------------------|
//! | `trading_address` | 20         | 20 raw bytes     |
//! | reserved type   | 1            | always `0x00`    |
//! | `policy_id`     | 3            | `0 ..= 2^24 - 1` |
//! | `create_before` | 4            | `0 ..= 2^32 - 1` |
//! | `valid_until`   | 4            | `0 ..= 2^32 - 1` |
//! | `cost`          | 20           | `0 ..= 2^160 - 1`|
//! | `backdoor`      | variable     | any bytes, last  |
//!
//! Two representations exist. [`RawCredentialFields`] carries unchecked
//! values as they arrive from configuration or a vector file (signed
//! integers, a hex address string). [`CredentialFields`] can only be built
//! through validation, so holding one proves every fixed-width field fits.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;

use crate::address::TradingAddress;
use crate::cost::Cost;
use crate::error::EncodingError;

/// Width of the packed policy id in bytes.
pub const POLICY_ID_LEN: usize = 3;

/// Width of each packed timestamp in bytes.
pub const TIMESTAMP_LEN: usize = 4;

/// Largest representable policy id (2^24 - 1).
pub const MAX_POLICY_ID: u32 = (1 << 24) - 1;

/// Check that `value` is non-negative and fits in `width` bytes.
pub(crate) fn check_width(
    field: &'static str,
    value: &BigInt,
    width: usize,
) -> Result<BigUint, EncodingError> {
    if value.sign() == Sign::Minus {
        return Err(EncodingError::NegativeValue {
            field,
            value: value.to_string(),
        });
    }
    let magnitude = value.magnitude();
    if magnitude.bits() > (width as u64) * 8 {
        return Err(EncodingError::FieldOutOfRange {
            field,
            width,
            value: value.to_string(),
        });
    }
    Ok(magnitude.clone())
}

/// Narrow a validated magnitude to `u32`. Only called after `check_width`
/// has bounded it to at most four bytes.
fn to_u32(magnitude: &BigUint) -> u32 {
    magnitude.to_u32().unwrap_or(u32::MAX)
}

fn check_u32_field(field: &'static str, value: i64, width: usize) -> Result<u32, EncodingError> {
    check_width(field, &BigInt::from(value), width).map(|m| to_u32(&m))
}

/// Unvalidated field values, as read from configuration or a vector record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCredentialFields {
    /// Hex address string, `0x` prefix optional.
    pub trading_address: String,
    /// Policy identifier; must fit in 3 bytes.
    pub policy_id: i64,
    /// Unix timestamp; must fit in 4 bytes.
    pub create_before: i64,
    /// Unix timestamp; must fit in 4 bytes.
    pub valid_until: i64,
    /// Cost; must fit in 20 bytes.
    pub cost: BigInt,
    /// Opaque trailing bytes.
    pub backdoor: Vec<u8>,
}

impl RawCredentialFields {
    /// Validate every field against its declared width.
    pub fn validate(&self) -> Result<CredentialFields, EncodingError> {
        Ok(CredentialFields {
            trading_address: self.trading_address.parse()?,
            policy_id: check_u32_field("policy_id", self.policy_id, POLICY_ID_LEN)?,
            create_before: check_u32_field("create_before", self.create_before, TIMESTAMP_LEN)?,
            valid_until: check_u32_field("valid_until", self.valid_until, TIMESTAMP_LEN)?,
            cost: Cost::try_from_bigint(&self.cost)?,
            backdoor: self.backdoor.clone(),
        })
    }
}

impl TryFrom<&RawCredentialFields> for CredentialFields {
    type Error = EncodingError;

    fn try_from(raw: &RawCredentialFields) -> Result<Self, Self::Error> {
        raw.validate()
    }
}

/// Validated credential fields. Every fixed-width value is known to fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialFields {
    trading_address: TradingAddress,
    policy_id: u32,
    create_before: u32,
    valid_until: u32,
    cost: Cost,
    backdoor: Vec<u8>,
}

impl CredentialFields {
    /// Build validated fields from already-typed values.
    ///
    /// Only `policy_id` can still be out of range here (it is 24 bits wide
    /// but carried in a `u32`).
    pub fn new(
        trading_address: TradingAddress,
        policy_id: u32,
        create_before: u32,
        valid_until: u32,
        cost: Cost,
        backdoor: impl Into<Vec<u8>>,
    ) -> Result<Self, EncodingError> {
        if policy_id > MAX_POLICY_ID {
            return Err(EncodingError::FieldOutOfRange {
                field: "policy_id",
                width: POLICY_ID_LEN,
                value: policy_id.to_string(),
            });
        }
        Ok(Self {
            trading_address,
            policy_id,
            create_before,
            valid_until,
            cost,
            backdoor: backdoor.into(),
        })
    }

    pub fn trading_address(&self) -> &TradingAddress {
        &self.trading_address
    }

    pub fn policy_id(&self) -> u32 {
        self.policy_id
    }

    pub fn create_before(&self) -> u32 {
        self.create_before
    }

    pub fn valid_until(&self) -> u32 {
        self.valid_until
    }

    pub fn cost(&self) -> &Cost {
        &self.cost
    }

    pub fn backdoor(&self) -> &[u8] {
        &self.backdoor
    }

    /// Widen back into raw form, e.g. for rendering into a vector record.
    pub fn to_raw(&self) -> RawCredentialFields {
        RawCredentialFields {
            trading_address: self.trading_address.to_string(),
            policy_id: i64::from(self.policy_id),
            create_before: i64::from(self.create_before),
            valid_until: i64::from(self.valid_until),
            cost: BigInt::from(self.cost.as_biguint().clone()),
            backdoor: self.backdoor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawCredentialFields {
        RawCredentialFields {
            trading_address: "0x0123456789abcDEF0123456789abCDef01234567".to_string(),
            policy_id: 123_456,
            create_before: 1_625_247_600,
            valid_until: 1_627_849_600,
            cost: BigInt::from(1_000_000_000_000_000_000u64),
            backdoor: b"example_backdoor_data".to_vec(),
        }
    }

    #[test]
    fn reference_fields_validate() {
        let fields = raw().validate().unwrap();
        assert_eq!(fields.policy_id(), 123_456);
        assert_eq!(fields.create_before(), 1_625_247_600);
        assert_eq!(fields.valid_until(), 1_627_849_600);
        assert_eq!(fields.cost(), &Cost::from_u128(1_000_000_000_000_000_000));
        assert_eq!(fields.backdoor(), b"example_backdoor_data");
    }

    #[test]
    fn policy_id_boundary() {
        let mut r = raw();
        r.policy_id = i64::from(MAX_POLICY_ID);
        assert!(r.validate().is_ok());
        r.policy_id = 1 << 24;
        assert!(matches!(
            r.validate(),
            Err(EncodingError::FieldOutOfRange {
                field: "policy_id",
                width: 3,
                ..
            })
        ));
    }

    #[test]
    fn timestamp_boundaries() {
        let mut r = raw();
        r.create_before = i64::from(u32::MAX);
        r.valid_until = i64::from(u32::MAX);
        assert!(r.validate().is_ok());

        r.create_before = 1 << 32;
        assert!(matches!(
            r.validate(),
            Err(EncodingError::FieldOutOfRange {
                field: "create_before",
                ..
            })
        ));

        let mut r = raw();
        r.valid_until = 1 << 32;
        assert!(matches!(
            r.validate(),
            Err(EncodingError::FieldOutOfRange {
                field: "valid_until",
                ..
            })
        ));
    }

    #[test]
    fn negative_values_rejected() {
        let mut r = raw();
        r.policy_id = -1;
        assert!(matches!(
            r.validate(),
            Err(EncodingError::NegativeValue {
                field: "policy_id",
                ..
            })
        ));

        let mut r = raw();
        r.cost = BigInt::from(-5);
        assert!(matches!(
            r.validate(),
            Err(EncodingError::NegativeValue { field: "cost", .. })
        ));
    }

    #[test]
    fn bad_address_rejected() {
        let mut r = raw();
        r.trading_address = "0x1234".to_string();
        assert!(matches!(r.validate(), Err(EncodingError::InvalidAddress(_))));
    }

    #[test]
    fn typed_constructor_checks_policy_width() {
        let fields = raw().validate().unwrap();
        let err = CredentialFields::new(
            *fields.trading_address(),
            MAX_POLICY_ID + 1,
            0,
            0,
            Cost::from_u128(0),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EncodingError::FieldOutOfRange { .. }));
    }

    #[test]
    fn to_raw_round_trips() {
        let fields = raw().validate().unwrap();
        assert_eq!(fields.to_raw().validate().unwrap(), fields);
    }
}
