//! # Packed Encoding
//!
//! This module defines `PackedMessage`, the only byte string the signer
//! accepts as credential input.
//!
//! ## Layout
//!
//! Fields are concatenated big-endian at fixed widths with no padding,
//! length prefixes or delimiters:
//!
//! ```text
//! offset  0  trading_address   20 bytes
//! offset 20  reserved type      1 byte  (0x00)
//! offset 21  policy_id          3 bytes
//! offset 24  create_before      4 bytes
//! offset 28  valid_until        4 bytes
//! offset 32  cost              20 bytes
//! offset 52  backdoor          remaining bytes, verbatim
//! ```
//!
//! The backdoor carries no length prefix, so it must stay the last field;
//! a decoder recovers it as "everything after offset 52".
//!
//! ## Invariants
//!
//! - `encode(fields).len() == 52 + fields.backdoor().len()`, always.
//! - Encoding is a pure function of the fields.
//! - `PackedMessage` has a private inner field. It can only be produced
//!   from validated `CredentialFields` or via [`encode_packed`], which
//!   validates first.

use crate::address::{TradingAddress, ADDRESS_LEN};
use crate::cost::{Cost, COST_LEN};
use crate::error::EncodingError;
use crate::fields::{CredentialFields, RawCredentialFields, POLICY_ID_LEN, TIMESTAMP_LEN};
use crate::hexstr;

/// The fixed discriminator byte inserted after the address.
pub const RESERVED_TYPE_BYTE: u8 = 0x00;

/// Offset of the reserved type byte.
pub const RESERVED_OFFSET: usize = ADDRESS_LEN;

/// Offset of the policy id.
pub const POLICY_ID_OFFSET: usize = RESERVED_OFFSET + 1;

/// Offset of `create_before`.
pub const CREATE_BEFORE_OFFSET: usize = POLICY_ID_OFFSET + POLICY_ID_LEN;

/// Offset of `valid_until`.
pub const VALID_UNTIL_OFFSET: usize = CREATE_BEFORE_OFFSET + TIMESTAMP_LEN;

/// Offset of the cost.
pub const COST_OFFSET: usize = VALID_UNTIL_OFFSET + TIMESTAMP_LEN;

/// Length of the fixed-width prefix; the backdoor starts here.
pub const FIXED_PREFIX_LEN: usize = COST_OFFSET + COST_LEN;

/// A packed credential message, ready to be hashed and signed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackedMessage(Vec<u8>);

impl PackedMessage {
    /// Pack validated fields. Infallible: validation already happened.
    pub fn encode(fields: &CredentialFields) -> Self {
        let backdoor = fields.backdoor();
        let mut out = Vec::with_capacity(FIXED_PREFIX_LEN + backdoor.len());
        out.extend_from_slice(fields.trading_address().as_bytes());
        out.push(RESERVED_TYPE_BYTE);
        out.extend_from_slice(&fields.policy_id().to_be_bytes()[4 - POLICY_ID_LEN..]);
        out.extend_from_slice(&fields.create_before().to_be_bytes());
        out.extend_from_slice(&fields.valid_until().to_be_bytes());
        out.extend_from_slice(&fields.cost().to_be_bytes());
        out.extend_from_slice(backdoor);
        debug_assert_eq!(out.len(), FIXED_PREFIX_LEN + backdoor.len());
        Self(out)
    }

    /// The packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the message, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length in bytes (52 plus the backdoor length).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a packed message has at least 52 bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        hexstr::encode_prefixed(&self.0)
    }
}

impl AsRef<[u8]> for PackedMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Validate raw field values and pack them.
///
/// # Errors
///
/// Returns `EncodingError` if any fixed-width field is negative or does
/// not fit its declared width, or if the address is not 20 bytes.
pub fn encode_packed(raw: &RawCredentialFields) -> Result<PackedMessage, EncodingError> {
    let fields = raw.validate()?;
    Ok(PackedMessage::encode(&fields))
}

impl CredentialFields {
    /// Parse a packed message back into fields using the fixed layout.
    ///
    /// Every byte after offset 52 is taken as the backdoor.
    pub fn decode(bytes: &[u8]) -> Result<Self, EncodingError> {
        if bytes.len() < FIXED_PREFIX_LEN {
            return Err(EncodingError::Truncated {
                expected: FIXED_PREFIX_LEN,
                actual: bytes.len(),
            });
        }
        let reserved = bytes[RESERVED_OFFSET];
        if reserved != RESERVED_TYPE_BYTE {
            return Err(EncodingError::ReservedByte(reserved));
        }

        let trading_address = TradingAddress::from_slice(&bytes[..ADDRESS_LEN])?;

        let mut policy = [0u8; 4];
        policy[4 - POLICY_ID_LEN..]
            .copy_from_slice(&bytes[POLICY_ID_OFFSET..CREATE_BEFORE_OFFSET]);

        let mut cost = [0u8; COST_LEN];
        cost.copy_from_slice(&bytes[COST_OFFSET..FIXED_PREFIX_LEN]);

        Self::new(
            trading_address,
            u32::from_be_bytes(policy),
            read_u32(&bytes[CREATE_BEFORE_OFFSET..VALID_UNTIL_OFFSET]),
            read_u32(&bytes[VALID_UNTIL_OFFSET..COST_OFFSET]),
            Cost::from_be_bytes(cost),
            &bytes[FIXED_PREFIX_LEN..],
        )
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}
