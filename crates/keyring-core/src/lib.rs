//! # keyring-core — Credential Fields and Packed Encoding
//!
//! This crate is the leaf of the workspace. It defines the typed inputs of
//! a Keyring credential and the bit-exact packed encoding that gets signed.
//!
//! ## Key Design Principles
//!
//! 1. **Validated construction.** `CredentialFields` can only be obtained
//!    from `RawCredentialFields::validate()` or `CredentialFields::new()`,
//!    both of which enforce every field's declared width. Out-of-range and
//!    negative values become `EncodingError`, never silent truncation.
//!
//! 2. **`PackedMessage` newtype.** The signer takes a `PackedMessage`, so
//!    only bytes produced by this encoder can be signed. The layout is fixed: address (20), reserved `0x00` (1),
//!    policy id (3), create-before (4), valid-until (4), cost (20), then the
//!    backdoor verbatim.
//!
//! 3. **Hex at the edges.** Byte fields cross the serialization boundary
//!    as `0x`-prefixed lowercase hex; see [`hexstr`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `keyring-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod cost;
pub mod error;
pub mod fields;
pub mod hexstr;
pub mod packed;

// Re-export primary types for ergonomic imports.
pub use address::{TradingAddress, ADDRESS_LEN};
pub use cost::{Cost, COST_LEN};
pub use error::EncodingError;
pub use fields::{CredentialFields, RawCredentialFields, MAX_POLICY_ID};
pub use packed::{encode_packed, PackedMessage, FIXED_PREFIX_LEN, RESERVED_TYPE_BYTE};
