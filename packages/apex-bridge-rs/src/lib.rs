//! Apex-Bridge-RS: Address Codec and Transfer Validation for the Apex Bridge
//!
//! This crate provides the pieces the bridge front-end, CLI and relayers
//! share when preparing a transfer:
//!
//! - **Bit Regrouping** - Lossless repacking between 8-bit bytes and 5-bit bech32 words
//! - **Address Codec** - Cardano-style base, enterprise and reward addresses (Cardano, Prime, Vector)
//! - **Network Prefixes** - Mapping address network ids to bech32 prefixes
//! - **Settings** - Bridging directions, modes and amount limits loaded from JSON
//! - **Validation** - Pre-submission checks of a transfer against the settings
//! - **Units** - Smallest-unit amount formatting and conversion
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! apex-bridge-rs = { path = "../apex-bridge-rs" }
//! ```
//!
//! Everything here is pure and synchronous; settings are borrowed read-only.

pub mod address_codec;
pub mod bits;
pub mod network;
pub mod settings;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items at the crate root
pub use address_codec::{
    decode_bech32, encode_bech32, normalize_address, AddressHeader, AddressKind, CardanoAddress,
    CredentialKind, StakeCredential, CREDENTIAL_LENGTH,
};

pub use bits::{regroup, RegroupError};

pub use network::{
    network_for_prefix, payment_prefix, prefix_for, stake_prefix, AddressRole, NetworkId,
};

pub use settings::{
    AmountBounds, BridgingSettings, ChainSettings, DirectionRule, ModeLimits, SettingsError,
    TokenSettings,
};

pub use types::{is_valid_evm_address, BridgingMode, ChainId, ChainKind, EvmAddress, TokenId};

pub use units::{account_to_utxo, format_amount, parse_amount, utxo_to_account};

pub use validation::{
    check_transfer, validate_receiver, validate_transfer, TransferRequest, ValidationError,
};
