//! Common types for cross-chain transfers
//!
//! Chains, their address families, bridging modes and token identifiers
//! shared by the settings, validation and CLI code.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::network::NetworkId;

/// Smallest-unit decimals on UTXO chains (lovelace / DFM)
pub const UTXO_DECIMALS: u32 = 6;

/// Smallest-unit decimals on account chains (wei)
pub const ACCOUNT_DECIMALS: u32 = 18;

/// Error returned when a name does not match any known chain or mode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {what}: {value}")]
pub struct ParseError {
    what: &'static str,
    value: String,
}

impl ParseError {
    fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}

// ============================================================================
// Chains
// ============================================================================

/// A chain the bridge can move value between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Prime,
    Vector,
    Cardano,
    Nexus,
}

impl ChainId {
    pub const ALL: [ChainId; 4] = [
        ChainId::Prime,
        ChainId::Vector,
        ChainId::Cardano,
        ChainId::Nexus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainId::Prime => "prime",
            ChainId::Vector => "vector",
            ChainId::Cardano => "cardano",
            ChainId::Nexus => "nexus",
        }
    }

    /// Address family of the chain
    pub fn kind(&self) -> ChainKind {
        match self {
            ChainId::Prime | ChainId::Vector | ChainId::Cardano => ChainKind::Utxo,
            ChainId::Nexus => ChainKind::Account,
        }
    }

    /// Smallest-unit decimals for amounts on this chain
    pub fn decimals(&self) -> u32 {
        self.kind().decimals()
    }

    /// Address network ids accepted on this chain when no settings override them.
    ///
    /// Account chains have no network id in their addresses.
    pub fn default_networks(&self, mainnet: bool) -> Vec<NetworkId> {
        match (self, mainnet) {
            (ChainId::Prime | ChainId::Cardano, true) => vec![NetworkId::CARDANO_MAINNET],
            (ChainId::Prime | ChainId::Cardano, false) => vec![NetworkId::CARDANO_TESTNET],
            (ChainId::Vector, true) => vec![NetworkId::VECTOR_MAINNET],
            (ChainId::Vector, false) => vec![NetworkId::VECTOR_TESTNET],
            (ChainId::Nexus, _) => Vec::new(),
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChainId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChainId::ALL
            .into_iter()
            .find(|chain| chain.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::new("chain", s))
    }
}

/// How a chain represents accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    /// Cardano-style bech32 addresses, 6-decimal amounts
    Utxo,
    /// 0x-prefixed hex addresses, 18-decimal amounts
    Account,
}

impl ChainKind {
    pub fn decimals(&self) -> u32 {
        match self {
            ChainKind::Utxo => UTXO_DECIMALS,
            ChainKind::Account => ACCOUNT_DECIMALS,
        }
    }
}

// ============================================================================
// Bridging Modes
// ============================================================================

/// Policy regime governing a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgingMode {
    Reactor,
    Skyline,
    #[serde(rename = "layerzero")]
    LayerZero,
}

impl BridgingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgingMode::Reactor => "reactor",
            BridgingMode::Skyline => "skyline",
            BridgingMode::LayerZero => "layerzero",
        }
    }
}

impl fmt::Display for BridgingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BridgingMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reactor" => Ok(BridgingMode::Reactor),
            "skyline" => Ok(BridgingMode::Skyline),
            "layerzero" => Ok(BridgingMode::LayerZero),
            _ => Err(ParseError::new("bridging mode", s)),
        }
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// Token identifier assigned by the bridge settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TokenId {
    fn from(id: u32) -> Self {
        TokenId(id)
    }
}

// ============================================================================
// EVM Addresses
// ============================================================================

/// EVM address (20 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvmAddress(pub [u8; 20]);

impl EvmAddress {
    /// Parse a `0x`-prefixed 40-hex-character address.
    ///
    /// All-lowercase and all-uppercase input is accepted as is. Mixed-case
    /// input must carry a valid EIP-55 checksum.
    pub fn parse(text: &str) -> Option<Self> {
        let body = text.strip_prefix("0x")?;
        if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper && Address::parse_checksummed(text, None).is_err() {
            return None;
        }

        let mut raw = [0u8; 20];
        hex::decode_to_slice(body, &mut raw).ok()?;
        Some(EvmAddress(raw))
    }

    /// EIP-55 checksummed form
    pub fn to_checksum(&self) -> String {
        Address::from(self.0).to_checksum(None)
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

/// Whether `text` is a syntactically valid account-chain address
pub fn is_valid_evm_address(text: &str) -> bool {
    EvmAddress::parse(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_kinds() {
        assert_eq!(ChainId::Prime.kind(), ChainKind::Utxo);
        assert_eq!(ChainId::Vector.kind(), ChainKind::Utxo);
        assert_eq!(ChainId::Cardano.kind(), ChainKind::Utxo);
        assert_eq!(ChainId::Nexus.kind(), ChainKind::Account);
        assert_eq!(ChainId::Prime.decimals(), 6);
        assert_eq!(ChainId::Nexus.decimals(), 18);
    }

    #[test]
    fn test_chain_id_from_str() {
        assert_eq!("prime".parse::<ChainId>().unwrap(), ChainId::Prime);
        assert_eq!(" Nexus ".parse::<ChainId>().unwrap(), ChainId::Nexus);
        let err = "terra".parse::<ChainId>().unwrap_err();
        assert!(err.to_string().contains("terra"));
    }

    #[test]
    fn test_chain_id_serde() {
        let json = serde_json::to_string(&ChainId::Vector).unwrap();
        assert_eq!(json, "\"vector\"");
        let parsed: ChainId = serde_json::from_str("\"cardano\"").unwrap();
        assert_eq!(parsed, ChainId::Cardano);
    }

    #[test]
    fn test_bridging_mode_roundtrip() {
        for mode in [
            BridgingMode::Reactor,
            BridgingMode::Skyline,
            BridgingMode::LayerZero,
        ] {
            assert_eq!(mode.as_str().parse::<BridgingMode>().unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn test_default_networks() {
        assert_eq!(
            ChainId::Prime.default_networks(true),
            vec![NetworkId::CARDANO_MAINNET]
        );
        assert_eq!(
            ChainId::Vector.default_networks(false),
            vec![NetworkId::VECTOR_TESTNET]
        );
        assert!(ChainId::Nexus.default_networks(true).is_empty());
    }

    #[test]
    fn test_evm_address_checksummed() {
        let addr = EvmAddress::parse("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        assert_eq!(addr.0[0], 0xf3);
        assert_eq!(
            addr.to_checksum(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_evm_address_single_case_accepted() {
        assert!(is_valid_evm_address(
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        ));
        assert!(is_valid_evm_address(
            "0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266"
        ));
    }

    #[test]
    fn test_evm_address_bad_checksum() {
        assert!(!is_valid_evm_address(
            "0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        ));
    }

    #[test]
    fn test_evm_address_shape() {
        assert!(!is_valid_evm_address(
            "f39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        ));
        assert!(!is_valid_evm_address("0xdead"));
        assert!(!is_valid_evm_address(
            "0xg39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        ));
        assert!(!is_valid_evm_address("hello world"));
        assert!(!is_valid_evm_address(""));
    }
}
