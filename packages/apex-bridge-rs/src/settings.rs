//! Bridging settings
//!
//! Read-only policy the validation engine checks transfers against. The
//! settings are produced by the bridge's settings endpoint and handed to this
//! crate as JSON:
//!
//! ```json
//! {
//!   "mainnet": false,
//!   "chains": {
//!     "prime":  { "currency_token_id": 1, "currency_symbol": "AP3",
//!                 "tokens": { "2": { "symbol": "wADA" } } },
//!     "vector": { "currency_token_id": 3, "currency_symbol": "AP3",
//!                 "testnet_networks": [2, 0] }
//!   },
//!   "directions": [
//!     { "source": "prime", "destination": "vector", "mode": "reactor" }
//!   ],
//!   "limits": [
//!     { "mode": "reactor", "chain": "prime",
//!       "currency": { "min": "1000000", "max": "0" } }
//!   ]
//! }
//! ```
//!
//! Amounts are in the chain's smallest unit and may be JSON numbers or
//! decimal strings; a `max` of zero means unbounded.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::network::NetworkId;
use crate::types::{BridgingMode, ChainId, TokenId};

/// Errors found while loading or checking settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Direction {source_chain} -> {destination} references unconfigured chain {chain}")]
    UnknownChain {
        source_chain: ChainId,
        destination: ChainId,
        chain: ChainId,
    },

    #[error("Direction from {chain} to itself is not allowed")]
    SelfDirection { chain: ChainId },

    #[error("Limits for {mode} on {chain}: minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        mode: BridgingMode,
        chain: ChainId,
        min: u128,
        max: u128,
    },

    #[error("Duplicate limits for {mode} on {chain}")]
    DuplicateLimits { mode: BridgingMode, chain: ChainId },
}

// ============================================================================
// Settings Types
// ============================================================================

/// Complete bridging policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgingSettings {
    /// Network tier addresses are checked against
    #[serde(default)]
    pub mainnet: bool,
    #[serde(default)]
    pub chains: BTreeMap<ChainId, ChainSettings>,
    #[serde(default)]
    pub directions: Vec<DirectionRule>,
    #[serde(default)]
    pub limits: Vec<ModeLimits>,
}

/// Per-chain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSettings {
    /// Token id of the chain's native currency
    pub currency_token_id: TokenId,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    /// Wrapped tokens living on this chain
    #[serde(default)]
    pub tokens: BTreeMap<TokenId, TokenSettings>,
    /// Address network ids accepted on mainnet (defaults per chain when empty)
    #[serde(default)]
    pub mainnet_networks: Vec<NetworkId>,
    /// Address network ids accepted on testnet (defaults per chain when empty)
    #[serde(default)]
    pub testnet_networks: Vec<NetworkId>,
}

impl ChainSettings {
    pub fn new(currency_token_id: TokenId) -> Self {
        Self {
            currency_token_id,
            currency_symbol: None,
            tokens: BTreeMap::new(),
            mainnet_networks: Vec::new(),
            testnet_networks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    pub symbol: String,
}

/// One allowed transfer direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionRule {
    pub source: ChainId,
    pub destination: ChainId,
    pub mode: BridgingMode,
    /// Tokens allowed in this direction; empty allows any token
    #[serde(default)]
    pub tokens: Vec<TokenId>,
}

impl DirectionRule {
    pub fn matches(&self, source: ChainId, destination: ChainId, token: TokenId) -> bool {
        self.source == source
            && self.destination == destination
            && (self.tokens.is_empty() || self.tokens.contains(&token))
    }
}

/// Amount bounds for one mode when bridging from one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeLimits {
    pub mode: BridgingMode,
    /// Source chain the bounds apply to (amounts are in its smallest unit)
    pub chain: ChainId,
    /// Bounds for the chain's native currency
    #[serde(default)]
    pub currency: AmountBounds,
    /// Bounds for wrapped tokens
    #[serde(default)]
    pub wrapped: AmountBounds,
}

/// Inclusive minimum and optional maximum (zero = unbounded)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountBounds {
    #[serde(default, with = "amount_serde")]
    pub min: u128,
    #[serde(default, with = "amount_serde")]
    pub max: u128,
}

impl AmountBounds {
    pub fn new(min: u128, max: u128) -> Self {
        Self { min, max }
    }

    pub fn is_bounded(&self) -> bool {
        self.max != 0
    }
}

// ============================================================================
// Lookups
// ============================================================================

impl BridgingSettings {
    /// Parse and check settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: BridgingSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), SettingsError> {
        for rule in &self.directions {
            if rule.source == rule.destination {
                return Err(SettingsError::SelfDirection { chain: rule.source });
            }
            for chain in [rule.source, rule.destination] {
                if !self.chains.contains_key(&chain) {
                    return Err(SettingsError::UnknownChain {
                        source_chain: rule.source,
                        destination: rule.destination,
                        chain,
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        for limits in &self.limits {
            if !seen.insert((limits.mode, limits.chain)) {
                return Err(SettingsError::DuplicateLimits {
                    mode: limits.mode,
                    chain: limits.chain,
                });
            }
            for bounds in [limits.currency, limits.wrapped] {
                if bounds.is_bounded() && bounds.min > bounds.max {
                    return Err(SettingsError::InvertedBounds {
                        mode: limits.mode,
                        chain: limits.chain,
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
            }
        }

        Ok(())
    }

    pub fn chain(&self, chain: ChainId) -> Option<&ChainSettings> {
        self.chains.get(&chain)
    }

    /// Mode of the first direction rule allowing `token` from `source` to `destination`
    pub fn resolve_mode(
        &self,
        source: ChainId,
        destination: ChainId,
        token: TokenId,
    ) -> Option<BridgingMode> {
        self.directions
            .iter()
            .find(|rule| rule.matches(source, destination, token))
            .map(|rule| rule.mode)
    }

    /// Whether `token` is the native currency of `chain`
    pub fn is_currency(&self, chain: ChainId, token: TokenId) -> bool {
        self.chain(chain)
            .is_some_and(|settings| settings.currency_token_id == token)
    }

    pub fn limits_for(&self, mode: BridgingMode, chain: ChainId) -> Option<&ModeLimits> {
        self.limits
            .iter()
            .find(|limits| limits.mode == mode && limits.chain == chain)
    }

    /// Bounds that apply to `token` leaving `chain` under `mode`
    pub fn bounds_for(
        &self,
        mode: BridgingMode,
        chain: ChainId,
        token: TokenId,
    ) -> Option<AmountBounds> {
        let limits = self.limits_for(mode, chain)?;
        if self.is_currency(chain, token) {
            Some(limits.currency)
        } else {
            Some(limits.wrapped)
        }
    }

    /// Address network ids a receiver on `chain` may carry for the configured tier
    pub fn allowed_networks(&self, chain: ChainId) -> Vec<NetworkId> {
        let configured = self.chain(chain).map(|settings| {
            if self.mainnet {
                &settings.mainnet_networks
            } else {
                &settings.testnet_networks
            }
        });
        match configured {
            Some(networks) if !networks.is_empty() => networks.clone(),
            _ => chain.default_networks(self.mainnet),
        }
    }

    /// Display symbol for `token` on `chain`, falling back to the token id
    pub fn token_symbol(&self, chain: ChainId, token: TokenId) -> String {
        let Some(settings) = self.chain(chain) else {
            return format!("token {}", token);
        };
        if settings.currency_token_id == token {
            if let Some(symbol) = &settings.currency_symbol {
                return symbol.clone();
            }
        }
        settings
            .tokens
            .get(&token)
            .map(|t| t.symbol.clone())
            .unwrap_or_else(|| format!("token {}", token))
    }
}

// ============================================================================
// Amount (de)serialization
// ============================================================================

/// Amounts as decimal strings on output; numbers or strings on input.
mod amount_serde {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer amount or a decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(u128::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(|_| E::custom(format!("negative amount: {}", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            v.trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid amount: {:?}", v)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "mainnet": false,
        "chains": {
            "prime": {
                "currency_token_id": 1,
                "currency_symbol": "AP3",
                "tokens": { "2": { "symbol": "wADA" } }
            },
            "vector": {
                "currency_token_id": 3,
                "testnet_networks": [2, 0]
            },
            "nexus": { "currency_token_id": 4, "currency_symbol": "AP3" }
        },
        "directions": [
            { "source": "prime", "destination": "vector", "mode": "reactor", "tokens": [1] },
            { "source": "prime", "destination": "nexus", "mode": "skyline" }
        ],
        "limits": [
            {
                "mode": "reactor",
                "chain": "prime",
                "currency": { "min": 1000, "max": "5000000000" }
            },
            {
                "mode": "skyline",
                "chain": "prime",
                "currency": { "min": "2000000" },
                "wrapped": { "min": 10, "max": 100 }
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let settings = BridgingSettings::from_json(SAMPLE).unwrap();
        assert!(!settings.mainnet);
        assert_eq!(settings.chains.len(), 3);
        assert_eq!(settings.directions.len(), 2);
        let limits = settings
            .limits_for(BridgingMode::Reactor, ChainId::Prime)
            .unwrap();
        assert_eq!(limits.currency, AmountBounds::new(1000, 5_000_000_000));
        assert_eq!(limits.wrapped, AmountBounds::default());
    }

    #[test]
    fn test_resolve_mode_honours_token_filter() {
        let settings = BridgingSettings::from_json(SAMPLE).unwrap();
        assert_eq!(
            settings.resolve_mode(ChainId::Prime, ChainId::Vector, TokenId(1)),
            Some(BridgingMode::Reactor)
        );
        assert_eq!(
            settings.resolve_mode(ChainId::Prime, ChainId::Vector, TokenId(2)),
            None
        );
        assert_eq!(
            settings.resolve_mode(ChainId::Prime, ChainId::Nexus, TokenId(2)),
            Some(BridgingMode::Skyline)
        );
        assert_eq!(
            settings.resolve_mode(ChainId::Vector, ChainId::Prime, TokenId(3)),
            None
        );
    }

    #[test]
    fn test_bounds_for_currency_and_wrapped() {
        let settings = BridgingSettings::from_json(SAMPLE).unwrap();
        assert_eq!(
            settings.bounds_for(BridgingMode::Skyline, ChainId::Prime, TokenId(1)),
            Some(AmountBounds::new(2_000_000, 0))
        );
        assert_eq!(
            settings.bounds_for(BridgingMode::Skyline, ChainId::Prime, TokenId(2)),
            Some(AmountBounds::new(10, 100))
        );
        assert_eq!(
            settings.bounds_for(BridgingMode::LayerZero, ChainId::Prime, TokenId(1)),
            None
        );
    }

    #[test]
    fn test_allowed_networks_override_and_default() {
        let mut settings = BridgingSettings::from_json(SAMPLE).unwrap();
        assert_eq!(
            settings.allowed_networks(ChainId::Vector),
            vec![NetworkId::VECTOR_TESTNET, NetworkId::CARDANO_TESTNET]
        );
        assert_eq!(
            settings.allowed_networks(ChainId::Prime),
            vec![NetworkId::CARDANO_TESTNET]
        );

        settings.mainnet = true;
        assert_eq!(
            settings.allowed_networks(ChainId::Vector),
            vec![NetworkId::VECTOR_MAINNET]
        );
        // Unconfigured chains fall back to the defaults too
        assert_eq!(
            settings.allowed_networks(ChainId::Cardano),
            vec![NetworkId::CARDANO_MAINNET]
        );
    }

    #[test]
    fn test_token_symbol() {
        let settings = BridgingSettings::from_json(SAMPLE).unwrap();
        assert_eq!(settings.token_symbol(ChainId::Prime, TokenId(1)), "AP3");
        assert_eq!(settings.token_symbol(ChainId::Prime, TokenId(2)), "wADA");
        assert_eq!(settings.token_symbol(ChainId::Vector, TokenId(3)), "token 3");
        assert_eq!(settings.token_symbol(ChainId::Cardano, TokenId(9)), "token 9");
    }

    #[test]
    fn test_large_amount_string() {
        let bounds: AmountBounds =
            serde_json::from_str(r#"{ "min": "1000000000000000000000", "max": 0 }"#).unwrap();
        assert_eq!(bounds.min, 1_000_000_000_000_000_000_000);
        assert!(!bounds.is_bounded());

        let json = serde_json::to_string(&bounds).unwrap();
        assert!(json.contains("\"1000000000000000000000\""));
    }

    #[test]
    fn test_invalid_amounts_rejected() {
        assert!(serde_json::from_str::<AmountBounds>(r#"{ "min": -1 }"#).is_err());
        assert!(serde_json::from_str::<AmountBounds>(r#"{ "min": "abc" }"#).is_err());
    }

    #[test]
    fn test_validate_unknown_chain() {
        let json = r#"{
            "chains": { "prime": { "currency_token_id": 1 } },
            "directions": [ { "source": "prime", "destination": "nexus", "mode": "skyline" } ]
        }"#;
        let err = BridgingSettings::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::UnknownChain {
                chain: ChainId::Nexus,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_self_direction() {
        let json = r#"{
            "chains": { "prime": { "currency_token_id": 1 } },
            "directions": [ { "source": "prime", "destination": "prime", "mode": "reactor" } ]
        }"#;
        let err = BridgingSettings::from_json(json).unwrap_err();
        assert!(err.to_string().contains("itself"));
    }

    #[test]
    fn test_validate_inverted_and_duplicate_limits() {
        let json = r#"{
            "limits": [ { "mode": "reactor", "chain": "prime", "currency": { "min": 10, "max": 5 } } ]
        }"#;
        assert!(matches!(
            BridgingSettings::from_json(json).unwrap_err(),
            SettingsError::InvertedBounds { min: 10, max: 5, .. }
        ));

        let json = r#"{
            "limits": [
                { "mode": "reactor", "chain": "prime" },
                { "mode": "reactor", "chain": "prime" }
            ]
        }"#;
        assert!(matches!(
            BridgingSettings::from_json(json).unwrap_err(),
            SettingsError::DuplicateLimits { .. }
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = BridgingSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }
}
