//! Network Prefix Resolution
//!
//! Maps the network id carried in an address header to the bech32 prefix the
//! address is displayed with.
//!
//! | Network id | Chain   | Tier    | Payment prefix | Stake prefix          |
//! |------------|---------|---------|----------------|-----------------------|
//! | 0          | Cardano | testnet | `addr_test`    | `stake_test`          |
//! | 1          | Cardano | mainnet | `addr`         | `stake`               |
//! | 2          | Vector  | testnet | `vector_test`  | `stake_vector_test`   |
//! | 3          | Vector  | mainnet | `vector`       | `stake_vector`        |
//!
//! Unknown network ids resolve to an empty prefix. An empty prefix must be
//! treated as "do not display or submit"; the bech32 encoder rejects it, so
//! [`crate::address_codec::CardanoAddress::to_bech32`] returns `None` for it.
//!
//! [`network_for_prefix`] is the reverse lookup used when decoding text. Only
//! the eight prefixes above resolve.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network id from the low nibble of an address header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub u8);

impl NetworkId {
    pub const CARDANO_TESTNET: NetworkId = NetworkId(0);
    pub const CARDANO_MAINNET: NetworkId = NetworkId(1);
    pub const VECTOR_TESTNET: NetworkId = NetworkId(2);
    pub const VECTOR_MAINNET: NetworkId = NetworkId(3);
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for NetworkId {
    fn from(id: u8) -> Self {
        NetworkId(id & 0x0f)
    }
}

/// Which side of the address the prefix is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressRole {
    /// Base and enterprise addresses
    Payment,
    /// Reward addresses
    Stake,
}

/// Prefix for payment-style addresses on `network`, or `""` when unknown
pub fn payment_prefix(network: NetworkId) -> &'static str {
    match network {
        NetworkId::CARDANO_TESTNET => "addr_test",
        NetworkId::CARDANO_MAINNET => "addr",
        NetworkId::VECTOR_TESTNET => "vector_test",
        NetworkId::VECTOR_MAINNET => "vector",
        _ => "",
    }
}

/// Prefix for reward addresses on `network`, or `""` when unknown
pub fn stake_prefix(network: NetworkId) -> &'static str {
    match network {
        NetworkId::CARDANO_TESTNET => "stake_test",
        NetworkId::CARDANO_MAINNET => "stake",
        NetworkId::VECTOR_TESTNET => "stake_vector_test",
        NetworkId::VECTOR_MAINNET => "stake_vector",
        _ => "",
    }
}

/// Prefix for an address of the given role on `network`
pub fn prefix_for(network: NetworkId, role: AddressRole) -> &'static str {
    match role {
        AddressRole::Payment => payment_prefix(network),
        AddressRole::Stake => stake_prefix(network),
    }
}

/// Reverse lookup: the network and role a prefix belongs to
pub fn network_for_prefix(prefix: &str) -> Option<(NetworkId, AddressRole)> {
    let known = [
        NetworkId::CARDANO_TESTNET,
        NetworkId::CARDANO_MAINNET,
        NetworkId::VECTOR_TESTNET,
        NetworkId::VECTOR_MAINNET,
    ];
    known.into_iter().find_map(|network| {
        if payment_prefix(network) == prefix {
            Some((network, AddressRole::Payment))
        } else if stake_prefix(network) == prefix {
            Some((network, AddressRole::Stake))
        } else {
            None
        }
    })
}
