//! Cardano-Style Address Encoding
//!
//! Decodes and encodes the addresses used by the UTXO chains the bridge
//! serves (Cardano, Prime, Vector). All of them share the Shelley binary
//! layout and differ only in the bech32 prefix.
//!
//! ## Binary Layout
//!
//! ```text
//! | Header (1 byte) | Credential (28 bytes) | Credential (28 bytes, base only) | Extra |
//! ```
//!
//! ## Header Byte
//!
//! ```text
//! bit  7 6 5 4 | 3 2 1 0
//!      shape   | network id
//! ```
//!
//! - `0b00xx`: base address, bit 4 = payment kind, bit 5 = stake kind
//! - `0b010x`: pointer address (not supported)
//! - `0b011x`: enterprise address, bit 4 = payment kind
//! - `0b1000`: legacy (Byron) address (not supported)
//! - `0b111x`: reward address, bit 4 = stake kind
//!
//! Kind bit `0` means key hash, `1` means script hash.
//!
//! Malformed input (user-pasted text) is reported as `None`, never as a panic.

use bech32::{u5, Variant};
use std::fmt;
use tracing::debug;

use crate::bits::regroup;
use crate::network::{network_for_prefix, prefix_for, AddressRole, NetworkId};

// ============================================================================
// Constants
// ============================================================================

/// Length of a key or script hash credential
pub const CREDENTIAL_LENGTH: usize = 28;

/// Length of an enterprise or reward address payload (header + one credential)
pub const SINGLE_CREDENTIAL_ADDRESS_LENGTH: usize = 1 + CREDENTIAL_LENGTH;

/// Minimum length of a base address payload (header + two credentials)
pub const BASE_ADDRESS_MIN_LENGTH: usize = 1 + CREDENTIAL_LENGTH * 2;

/// Longest bech32 string accepted or produced
pub const MAX_BECH32_LENGTH: usize = 1023;

const ENTERPRISE_HEADER: u8 = 0b0110_0000;
const REWARD_HEADER: u8 = 0b1110_0000;

// ============================================================================
// Credentials
// ============================================================================

/// Whether a credential is the hash of a verification key or of a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    Key,
    Script,
}

impl CredentialKind {
    /// Kind encoded by a single header bit
    pub fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            CredentialKind::Key
        } else {
            CredentialKind::Script
        }
    }

    /// Header bit for this kind
    pub fn bit(&self) -> u8 {
        match self {
            CredentialKind::Key => 0,
            CredentialKind::Script => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::Key => "key",
            CredentialKind::Script => "script",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A 28-byte key or script hash controlling spending or staking rights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StakeCredential {
    pub kind: CredentialKind,
    pub hash: [u8; CREDENTIAL_LENGTH],
}

impl StakeCredential {
    pub fn new(kind: CredentialKind, hash: [u8; CREDENTIAL_LENGTH]) -> Self {
        Self { kind, hash }
    }

    /// Take the first 28 bytes of `bytes` as a credential.
    ///
    /// Returns `None` when fewer than 28 bytes are available.
    pub fn extract(kind: CredentialKind, bytes: &[u8]) -> Option<Self> {
        let hash: [u8; CREDENTIAL_LENGTH] = bytes.get(..CREDENTIAL_LENGTH)?.try_into().ok()?;
        Some(Self { kind, hash })
    }

    pub fn is_script(&self) -> bool {
        self.kind == CredentialKind::Script
    }

    /// Hex form of the hash
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

// ============================================================================
// Header
// ============================================================================

/// Address shape selected by the top nibble of the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Payment and stake credential
    Base,
    /// Payment credential only
    Enterprise,
    /// Stake credential only
    Reward,
}

impl AddressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressKind::Base => "base",
            AddressKind::Enterprise => "enterprise",
            AddressKind::Reward => "reward",
        }
    }

    /// Which prefix table the text form uses
    pub fn role(&self) -> AddressRole {
        match self {
            AddressKind::Base | AddressKind::Enterprise => AddressRole::Payment,
            AddressKind::Reward => AddressRole::Stake,
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parsed header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressHeader {
    pub kind: AddressKind,
    pub network: NetworkId,
    /// Kind from bit 4 (payment for base/enterprise, stake for reward)
    pub first: CredentialKind,
    /// Kind from bit 5 (stake credential of a base address)
    pub second: CredentialKind,
}

impl AddressHeader {
    /// Parse a header byte. Pointer, legacy and unassigned shapes yield `None`.
    pub fn parse(header: u8) -> Option<Self> {
        let kind = match header >> 4 {
            0b0000..=0b0011 => AddressKind::Base,
            0b0110 | 0b0111 => AddressKind::Enterprise,
            0b1110 | 0b1111 => AddressKind::Reward,
            0b1000 => {
                debug!(header, "Legacy address format is not supported");
                return None;
            }
            0b0100 | 0b0101 => {
                debug!(header, "Pointer address format is not supported");
                return None;
            }
            _ => {
                debug!(header, "Unknown address header");
                return None;
            }
        };

        Some(Self {
            kind,
            network: NetworkId(header & 0x0f),
            first: CredentialKind::from_bit(header >> 4),
            second: CredentialKind::from_bit(header >> 5),
        })
    }
}

// ============================================================================
// Address
// ============================================================================

/// A decoded Cardano-style address.
///
/// Only the credentials a shape actually has are reachable: [`payment`] and
/// [`stake`] return `None` for the side an address lacks.
///
/// [`payment`]: CardanoAddress::payment
/// [`stake`]: CardanoAddress::stake
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CardanoAddress {
    Base {
        network: NetworkId,
        payment: StakeCredential,
        stake: StakeCredential,
        /// Bytes found after the two credentials, re-emitted unchanged
        extra: Vec<u8>,
    },
    Enterprise {
        network: NetworkId,
        payment: StakeCredential,
    },
    Reward {
        network: NetworkId,
        stake: StakeCredential,
    },
}

impl CardanoAddress {
    // ------------------------------------------------------------------------
    // Decoding
    // ------------------------------------------------------------------------

    /// Decode raw address bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&header_byte, body) = bytes.split_first()?;
        let header = AddressHeader::parse(header_byte)?;
        let network = header.network;

        match header.kind {
            AddressKind::Base => {
                if bytes.len() < BASE_ADDRESS_MIN_LENGTH {
                    debug!(len = bytes.len(), "Base address payload too short");
                    return None;
                }
                let payment = StakeCredential::extract(header.first, body)?;
                let stake = StakeCredential::extract(header.second, &body[CREDENTIAL_LENGTH..])?;
                let extra = body[CREDENTIAL_LENGTH * 2..].to_vec();
                Some(CardanoAddress::Base {
                    network,
                    payment,
                    stake,
                    extra,
                })
            }
            AddressKind::Enterprise => {
                if bytes.len() != SINGLE_CREDENTIAL_ADDRESS_LENGTH {
                    debug!(len = bytes.len(), "Enterprise address has wrong length");
                    return None;
                }
                let payment = StakeCredential::extract(header.first, body)?;
                Some(CardanoAddress::Enterprise { network, payment })
            }
            AddressKind::Reward => {
                if bytes.len() != SINGLE_CREDENTIAL_ADDRESS_LENGTH {
                    debug!(len = bytes.len(), "Reward address has wrong length");
                    return None;
                }
                let stake = StakeCredential::extract(header.first, body)?;
                Some(CardanoAddress::Reward { network, stake })
            }
        }
    }

    /// Decode a hex-encoded raw address, as returned by wallet APIs
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        let bytes = hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str)).ok()?;
        Self::from_bytes(&bytes)
    }

    /// Decode a bech32 address string (e.g. "addr1...", "vector_test1...").
    ///
    /// The prefix must be a known one and must agree with the header: a
    /// payment prefix for base and enterprise addresses, a stake prefix for
    /// reward addresses, and the same network id the header carries.
    pub fn from_bech32(text: &str) -> Option<Self> {
        let (prefix, bytes) = decode_bech32(text)?;
        let Some((network, role)) = network_for_prefix(&prefix) else {
            debug!(prefix = %prefix, "Unrecognized address prefix");
            return None;
        };

        let address = Self::from_bytes(&bytes)?;
        if address.kind().role() != role || address.network() != network {
            debug!(
                prefix = %prefix,
                kind = %address.kind(),
                network = %address.network(),
                "Address prefix does not match its header"
            );
            return None;
        }
        Some(address)
    }

    // ------------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------------

    /// Raw address bytes, header first
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            CardanoAddress::Base {
                network,
                payment,
                stake,
                extra,
            } => {
                let header =
                    (payment.kind.bit() << 4) | (stake.kind.bit() << 5) | (network.0 & 0x0f);
                let mut out = Vec::with_capacity(BASE_ADDRESS_MIN_LENGTH + extra.len());
                out.push(header);
                out.extend_from_slice(&payment.hash);
                out.extend_from_slice(&stake.hash);
                out.extend_from_slice(extra);
                out
            }
            CardanoAddress::Enterprise { network, payment } => {
                single_credential_bytes(ENTERPRISE_HEADER, *network, payment)
            }
            CardanoAddress::Reward { network, stake } => {
                single_credential_bytes(REWARD_HEADER, *network, stake)
            }
        }
    }

    /// Bech32 text form.
    ///
    /// The prefix is chosen from `network_override` when given, otherwise from
    /// the address's own network. Returns `None` when the network has no
    /// prefix or the encoder rejects the payload.
    pub fn to_bech32(&self, network_override: Option<NetworkId>) -> Option<String> {
        let network = network_override.unwrap_or_else(|| self.network());
        let prefix = prefix_for(network, self.kind().role());
        encode_bech32(prefix, &self.to_bytes())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn kind(&self) -> AddressKind {
        match self {
            CardanoAddress::Base { .. } => AddressKind::Base,
            CardanoAddress::Enterprise { .. } => AddressKind::Enterprise,
            CardanoAddress::Reward { .. } => AddressKind::Reward,
        }
    }

    pub fn network(&self) -> NetworkId {
        match self {
            CardanoAddress::Base { network, .. }
            | CardanoAddress::Enterprise { network, .. }
            | CardanoAddress::Reward { network, .. } => *network,
        }
    }

    /// Payment credential; `None` for reward addresses
    pub fn payment(&self) -> Option<&StakeCredential> {
        match self {
            CardanoAddress::Base { payment, .. } | CardanoAddress::Enterprise { payment, .. } => {
                Some(payment)
            }
            CardanoAddress::Reward { .. } => None,
        }
    }

    /// Stake credential; `None` for enterprise addresses
    pub fn stake(&self) -> Option<&StakeCredential> {
        match self {
            CardanoAddress::Base { stake, .. } | CardanoAddress::Reward { stake, .. } => {
                Some(stake)
            }
            CardanoAddress::Enterprise { .. } => None,
        }
    }

    /// Trailing bytes of a base address (empty for the other shapes)
    pub fn extra(&self) -> &[u8] {
        match self {
            CardanoAddress::Base { extra, .. } => extra,
            _ => &[],
        }
    }

    /// Reward address for the stake credential of this address
    pub fn stake_address(&self) -> Option<CardanoAddress> {
        let stake = *self.stake()?;
        Some(CardanoAddress::Reward {
            network: self.network(),
            stake,
        })
    }

    /// Reward addresses only collect staking rewards and never receive transfers
    pub fn is_reward(&self) -> bool {
        self.kind() == AddressKind::Reward
    }
}

impl fmt::Display for CardanoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_bech32(None) {
            Some(text) => write!(f, "{}", text),
            None => write!(f, "{}:{}", self.kind(), hex::encode(self.to_bytes())),
        }
    }
}

fn single_credential_bytes(
    shape: u8,
    network: NetworkId,
    credential: &StakeCredential,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(SINGLE_CREDENTIAL_ADDRESS_LENGTH);
    out.push(shape | (credential.kind.bit() << 4) | (network.0 & 0x0f));
    out.extend_from_slice(&credential.hash);
    out
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode raw bytes as bech32 with the given prefix.
///
/// Returns `None` for an empty or invalid prefix and for results longer than
/// [`MAX_BECH32_LENGTH`].
pub fn encode_bech32(prefix: &str, bytes: &[u8]) -> Option<String> {
    let words = regroup(bytes, 8, 5, true).ok()?;
    let words = words
        .into_iter()
        .map(u5::try_from_u8)
        .collect::<Result<Vec<u5>, _>>()
        .ok()?;

    match bech32::encode(prefix, words, Variant::Bech32) {
        Ok(text) if text.len() <= MAX_BECH32_LENGTH => Some(text),
        Ok(text) => {
            debug!(len = text.len(), "Encoded bech32 exceeds length limit");
            None
        }
        Err(e) => {
            debug!(prefix, error = %e, "Failed to encode bech32");
            None
        }
    }
}

/// Decode a bech32 string to `(prefix, raw bytes)`.
///
/// Rejects bech32m, strings longer than [`MAX_BECH32_LENGTH`], and payloads
/// with non-canonical padding.
pub fn decode_bech32(text: &str) -> Option<(String, Vec<u8>)> {
    if text.len() > MAX_BECH32_LENGTH {
        debug!(len = text.len(), "Bech32 string exceeds length limit");
        return None;
    }

    let (prefix, words, variant) = match bech32::decode(text) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!(error = %e, "Invalid bech32 string");
            return None;
        }
    };
    if variant != Variant::Bech32 {
        debug!(prefix = %prefix, "Bech32m is not used for addresses");
        return None;
    }

    let words: Vec<u8> = words.iter().map(|w| w.to_u8()).collect();
    match regroup(&words, 5, 8, false) {
        Ok(bytes) => Some((prefix, bytes)),
        Err(e) => {
            debug!(prefix = %prefix, error = %e, "Invalid bech32 payload");
            None
        }
    }
}

/// Canonical text form of an address: decode, then re-encode with the
/// address's own network prefix. Decoding already requires the prefix to
/// match the header, so only case and surrounding whitespace change.
pub fn normalize_address(text: &str) -> Option<String> {
    CardanoAddress::from_bech32(text.trim())?.to_bech32(None)
}
