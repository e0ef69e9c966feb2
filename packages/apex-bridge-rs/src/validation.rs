//! Transfer validation
//!
//! Checks a proposed transfer against the bridging settings before it is
//! handed to a wallet for signing. Checks run in a fixed order and stop at
//! the first failure:
//!
//! 1. A direction rule must allow `token` from `source` to `destination`
//! 2. Currency or wrapped-token bounds are selected for the resolved mode
//! 3. `amount` must reach the minimum
//! 4. `amount` must not exceed a non-zero maximum
//! 5. The receiver must be a valid address for the destination chain
//!
//! The amount must already be in the source chain's smallest unit. Every
//! failure is returned as a value whose `Display` text can be shown to the
//! user as is.

use thiserror::Error;
use tracing::debug;

use crate::address_codec::CardanoAddress;
use crate::network::NetworkId;
use crate::settings::BridgingSettings;
use crate::types::{is_valid_evm_address, BridgingMode, ChainId, ChainKind, TokenId};
use crate::units::format_amount;

/// Why a transfer was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported direction: bridging token {token} from {source_chain} to {destination} is not allowed")]
    UnsupportedDirection {
        source_chain: ChainId,
        destination: ChainId,
        token: TokenId,
    },

    #[error("Chain {chain} is not configured")]
    ChainNotConfigured { chain: ChainId },

    #[error("No {mode} bridging limits are configured for {chain}")]
    LimitsNotConfigured { mode: BridgingMode, chain: ChainId },

    #[error("Amount too low: the minimum is {display} {symbol} ({raw})")]
    BelowMinimum {
        display: String,
        symbol: String,
        raw: u128,
    },

    #[error("Amount too high: the maximum is {display} {symbol} ({raw})")]
    AboveMaximum {
        display: String,
        symbol: String,
        raw: u128,
    },

    #[error("Invalid {chain} address")]
    InvalidAddress { chain: ChainId },

    #[error("Stake (reward) addresses cannot receive bridged funds")]
    RewardAddress,

    #[error("Address is not in canonical form")]
    NonCanonicalAddress,

    #[error("Address belongs to network {network}, which is not valid for {chain}")]
    WrongNetwork { chain: ChainId, network: NetworkId },
}

/// A proposed transfer
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    pub source: ChainId,
    pub destination: ChainId,
    /// Receiver address on the destination chain
    pub receiver: &'a str,
    /// Amount in the source chain's smallest unit
    pub amount: u128,
    pub token: TokenId,
}

/// Validate a transfer, returning the user-facing reason it is rejected or
/// `None` when it may proceed.
pub fn validate_transfer(settings: &BridgingSettings, request: &TransferRequest<'_>) -> Option<String> {
    check_transfer(settings, request).err().map(|e| e.to_string())
}

/// Validate a transfer, returning the first failed check
pub fn check_transfer(
    settings: &BridgingSettings,
    request: &TransferRequest<'_>,
) -> Result<(), ValidationError> {
    let result = run_checks(settings, request);
    if let Err(e) = &result {
        debug!(
            source = %request.source,
            destination = %request.destination,
            token = %request.token,
            amount = %request.amount,
            reason = %e,
            "Transfer rejected"
        );
    }
    result
}

fn run_checks(
    settings: &BridgingSettings,
    request: &TransferRequest<'_>,
) -> Result<(), ValidationError> {
    let TransferRequest {
        source,
        destination,
        receiver,
        amount,
        token,
    } = *request;

    let mode = settings
        .resolve_mode(source, destination, token)
        .ok_or(ValidationError::UnsupportedDirection {
            source_chain: source,
            destination,
            token,
        })?;

    if settings.chain(source).is_none() {
        return Err(ValidationError::ChainNotConfigured { chain: source });
    }

    let bounds = settings
        .bounds_for(mode, source, token)
        .ok_or(ValidationError::LimitsNotConfigured {
            mode,
            chain: source,
        })?;

    let decimals = source.decimals();
    if amount < bounds.min {
        return Err(ValidationError::BelowMinimum {
            display: format_amount(bounds.min, decimals),
            symbol: settings.token_symbol(source, token),
            raw: bounds.min,
        });
    }

    if bounds.is_bounded() && amount > bounds.max {
        return Err(ValidationError::AboveMaximum {
            display: format_amount(bounds.max, decimals),
            symbol: settings.token_symbol(source, token),
            raw: bounds.max,
        });
    }

    validate_receiver(settings, destination, receiver)
}

/// Check that `receiver` can receive funds on `destination`
pub fn validate_receiver(
    settings: &BridgingSettings,
    destination: ChainId,
    receiver: &str,
) -> Result<(), ValidationError> {
    match destination.kind() {
        ChainKind::Utxo => validate_utxo_receiver(settings, destination, receiver),
        ChainKind::Account => {
            if is_valid_evm_address(receiver) {
                Ok(())
            } else {
                Err(ValidationError::InvalidAddress { chain: destination })
            }
        }
    }
}

fn validate_utxo_receiver(
    settings: &BridgingSettings,
    destination: ChainId,
    receiver: &str,
) -> Result<(), ValidationError> {
    let address = CardanoAddress::from_bech32(receiver)
        .ok_or(ValidationError::InvalidAddress { chain: destination })?;

    if address.is_reward() {
        return Err(ValidationError::RewardAddress);
    }

    if address.to_bech32(None).as_deref() != Some(receiver) {
        return Err(ValidationError::NonCanonicalAddress);
    }

    let network = address.network();
    if !settings.allowed_networks(destination).contains(&network) {
        return Err(ValidationError::WrongNetwork {
            chain: destination,
            network,
        });
    }

    Ok(())
}
