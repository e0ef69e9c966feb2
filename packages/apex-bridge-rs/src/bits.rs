//! Bit Regrouping
//!
//! Converts a sequence of `in_bits`-wide symbols into a sequence of
//! `out_bits`-wide symbols. Bech32 payloads are carried as 5-bit words, so
//! every address goes through this twice: 8 → 5 (padded) when encoding and
//! 5 → 8 (strict) when decoding.
//!
//! Strict mode rejects leftover padding so that every byte sequence has
//! exactly one text form.

use thiserror::Error;

/// Errors raised when the caller hands the regrouper input that breaks its contract
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegroupError {
    #[error("Unsupported symbol width: {in_bits} -> {out_bits} bits")]
    UnsupportedWidth { in_bits: u32, out_bits: u32 },

    #[error("Symbol {value} does not fit in {in_bits} bits")]
    InvalidSymbol { value: u8, in_bits: u32 },

    #[error("Excess padding: {leftover} leftover bits")]
    ExcessPadding { leftover: u32 },

    #[error("Non-zero padding")]
    NonZeroPadding,
}

/// Regroup `data` from `in_bits`-wide symbols into `out_bits`-wide symbols.
///
/// With `pad` set, trailing bits are zero-filled into a final symbol. Without
/// it, the leftover must be shorter than one input symbol and all zero.
pub fn regroup(
    data: &[u8],
    in_bits: u32,
    out_bits: u32,
    pad: bool,
) -> Result<Vec<u8>, RegroupError> {
    if !(1..=8).contains(&in_bits) || !(1..=8).contains(&out_bits) {
        return Err(RegroupError::UnsupportedWidth { in_bits, out_bits });
    }

    let max_out: u32 = (1 << out_bits) - 1;
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity((data.len() * in_bits as usize).div_ceil(out_bits as usize));

    for &value in data {
        if u32::from(value) >> in_bits != 0 {
            return Err(RegroupError::InvalidSymbol { value, in_bits });
        }
        // Only the low `out_bits + in_bits` bits are ever read back.
        acc = ((acc << in_bits) | u32::from(value)) & 0xffff;
        bits += in_bits;
        while bits >= out_bits {
            bits -= out_bits;
            out.push(((acc >> bits) & max_out) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (out_bits - bits)) & max_out) as u8);
        }
    } else if bits >= in_bits {
        return Err(RegroupError::ExcessPadding { leftover: bits });
    } else if (acc << (out_bits - bits)) & max_out != 0 {
        return Err(RegroupError::NonZeroPadding);
    }

    Ok(out)
}
