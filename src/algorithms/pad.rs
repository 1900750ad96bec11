//! Conversion between integers and fixed-width RSA blocks.

use num_bigint::BigUint;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Bytes needed to hold an integer of `bits` bits.
#[inline]
pub(crate) fn block_len(bits: usize) -> usize {
    (bits + 7) / 8
}

/// Writes `bytes` right-aligned into a zeroed block of `k` bytes.
fn align_right(bytes: &[u8], k: usize) -> Result<Vec<u8>> {
    let offset = k.checked_sub(bytes.len()).ok_or(Error::InvalidPadLen)?;

    let mut block = vec![0u8; k];
    block[offset..].copy_from_slice(bytes);
    Ok(block)
}

/// Big-endian encoding of `value` as exactly `k` bytes.
#[inline]
pub(crate) fn to_block(value: &BigUint, k: usize) -> Result<Vec<u8>> {
    align_right(&value.to_bytes_be(), k)
}

/// [`to_block`] for secret values: the integer, the intermediate encoding and
/// the block are all wiped on drop.
pub(crate) fn to_zeroizing_block(value: BigUint, k: usize) -> Result<Zeroizing<Vec<u8>>> {
    let value = Zeroizing::new(value);
    let bytes = Zeroizing::new(value.to_bytes_be());
    align_right(&bytes, k).map(Zeroizing::new)
}
