//! PKCS#1 v1.5 block formatting as described in [RFC8017 § 7.2] and
//! [RFC8017 § 9.2], without the DigestInfo wrapping.
//!
//! ```text
//! EM = 0x00 || BT || PS || 0x00 || payload
//! ```
//!
//! Block type 2 (encryption) fills PS with non-zero random bytes, block type 1
//! (signatures) with `0xFF`. PS is always at least eight bytes long.
//!
//! [RFC8017 § 7.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.2
//! [RFC8017 § 9.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-9.2

use core::fmt;

use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeGreater};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Bytes of framing added around a payload: two header bytes, eight bytes of
/// padding and the separator.
pub const PADDING_OVERHEAD: usize = 11;

/// Minimum length of the padding string PS.
pub const MIN_PADDING_LEN: usize = 8;

/// The second byte of a padded block.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum BlockType {
    /// Type 1, `0xFF` padding, used for signatures.
    Signature = 1,
    /// Type 2, random non-zero padding, used for encryption.
    Encryption = 2,
}

/// Largest payload that fits in a block of `k` bytes.
#[inline]
pub fn max_payload_len(k: usize) -> usize {
    k.saturating_sub(PADDING_OVERHEAD)
}

/// Fills the provided slice with random values, which are guaranteed
/// to not be zero.
#[inline]
fn non_zero_random_bytes<R: CryptoRngCore + ?Sized>(rng: &mut R, data: &mut [u8]) {
    rng.fill_bytes(data);

    for el in data {
        while *el == 0u8 {
            rng.fill_bytes(core::slice::from_mut(el));
        }
    }
}

/// Applies the type 2 padding scheme for encryption. The message must be no
/// longer than `k - 11` bytes.
pub fn pkcs1v15_encrypt_pad<R>(rng: &mut R, msg: &[u8], k: usize) -> Result<Zeroizing<Vec<u8>>>
where
    R: CryptoRngCore + ?Sized,
{
    if msg.len() + PADDING_OVERHEAD > k {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x02 || PS || 0x00 || M
    let mut em = Zeroizing::new(vec![0u8; k]);
    em[1] = BlockType::Encryption as u8;
    non_zero_random_bytes(rng, &mut em[2..k - msg.len() - 1]);
    em[k - msg.len() - 1] = 0;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Applies the type 1 padding scheme to an already hashed payload.
pub fn pkcs1v15_sign_pad(payload: &[u8], k: usize) -> Result<Vec<u8>> {
    let t_len = payload.len();
    if t_len + PADDING_OVERHEAD > k {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x01 || PS || 0x00 || T
    let mut em = vec![0xff; k];
    em[0] = 0;
    em[1] = BlockType::Signature as u8;
    em[k - t_len - 1] = 0;
    em[k - t_len..k].copy_from_slice(payload);

    Ok(em)
}

/// Checks in constant time that `em` is exactly the type 1 block carrying
/// `payload`.
pub(crate) fn pkcs1v15_sign_unpad(payload: &[u8], em: &[u8]) -> Result<()> {
    let k = em.len();
    let t_len = payload.len();
    if k < t_len + PADDING_OVERHEAD {
        return Err(Error::InvalidPadding);
    }

    // EM = 0x00 || 0x01 || PS || 0x00 || T
    let mut ok = em[0].ct_eq(&0u8);
    ok &= em[1].ct_eq(&(BlockType::Signature as u8));
    ok &= em[k - t_len..k].ct_eq(payload);
    ok &= em[k - t_len - 1].ct_eq(&0u8);

    for el in em.iter().skip(2).take(k - t_len - 3) {
        ok &= el.ct_eq(&0xff)
    }

    if ok.unwrap_u8() != 1 {
        return Err(Error::InvalidPadding);
    }

    Ok(())
}

/// Removes padding of the given block type and returns the payload.
///
/// Every byte of `em` is inspected regardless of where a defect sits, and all
/// defects map to the same [`Error::InvalidPadding`]. Callers must still not
/// reveal to an attacker which ciphertexts failed to unpad.
pub fn pkcs1v15_unpad(em: &[u8], block_type: BlockType) -> Result<Vec<u8>> {
    let (valid, index) = unpad_inner(em, block_type)?;
    if valid.unwrap_u8() == 0 {
        return Err(Error::InvalidPadding);
    }

    Ok(em[index..].to_vec())
}

/// Returns whether `em` is a well formed block and, if so, the offset of the
/// payload. The scan touches every byte so that timing does not depend on
/// where the separator sits.
#[inline]
fn unpad_inner(em: &[u8], block_type: BlockType) -> Result<(Choice, usize)> {
    if em.len() < PADDING_OVERHEAD {
        return Err(Error::InvalidPadding);
    }

    let first_byte_is_zero = em[0].ct_eq(&0u8);
    let block_type_matches = em[1].ct_eq(&(block_type as u8));

    //   looking_for_index: 1 iff we are still looking for the zero.
    //   index: the offset of the first zero byte.
    //   ps_ok: 0 once a type 1 padding byte other than 0xFF was seen.
    let mut looking_for_index = Choice::from(1u8);
    let mut index = 0u32;
    let mut ps_ok = Choice::from(1u8);

    for (i, el) in em.iter().enumerate().skip(2) {
        let equals0 = el.ct_eq(&0u8);
        index.conditional_assign(&(i as u32), looking_for_index & equals0);

        if block_type == BlockType::Signature {
            let in_ps = looking_for_index & !equals0;
            ps_ok &= !in_ps | el.ct_eq(&0xff);
        }

        looking_for_index &= !equals0;
    }

    // PS spans em[2..index] and must be at least eight bytes long.
    let valid_ps = index.ct_gt(&((2 + MIN_PADDING_LEN - 1) as u32));
    let valid = first_byte_is_zero & block_type_matches & !looking_for_index & valid_ps & ps_ok;
    let index = u32::conditional_select(&0, &(index + 1), valid);

    Ok((valid, index as usize))
}

/// A structural defect found by [`analyze_padding`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PaddingDefect {
    /// Block shorter than the eleven bytes of framing.
    TooShort,
    /// First byte is not `0x00`.
    LeadingByte(u8),
    /// Second byte is neither 1 nor 2.
    UnknownBlockType(u8),
    /// No `0x00` separator after the padding.
    MissingSeparator,
    /// Padding string shorter than eight bytes.
    PaddingTooShort(usize),
    /// Type 1 padding contains a byte other than `0xFF`.
    NonFfPadding,
}

impl fmt::Display for PaddingDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PaddingDefect::TooShort => write!(f, "block too short"),
            PaddingDefect::LeadingByte(b) => write!(f, "invalid first byte: {:#04x}", b),
            PaddingDefect::UnknownBlockType(b) => write!(f, "invalid block type: {:#04x}", b),
            PaddingDefect::MissingSeparator => write!(f, "no separator found"),
            PaddingDefect::PaddingTooShort(len) => write!(f, "padding too short: {} bytes", len),
            PaddingDefect::NonFfPadding => write!(f, "signature padding is not all 0xff"),
        }
    }
}

/// Structure of a padded block, as reported by [`analyze_padding`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PaddingReport {
    /// Length of the inspected block.
    pub length: usize,
    /// Second byte of the block, if present.
    pub block_type: Option<u8>,
    /// Length of the padding string PS.
    pub padding_len: usize,
    /// Length of the payload after the separator.
    pub message_len: usize,
    /// Everything wrong with the block. Empty for a well formed block.
    pub defects: Vec<PaddingDefect>,
}

impl PaddingReport {
    /// Returns `true` when no defect was found.
    pub fn is_valid(&self) -> bool {
        self.defects.is_empty()
    }
}

/// Describes the structure of a padded block, listing every defect.
///
/// Diagnostic only: unlike [`pkcs1v15_unpad`] this is not constant time, and
/// its output must never be derived from attacker supplied ciphertexts.
pub fn analyze_padding(em: &[u8]) -> PaddingReport {
    let mut report = PaddingReport {
        length: em.len(),
        ..Default::default()
    };

    if em.len() < PADDING_OVERHEAD {
        report.defects.push(PaddingDefect::TooShort);
        return report;
    }

    if em[0] != 0 {
        report.defects.push(PaddingDefect::LeadingByte(em[0]));
    }

    report.block_type = Some(em[1]);
    if em[1] != BlockType::Signature as u8 && em[1] != BlockType::Encryption as u8 {
        report.defects.push(PaddingDefect::UnknownBlockType(em[1]));
    }

    let separator = match em.iter().skip(2).position(|&b| b == 0) {
        Some(pos) => pos + 2,
        None => {
            report.defects.push(PaddingDefect::MissingSeparator);
            return report;
        }
    };

    let ps = &em[2..separator];
    report.padding_len = ps.len();
    report.message_len = em.len() - separator - 1;

    if ps.len() < MIN_PADDING_LEN {
        let defect = PaddingDefect::PaddingTooShort(ps.len());
        report.defects.push(defect);
    }

    if em[1] == BlockType::Signature as u8 && ps.iter().any(|&b| b != 0xff) {
        report.defects.push(PaddingDefect::NonFfPadding);
    }

    report
}
