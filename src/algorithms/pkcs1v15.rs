//! PKCS#1 v1.5 encryption padding as described in [RFC8017 § 7.2].
//!
//! [RFC8017 § 7.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.2

use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Bytes of overhead added by the padding: two header bytes, at least eight
/// bytes of random padding and the zero separator.
pub(crate) const PADDING_OVERHEAD: usize = 11;

/// Largest message a `k` byte block can carry.
#[inline]
pub(crate) fn max_message_len(k: usize) -> usize {
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

/// Applies the padding scheme from PKCS#1 v1.5 for encryption. The message
/// must be no longer than the length of the public modulus minus 11 bytes.
pub(crate) fn pkcs1v15_encrypt_pad<R>(
    rng: &mut R,
    msg: &[u8],
    k: usize,
) -> Result<Zeroizing<Vec<u8>>>
where
    R: CryptoRngCore + ?Sized,
{
    if msg.len() + PADDING_OVERHEAD > k {
        return Err(Error::PayloadTooLarge {
            len: msg.len(),
            max: max_message_len(k),
        });
    }

    // EM = 0x00 || 0x02 || PS || 0x00 || M
    let mut em = Zeroizing::new(vec![0u8; k]);
    em[1] = 2;
    non_zero_random_bytes(rng, &mut em[2..k - msg.len() - 1]);
    em[k - msg.len() - 1] = 0;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Removes the encryption padding scheme from PKCS#1 v1.5.
///
/// Note that whether this function returns an error or not discloses secret
/// information. If an attacker can cause this function to run repeatedly and
/// learn whether each instance returned an error then they can decrypt
/// ciphertexts as if they had the private key.
#[inline]
pub(crate) fn pkcs1v15_encrypt_unpad(em: &[u8], k: usize) -> Result<Vec<u8>> {
    let (valid, index) = decrypt_inner(em, k)?;
    if valid == 0 {
        return Err(Error::InvalidPadding);
    }

    Ok(em[index as usize..].to_vec())
}

/// Checks the structure of a PKCS#1 v1.5 encryption block. Returns one or
/// zero in `valid`; if the block is valid, `index` is the offset of the
/// message in `em`. The whole block is scanned either way so the memory
/// access pattern does not depend on where the separator is.
#[inline]
fn decrypt_inner(em: &[u8], k: usize) -> Result<(u8, u32)> {
    if k < PADDING_OVERHEAD || em.len() != k {
        return Err(Error::InvalidPadding);
    }

    let first_byte_is_zero = em[0].ct_eq(&0u8);
    let second_byte_is_two = em[1].ct_eq(&2u8);

    // The remainder of the block must be a string of non-zero random
    // octets, followed by a 0, followed by the message.
    //   looking_for_index: 1 iff we are still looking for the zero.
    //   index: the offset of the first zero byte.
    let mut looking_for_index = 1u8;
    let mut index = 0u32;

    for (i, el) in em.iter().enumerate().skip(2) {
        let equals0 = el.ct_eq(&0u8);
        index.conditional_assign(&(i as u32), Choice::from(looking_for_index) & equals0);
        looking_for_index.conditional_assign(&0u8, equals0);
    }

    // PS starts two bytes into em and is at least 8 bytes long, so the
    // separator sits at index 10 or later. The top bit of 9 - index is set
    // exactly when index >= 10.
    let valid_ps = Choice::from(((9u32.wrapping_sub(index) >> 31) & 1) as u8);
    let valid =
        first_byte_is_zero & second_byte_is_two & Choice::from(!looking_for_index & 1) & valid_ps;
    index = u32::conditional_select(&0, &(index + 1), valid);

    Ok((valid.unwrap_u8(), index))
}
