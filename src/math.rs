//! Modular arithmetic on arbitrary-precision integers.

use num_bigint::Sign::Plus;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Computes `base^exponent mod modulus` with a Montgomery ladder.
///
/// Every bit of the exponent costs exactly one modular multiplication and one
/// modular squaring, whatever its value. This keeps the sequence of operations
/// independent of the exponent; it does not make the underlying big integer
/// arithmetic constant time.
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    let mut r0 = BigUint::one() % modulus;
    let mut r1 = base % modulus;

    let exp_bytes = Zeroizing::new(exponent.to_bytes_be());
    for byte in exp_bytes.iter() {
        for shift in (0..8).rev() {
            if (byte >> shift) & 1 == 1 {
                r0 = (&r0 * &r1) % modulus;
                r1 = (&r1 * &r1) % modulus;
            } else {
                r1 = (&r0 * &r1) % modulus;
                r0 = (&r0 * &r0) % modulus;
            }
        }
    }

    r0
}

/// Calculates the [modular multiplicative inverse] of `a` modulo `modulus`
/// with the extended Euclidean algorithm.
///
/// Returns [`Error::NotInvertible`] when `gcd(a, modulus) != 1` or when the
/// modulus is zero.
///
/// [modular multiplicative inverse]: https://en.wikipedia.org/wiki/Modular_multiplicative_inverse
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::NotInvertible);
    }

    let m = BigInt::from_biguint(Plus, modulus.clone());
    let mut old_r = BigInt::from_biguint(Plus, a % modulus);
    let mut r = m.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = core::mem::replace(&mut r, next_r);

        let next_s = &old_s - &q * &s;
        old_s = core::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return Err(Error::NotInvertible);
    }

    old_s.mod_floor(&m).to_biguint().ok_or(Error::NotInvertible)
}

/// Returns the Jacobi symbol `(a/n)`, one of `1`, `-1` or `0`.
///
/// Returns `None` when `n` is even, for which the symbol is undefined.
pub fn jacobi(a: &BigUint, n: &BigUint) -> Option<isize> {
    if n.is_even() {
        return None;
    }

    let mut a = a % n;
    let mut b = n.clone();
    let mut j = 1;

    loop {
        if b.is_one() {
            return Some(j);
        }
        if a.is_zero() {
            return Some(0);
        }

        // a = 2^s * c
        let s = trailing_zeros(&a);
        if s & 1 != 0 {
            let bmod8 = low_bits(&b, 8);
            if bmod8 == 3 || bmod8 == 5 {
                j = -j;
            }
        }
        let c = &a >> s;

        // quadratic reciprocity
        if low_bits(&b, 4) == 3 && low_bits(&c, 4) == 3 {
            j = -j;
        }

        a = &b % &c;
        b = c;
    }
}

/// Least common multiple.
pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    a.lcm(b)
}

/// Number of trailing zero bits in `x`; zero for `x == 0`.
pub(crate) fn trailing_zeros(x: &BigUint) -> usize {
    x.to_bytes_le()
        .iter()
        .enumerate()
        .find(|(_, byte)| **byte != 0)
        .map(|(i, byte)| i * 8 + byte.trailing_zeros() as usize)
        .unwrap_or(0)
}

/// `x mod m` for a small power-of-two `m`.
fn low_bits(x: &BigUint, m: u32) -> u32 {
    (x % m).to_u32().unwrap_or_default()
}
