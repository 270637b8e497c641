//! Generic RSA implementation

use alloc::borrow::Cow;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Error, Result};
use crate::math::{mod_inverse, mod_pow};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// ⚠️ Raw RSA encryption of m with the public key. No padding is performed.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// scheme. See the [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_encrypt<K: PublicKeyParts>(key: &K, m: &BigUint) -> Result<BigUint> {
    Ok(mod_pow(m, key.e(), key.n()))
}

/// ⚠️ Performs raw RSA decryption with no padding or error checking.
///
/// Returns a plaintext `BigUint`. Performs RSA blinding if an `Rng` is passed.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// scheme. See the [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_decrypt<R: CryptoRngCore + ?Sized>(
    mut rng: Option<&mut R>,
    priv_key: &impl PrivateKeyParts,
    c: &BigUint,
) -> Result<BigUint> {
    if priv_key.n().is_zero() {
        return Err(Error::InvalidModulus);
    }

    if c >= priv_key.n() {
        return Err(Error::InvalidCiphertext);
    }

    let mut ir = None;

    let c = if let Some(ref mut rng) = rng {
        let (blinded, unblinder) = blind(&mut **rng, priv_key, c)?;
        ir = Some(unblinder);
        Cow::Owned(blinded)
    } else {
        Cow::Borrowed(c)
    };

    let m = match (priv_key.dp(), priv_key.dq(), priv_key.qinv()) {
        (Some(dp), Some(dq), Some(qinv)) => {
            // We have the precalculated values needed for the CRT.
            let p = &priv_key.primes()[0];
            let q = &priv_key.primes()[1];

            let m1 = Zeroizing::new(mod_pow(&c, dp, p));
            let m2 = Zeroizing::new(mod_pow(&c, dq, q));

            // h = qinv * (m1 - m2) mod p
            let m2_mod_p = Zeroizing::new(&*m2 % p);
            let diff = Zeroizing::new(if *m1 >= *m2_mod_p {
                &*m1 - &*m2_mod_p
            } else {
                p - &*m2_mod_p + &*m1
            });
            let h = Zeroizing::new((qinv * &*diff) % p);

            &*m2 + &*h * q
        }
        _ => mod_pow(&c, priv_key.d(), priv_key.n()),
    };

    match ir {
        Some(ref ir) => {
            // unblind
            let mut m = m;
            let unblinded = unblind(priv_key, &m, ir);
            m.zeroize();
            Ok(unblinded)
        }
        None => Ok(m),
    }
}

/// ⚠️ Performs raw RSA decryption with no padding.
///
/// Returns a plaintext `BigUint`. Performs RSA blinding if an `Rng` is passed.  This will also
/// check for errors in the CRT computation.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// scheme. See the [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_decrypt_and_check<R: CryptoRngCore + ?Sized>(
    priv_key: &impl PrivateKeyParts,
    rng: Option<&mut R>,
    c: &BigUint,
) -> Result<BigUint> {
    let m = rsa_decrypt(rng, priv_key, c)?;

    // In order to defend against errors in the CRT computation, m^e is
    // calculated, which should match the original ciphertext.
    let check = rsa_encrypt(priv_key, &m)?;

    if c != &check {
        return Err(Error::Internal);
    }

    Ok(m)
}

/// Returns the blinded c, along with the unblinding factor.
fn blind<R: CryptoRngCore + ?Sized, K: PublicKeyParts>(
    rng: &mut R,
    key: &K,
    c: &BigUint,
) -> Result<(BigUint, BigUint)> {
    // Blinding involves multiplying c by r^e.
    // Then the decryption operation performs (m^e * r^e)^d mod n
    // which equals mr mod n. The factor of r can then be removed
    // by multiplying by the multiplicative inverse of r.
    if key.n() <= &BigUint::one() {
        return Err(Error::InvalidModulus);
    }

    let mut r: BigUint;
    let unblinder;
    loop {
        r = rng.gen_biguint_below(key.n());
        if r.is_zero() {
            r = BigUint::one();
        }
        if let Ok(ir) = mod_inverse(&r, key.n()) {
            unblinder = ir;
            break;
        }
    }

    let c = {
        let mut rpowe = mod_pow(&r, key.e(), key.n()); // N != 0
        let mut c = c * &rpowe;
        c %= key.n();

        rpowe.zeroize();
        r.zeroize();

        c
    };

    Ok((c, unblinder))
}

/// Given an m and and unblinding factor, unblind the m.
fn unblind(key: &impl PublicKeyParts, m: &BigUint, unblinder: &BigUint) -> BigUint {
    (m * unblinder) % key.n()
}
