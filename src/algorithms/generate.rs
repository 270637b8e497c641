//! Generate prime components for the RSA Private Key

use alloc::vec::Vec;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;

use crate::{
    errors::{Error, GenerationError, Result},
    key::{check_public_exponent, RsaPublicKey},
    math::{lcm, mod_inverse},
    prime_rand::generate_prime,
};

/// Smallest modulus size, in bits, the key generator accepts: two primes of
/// at least two bits each.
pub const MIN_GENERATION_BITS: usize = 4;

pub(crate) struct RsaPrivateKeyComponents {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
    pub primes: Vec<BigUint>,
}

/// Generates a two-prime RSA keypair of the given bit size and public
/// exponent, using the given random source.
///
/// `p` gets `bit_size / 2` bits and `q` the remaining bits. A candidate pair is
/// rejected and redrawn when `p == q`, when `p·q` does not have exactly
/// `bit_size` bits, or when `e` is not invertible modulo `lcm(p-1, q-1)`.
/// After `max_attempts` rejected pairs the search gives up.
pub(crate) fn generate_key_with_exp<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
    max_attempts: usize,
) -> Result<RsaPrivateKeyComponents> {
    if bit_size < MIN_GENERATION_BITS {
        return Err(GenerationError::ModulusTooSmall {
            bits: bit_size,
            min: MIN_GENERATION_BITS,
        }
        .into());
    }

    if bit_size > RsaPublicKey::MAX_SIZE {
        return Err(GenerationError::ModulusTooLarge {
            bits: bit_size,
            max: RsaPublicKey::MAX_SIZE,
        }
        .into());
    }

    check_public_exponent(exp)?;
    // Every modulus of `bit_size` bits must exceed the exponent.
    if exp.bits() >= bit_size {
        return Err(Error::PublicExponentTooLarge);
    }

    if bit_size < 64 {
        let prime_limit = (1u64 << (bit_size / 2) as u64) as f64;

        // pi approximates the number of primes less than prime_limit

        // Calculate `log(prime_limit)` as `log(x) = log2(x) / log2(e) = log2(x) * log(2)`.
        let mut pi = prime_limit / ((bit_size / 2) as f64 * core::f64::consts::LN_2 - 1.);

        // Generated primes start with 0b11, so we can only use a quarter of them.
        pi /= 4f64;
        // Use a factor of two to ensure that key generation terminates in a
        // reasonable amount of time.
        pi /= 2f64;

        if pi < 2f64 {
            return Err(GenerationError::TooFewPrimes.into());
        }
    }

    tracing::debug!(bits = bit_size, max_attempts, "generating RSA key pair");

    let one = BigUint::one();
    for attempt in 1..=max_attempts {
        // `generate_prime` sets the top two bits of each prime, so the
        // product has either `bit_size` or `bit_size - 1` bits.
        let p = generate_prime(rng, bit_size / 2)?;
        let q = generate_prime(rng, bit_size - p.bits())?;

        if p == q {
            tracing::trace!(attempt, "rejected candidate primes: p == q");
            continue;
        }

        let n = &p * &q;
        if n.bits() != bit_size {
            tracing::trace!(
                attempt,
                modulus_bits = n.bits(),
                "rejected candidate primes: modulus has wrong size"
            );
            continue;
        }

        let lambda = lcm(&(&p - &one), &(&q - &one));
        if !exp.gcd(&lambda).is_one() {
            tracing::trace!(
                attempt,
                "rejected candidate primes: exponent not coprime to lcm(p-1, q-1)"
            );
            continue;
        }

        let d = mod_inverse(exp, &lambda)?;

        tracing::debug!(bits = bit_size, attempts = attempt, "generated RSA key pair");

        return Ok(RsaPrivateKeyComponents {
            n,
            e: exp.clone(),
            d,
            primes: vec![p, q],
        });
    }

    tracing::debug!(
        bits = bit_size,
        attempts = max_attempts,
        "giving up on RSA key generation"
    );
    Err(GenerationError::RetriesExhausted {
        attempts: max_attempts,
    }
    .into())
}
