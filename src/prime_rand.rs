//! Generation of random primes.

use alloc::vec;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::errors::{GenerationError, Result};
use crate::prime::{probably_prime, PRIMALITY_ROUNDS};

/// A list of small, prime numbers that allows us to rapidly
/// exclude some fraction of composite candidates when searching for a random
/// prime. This list is truncated at the point where SMALL_PRIMES_PRODUCT exceeds
/// a u64. It does not include two because we ensure that the candidates are
/// odd by construction.
const SMALL_PRIMES: [u8; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// The product of the values in SMALL_PRIMES. A candidate is reduced by this
/// number, after which coprimality with every element of SMALL_PRIMES is
/// checked without further BigUint operations.
const SMALL_PRIMES_PRODUCT: u64 = 16_294_579_238_595_022_365;

/// Generates a random probable prime of exactly `bit_size` bits.
///
/// The two most significant bits of every candidate are set, so the product
/// of two such primes is never one bit short. Randomness is taken from `rng`
/// only, which must be a cryptographically secure generator.
///
/// # Example
/// ```
/// use enigma::prime_rand::generate_prime;
///
/// let mut rng = rand::thread_rng(); // rand@0.8
///
/// let p = generate_prime(&mut rng, 128).unwrap();
/// assert_eq!(p.bits(), 128);
/// ```
pub fn generate_prime<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<BigUint> {
    if bit_size < 2 {
        return Err(GenerationError::PrimeTooSmall { bits: bit_size }.into());
    }

    let mut b = bit_size % 8;
    if b == 0 {
        b = 8;
    }

    let bytes_len = (bit_size + 7) / 8;
    let mut bytes = Zeroizing::new(vec![0u8; bytes_len]);
    let product = BigUint::from(SMALL_PRIMES_PRODUCT);

    loop {
        rng.fill_bytes(&mut bytes);
        // Clear bits in the first byte to make sure the candidate has a size <= bits.
        bytes[0] &= ((1u32 << (b as u32)) - 1) as u8;

        // Set the two most significant bits.
        if b >= 2 {
            bytes[0] |= 3u8.wrapping_shl(b as u32 - 2);
        } else {
            // b == 1
            bytes[0] |= 1;
            if bytes_len > 1 {
                bytes[1] |= 0x80;
            }
        }

        // Make the value odd since an even number this large certainly isn't prime.
        bytes[bytes_len - 1] |= 1u8;

        let mut p = BigUint::from_bytes_be(&bytes);
        // always fits, SMALL_PRIMES_PRODUCT is a u64
        let rem = (&p % &product).to_u64().unwrap_or_default();

        'next: for delta in (0..1u64 << 20).step_by(2) {
            let m = rem + delta;

            for prime in &SMALL_PRIMES {
                if m % u64::from(*prime) == 0 && (bit_size > 6 || m != u64::from(*prime)) {
                    continue 'next;
                }
            }

            if delta > 0 {
                p += BigUint::from(delta);
            }

            break;
        }

        // Adding delta may have made the number one bit too long.
        if p.bits() == bit_size && probably_prime(rng, &p, PRIMALITY_ROUNDS) {
            return Ok(p);
        }
    }
}
