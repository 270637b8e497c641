use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithms::generate::generate_key_with_exp;
use crate::dummy_rng::DummyRng;
use crate::errors::{Error, Result};
use crate::math::mod_inverse;
use crate::traits::{PaddingScheme, PrivateKeyParts, PublicKeyParts};

/// Represents the public part of an RSA key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// Modulus: product of prime numbers `p` and `q`
    n: BigUint,
    /// Public exponent: power to which a plaintext message is raised in
    /// order to encrypt it.
    ///
    /// Typically 0x10001 (65537)
    e: BigUint,
}

/// Represents a whole RSA key, public and private parts.
#[derive(Clone)]
pub struct RsaPrivateKey {
    /// Public components of the private key.
    pubkey_components: RsaPublicKey,
    /// Private exponent
    pub(crate) d: BigUint,
    /// Prime factors of N, exactly two elements: `[p, q]`.
    pub(crate) primes: Vec<BigUint>,
    /// precomputed values, derived from prime factors
    pub(crate) precomputed: Option<PrecomputedValues>,
}

impl Eq for RsaPrivateKey {}
impl PartialEq for RsaPrivateKey {
    #[inline]
    fn eq(&self, other: &RsaPrivateKey) -> bool {
        self.pubkey_components == other.pubkey_components
            && self.d == other.d
            && self.primes == other.primes
    }
}

impl AsRef<RsaPublicKey> for RsaPrivateKey {
    fn as_ref(&self) -> &RsaPublicKey {
        &self.pubkey_components
    }
}

impl Hash for RsaPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Domain separator for RSA public keys
        state.write(b"RsaPublicKey");
        Hash::hash(&self.n, state);
        Hash::hash(&self.e, state);
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &format_args!("{}", self.n()))
            .field("e", &format_args!("{}", self.e()))
            .finish_non_exhaustive()
    }
}

impl Zeroize for RsaPrivateKey {
    fn zeroize(&mut self) {
        self.d.zeroize();
        for prime in self.primes.iter_mut() {
            prime.zeroize();
        }
        self.primes.clear();
        if let Some(mut precomputed) = self.precomputed.take() {
            precomputed.zeroize();
        }
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for RsaPrivateKey {}

/// Values derived from the prime factors, used by the CRT decryption path.
#[derive(Clone)]
pub(crate) struct PrecomputedValues {
    /// D mod (P-1)
    pub(crate) dp: BigUint,
    /// D mod (Q-1)
    pub(crate) dq: BigUint,
    /// Q^-1 mod P
    pub(crate) qinv: BigUint,
}

impl Zeroize for PrecomputedValues {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Drop for PrecomputedValues {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl From<RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: RsaPrivateKey) -> Self {
        (&private_key).into()
    }
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: &RsaPrivateKey) -> Self {
        let n = private_key.n().clone();
        let e = private_key.e().clone();
        RsaPublicKey { n, e }
    }
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl RsaPublicKey {
    /// Minimum value of the public exponent `e`.
    pub const MIN_PUB_EXPONENT: u64 = 2;

    /// Maximum value of the public exponent `e`.
    pub const MAX_PUB_EXPONENT: u64 = (1 << 33) - 1;

    /// Maximum size of the modulus `n` in bits.
    pub const MAX_SIZE: usize = 16384;

    /// Encrypt the given message.
    pub fn encrypt<R: CryptoRngCore + ?Sized, P: PaddingScheme>(
        &self,
        rng: &mut R,
        padding: P,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        padding.encrypt(rng, self, msg)
    }

    /// Create a new public key from its components.
    ///
    /// This function accepts public keys with a modulus size up to 16384-bits,
    /// i.e. [`RsaPublicKey::MAX_SIZE`].
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        Self::new_with_max_size(n, e, Self::MAX_SIZE)
    }

    /// Create a new public key from its components.
    pub fn new_with_max_size(n: BigUint, e: BigUint, max_size: usize) -> Result<Self> {
        let k = Self { n, e };
        check_public_with_max_size(&k, max_size)?;
        Ok(k)
    }

    /// Create a new public key, bypassing checks around the modulus and public
    /// exponent size.
    ///
    /// This method is not recommended, and only intended for unusual use cases.
    /// Most applications should use [`RsaPublicKey::new`] or
    /// [`RsaPublicKey::new_with_max_size`] instead.
    pub fn new_unchecked(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    /// Largest plaintext, in bytes, that fits into a single PKCS#1 v1.5
    /// encryption block under this key.
    pub fn max_message_len(&self) -> usize {
        crate::algorithms::pkcs1v15::max_message_len(self.size())
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.pubkey_components.n
    }

    fn e(&self) -> &BigUint {
        &self.pubkey_components.e
    }
}

impl RsaPrivateKey {
    /// Default exponent for RSA keys.
    const EXP: u64 = 65537;

    /// Generate a new Rsa key pair of the given bit size using the passed in `rng`.
    pub fn new<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<RsaPrivateKey> {
        let exp = BigUint::from(Self::EXP);
        Self::new_with_exp(rng, bit_size, &exp)
    }

    /// Generate a new RSA key pair of the given bit size and the public exponent
    /// using the passed in `rng`.
    ///
    /// Unless you have specific needs, you should use `RsaPrivateKey::new` instead.
    pub fn new_with_exp<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        bit_size: usize,
        exp: &BigUint,
    ) -> Result<RsaPrivateKey> {
        let config = GenerationConfig::new(bit_size).with_exponent(exp.clone());
        Self::new_with_config(rng, &config)
    }

    /// Generate a new RSA key pair as described by `config`.
    pub fn new_with_config<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        config: &GenerationConfig,
    ) -> Result<RsaPrivateKey> {
        let components =
            generate_key_with_exp(rng, config.bits, &config.exponent, config.max_attempts)?;
        RsaPrivateKey::from_components(components.n, components.e, components.d, components.primes)
    }

    /// Constructs an RSA key pair from individual components:
    ///
    /// - `n`: RSA modulus
    /// - `e`: public exponent (i.e. encrypting exponent)
    /// - `d`: private exponent (i.e. decrypting exponent)
    /// - `primes`: the two prime factors `[p, q]` of `n`
    ///
    /// The key is validated and its CRT values are precomputed.
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        primes: Vec<BigUint>,
    ) -> Result<RsaPrivateKey> {
        if primes.len() != 2 {
            return Err(Error::InvalidPrime);
        }

        let mut k = RsaPrivateKey {
            pubkey_components: RsaPublicKey::new_unchecked(n, e),
            d,
            primes,
            precomputed: None,
        };

        k.validate()?;
        k.precompute()?;

        Ok(k)
    }

    /// Constructs an RSA key pair from its two primes p and q.
    ///
    /// This will rebuild the private exponent and the modulus.
    pub fn from_p_q(p: BigUint, q: BigUint, public_exponent: BigUint) -> Result<RsaPrivateKey> {
        if p == q {
            return Err(Error::InvalidPrime);
        }
        if p <= BigUint::one() || q <= BigUint::one() {
            return Err(Error::InvalidPrime);
        }

        let one = BigUint::one();
        let lambda = (&p - &one).lcm(&(&q - &one));
        let d = mod_inverse(&public_exponent, &lambda)?;
        let n = &p * &q;

        Self::from_components(n, public_exponent, d, vec![p, q])
    }

    /// Get the public key from the private key, cloning `n` and `e`.
    ///
    /// Generally this is not needed since `RsaPrivateKey` implements the `PublicKey` trait,
    /// but it can occasionally be useful to discard the private information entirely.
    pub fn to_public_key(&self) -> RsaPublicKey {
        self.pubkey_components.clone()
    }

    /// Performs some calculations to speed up private key operations.
    pub fn precompute(&mut self) -> Result<()> {
        if self.precomputed.is_some() {
            return Ok(());
        }

        let (p, q) = match self.primes.as_slice() {
            [p, q] => (p, q),
            _ => return Err(Error::InvalidPrime),
        };

        let one = BigUint::one();
        let dp = &self.d % (p - &one);
        let dq = &self.d % (q - &one);
        let qinv = mod_inverse(q, p).map_err(|_| Error::InvalidCoefficient)?;

        self.precomputed = Some(PrecomputedValues { dp, dq, qinv });

        Ok(())
    }

    /// Clears precomputed values by setting to None
    pub fn clear_precomputed(&mut self) {
        self.precomputed = None;
    }

    /// Compute CRT coefficient: `(1/q) mod p`.
    pub fn crt_coefficient(&self) -> Option<BigUint> {
        match self.primes.as_slice() {
            [p, q] => mod_inverse(q, p).ok(),
            _ => None,
        }
    }

    /// Performs basic sanity checks on the key.
    /// Returns `Ok(())` if everything is good, otherwise an appropriate error.
    pub fn validate(&self) -> Result<()> {
        check_public(self)?;

        if self.primes.len() != 2 {
            return Err(Error::InvalidPrime);
        }

        // Check that Πprimes == n.
        let one = BigUint::one();
        let mut m = BigUint::one();
        for prime in &self.primes {
            // Any primes ≤ 1 will cause divide-by-zero panics later.
            if *prime <= one {
                return Err(Error::InvalidPrime);
            }
            m *= prime;
        }
        if self.primes[0] == self.primes[1] {
            return Err(Error::InvalidPrime);
        }
        if m != *self.n() {
            return Err(Error::InvalidModulus);
        }

        // Check that de ≡ 1 mod p-1, for each prime.
        // This implies that e is coprime to each p-1 as e has a multiplicative
        // inverse. Therefore e is coprime to lcm(p-1,q-1) = λ(N).
        // It also implies that a^de ≡ a mod p as a^(p-1) ≡ 1 mod p. Thus a^de ≡ a
        // mod n for all a coprime to n, as required.
        let de = self.e() * &self.d;
        for prime in &self.primes {
            let congruence: BigUint = &de % (prime - &one);
            if !congruence.is_one() {
                return Err(Error::InvalidExponent);
            }
        }

        Ok(())
    }

    /// Decrypt the given message.
    ///
    /// PKCS#1 v1.5 decryption is exposed to padding oracle attacks: callers
    /// that reveal whether decryption failed let an attacker decrypt chosen
    /// ciphertexts.
    pub fn decrypt<P: PaddingScheme>(&self, padding: P, ciphertext: &[u8]) -> Result<Vec<u8>> {
        padding.decrypt(Option::<&mut DummyRng>::None, self, ciphertext)
    }

    /// Decrypt the given message.
    ///
    /// Uses `rng` to blind the decryption process.
    pub fn decrypt_blinded<R: CryptoRngCore + ?Sized, P: PaddingScheme>(
        &self,
        rng: &mut R,
        padding: P,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        padding.decrypt(Some(rng), self, ciphertext)
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    fn dp(&self) -> Option<&BigUint> {
        self.precomputed.as_ref().map(|p| &p.dp)
    }

    fn dq(&self) -> Option<&BigUint> {
        self.precomputed.as_ref().map(|p| &p.dq)
    }

    fn qinv(&self) -> Option<&BigUint> {
        self.precomputed.as_ref().map(|p| &p.qinv)
    }
}

/// Parameters for [`KeyPair::generate_with_config`] and
/// [`RsaPrivateKey::new_with_config`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Size of the modulus in bits.
    pub bits: usize,
    /// Public exponent.
    pub exponent: BigUint,
    /// Number of candidate prime pairs tried before giving up.
    pub max_attempts: usize,
}

impl GenerationConfig {
    /// Public exponent used unless configured otherwise.
    pub const DEFAULT_EXPONENT: u64 = 65537;

    /// Attempt cap used unless configured otherwise.
    pub const DEFAULT_MAX_ATTEMPTS: usize = 4096;

    /// Configuration for a `bits` sized key with the default exponent and
    /// attempt cap.
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            exponent: BigUint::from(Self::DEFAULT_EXPONENT),
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the public exponent.
    pub fn with_exponent(mut self, exponent: BigUint) -> Self {
        self.exponent = exponent;
        self
    }

    /// Sets the attempt cap.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(2048)
    }
}

/// A public key and the private key it belongs to, created together by a
/// single generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    public: RsaPublicKey,
    private: RsaPrivateKey,
}

impl KeyPair {
    /// Generates a key pair with a `bits` sized modulus and the default
    /// public exponent.
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R, bits: usize) -> Result<KeyPair> {
        Self::generate_with_config(rng, &GenerationConfig::new(bits))
    }

    /// Generates a key pair as described by `config`.
    pub fn generate_with_config<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        config: &GenerationConfig,
    ) -> Result<KeyPair> {
        RsaPrivateKey::new_with_config(rng, config).map(KeyPair::from)
    }

    /// The public half.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// The private half.
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    /// Splits the pair into its public and private keys.
    pub fn into_parts(self) -> (RsaPublicKey, RsaPrivateKey) {
        (self.public, self.private)
    }
}

impl From<RsaPrivateKey> for KeyPair {
    fn from(private: RsaPrivateKey) -> Self {
        KeyPair {
            public: private.to_public_key(),
            private,
        }
    }
}

/// Check that the public key is well formed and has an exponent within acceptable bounds.
#[inline]
pub fn check_public(public_key: &impl PublicKeyParts) -> Result<()> {
    check_public_with_max_size(public_key, RsaPublicKey::MAX_SIZE)
}

/// Check that the public key is well formed and has an exponent within acceptable bounds.
#[inline]
fn check_public_with_max_size(public_key: &impl PublicKeyParts, max_size: usize) -> Result<()> {
    if public_key.n().bits() > max_size {
        return Err(Error::ModulusTooLarge);
    }

    if public_key.e() >= public_key.n() || public_key.n().is_even() {
        return Err(Error::InvalidModulus);
    }

    check_public_exponent(public_key.e())
}

/// Check that a public exponent is odd and within
/// [`RsaPublicKey::MIN_PUB_EXPONENT`]..=[`RsaPublicKey::MAX_PUB_EXPONENT`].
pub(crate) fn check_public_exponent(e: &BigUint) -> Result<()> {
    let e = e.to_u64().ok_or(Error::PublicExponentTooLarge)?;

    if e < RsaPublicKey::MIN_PUB_EXPONENT {
        return Err(Error::PublicExponentTooSmall);
    }

    if e > RsaPublicKey::MAX_PUB_EXPONENT {
        return Err(Error::PublicExponentTooLarge);
    }

    if e & 1 == 0 {
        return Err(Error::InvalidExponent);
    }

    Ok(())
}
