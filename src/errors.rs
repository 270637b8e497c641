//! Error types.

/// Alias for [`core::result::Result`] with the `enigma` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Key or prime generation failed.
    Generation(GenerationError),

    /// The value has no multiplicative inverse for the given modulus.
    NotInvertible,

    /// Plaintext does not fit into a single block.
    PayloadTooLarge {
        /// Length of the rejected plaintext.
        len: usize,
        /// Largest plaintext the key can carry.
        max: usize,
    },

    /// Ciphertext has the wrong length or is out of range for the modulus.
    InvalidCiphertext,

    /// Decrypted block is not a well-formed PKCS#1 v1.5 encryption block.
    InvalidPadding,

    /// Invalid prime value.
    InvalidPrime,

    /// Invalid modulus.
    InvalidModulus,

    /// Invalid exponent.
    InvalidExponent,

    /// Invalid coefficient.
    InvalidCoefficient,

    /// Modulus too large.
    ModulusTooLarge,

    /// Public exponent too small.
    PublicExponentTooSmall,

    /// Public exponent too large.
    PublicExponentTooLarge,

    /// PKCS#1 error.
    Pkcs1(pkcs1::Error),

    /// PKCS#8 error.
    Pkcs8(pkcs8::Error),

    /// Invalid padding length.
    InvalidPadLen,

    /// Internal error.
    Internal,
}

/// Reasons key or prime generation can fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum GenerationError {
    /// Requested prime is shorter than 2 bits.
    PrimeTooSmall {
        /// Requested prime size.
        bits: usize,
    },

    /// Requested modulus is below the supported minimum.
    ModulusTooSmall {
        /// Requested modulus size.
        bits: usize,
        /// Smallest supported modulus size.
        min: usize,
    },

    /// Requested modulus is above the supported maximum.
    ModulusTooLarge {
        /// Requested modulus size.
        bits: usize,
        /// Largest supported modulus size.
        max: usize,
    },

    /// There are too few primes of the required length to build a key.
    TooFewPrimes,

    /// No valid key pair was found within the attempt limit.
    RetriesExhausted {
        /// Number of attempts made.
        attempts: usize,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Generation(err) => write!(f, "key generation failed: {}", err),
            Error::NotInvertible => write!(f, "value is not invertible modulo the given modulus"),
            Error::PayloadTooLarge { len, max } => write!(
                f,
                "message too long: {} bytes, a single block holds at most {} bytes",
                len, max
            ),
            Error::InvalidCiphertext => write!(f, "invalid ciphertext"),
            Error::InvalidPadding => write!(f, "invalid padding"),
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::InvalidModulus => write!(f, "invalid modulus"),
            Error::InvalidExponent => write!(f, "invalid exponent"),
            Error::InvalidCoefficient => write!(f, "invalid coefficient"),
            Error::ModulusTooLarge => write!(f, "modulus too large"),
            Error::PublicExponentTooSmall => write!(f, "public exponent too small"),
            Error::PublicExponentTooLarge => write!(f, "public exponent too large"),
            Error::Pkcs1(err) => write!(f, "{}", err),
            Error::Pkcs8(err) => write!(f, "{}", err),
            Error::InvalidPadLen => write!(f, "invalid padding length"),
            Error::Internal => write!(f, "internal error"),
        }
    }
}

impl core::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GenerationError::PrimeTooSmall { bits } => {
                write!(f, "prime size must be at least 2 bits, got {}", bits)
            }
            GenerationError::ModulusTooSmall { bits, min } => {
                write!(f, "modulus size {} is below the minimum of {} bits", bits, min)
            }
            GenerationError::ModulusTooLarge { bits, max } => {
                write!(f, "modulus size {} exceeds the maximum of {} bits", bits, max)
            }
            GenerationError::TooFewPrimes => {
                write!(f, "too few primes of given length to generate an RSA key")
            }
            GenerationError::RetriesExhausted { attempts } => {
                write!(f, "no valid key pair found after {} attempts", attempts)
            }
        }
    }
}

impl From<GenerationError> for Error {
    fn from(err: GenerationError) -> Error {
        Error::Generation(err)
    }
}

impl From<pkcs1::Error> for Error {
    fn from(err: pkcs1::Error) -> Error {
        Error::Pkcs1(err)
    }
}

impl From<pkcs8::Error> for Error {
    fn from(err: pkcs8::Error) -> Error {
        Error::Pkcs8(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Pkcs1(err) => Some(err),
            Error::Pkcs8(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GenerationError {}
