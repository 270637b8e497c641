//! Errors reported by the `enigma` command-line tool.
//!
//! Every failure class maps to its own process exit code so scripts can tell
//! a bad argument from a corrupt key file or a ciphertext that does not
//! decrypt.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that end a command.
#[derive(Error, Debug)]
pub enum CliError {
    /// A flag or argument has an unusable value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or writing a file (or stdin/stdout) failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File the operation was on; `-` for stdin/stdout.
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A key could not be encoded, or a key file could not be decoded.
    #[error("{}: malformed key: {source}", path.display())]
    KeyFile {
        /// Key file being read or written
        path: PathBuf,
        /// Encoding error from the key store
        #[source]
        source: enigma::Error,
    },

    /// Key generation or a cryptographic operation failed.
    #[error(transparent)]
    Crypto(#[from] enigma::Error),
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn key_file(path: impl Into<PathBuf>, source: impl Into<enigma::Error>) -> Self {
        Self::KeyFile { path: path.into(), source: source.into() }
    }

    /// Process exit code for this error. Code 2 is left to `clap` for usage
    /// errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidArgument(_) => 3,
            Self::Io { .. } => 4,
            Self::KeyFile { .. } => 5,
            Self::Crypto(err) => crypto_exit_code(err),
        }
    }
}

fn crypto_exit_code(err: &enigma::Error) -> u8 {
    use enigma::Error;

    match err {
        Error::Pkcs1(_) | Error::Pkcs8(_) => 5,
        Error::Generation(_) => 10,
        Error::NotInvertible => 11,
        Error::PayloadTooLarge { .. } => 12,
        Error::InvalidCiphertext => 13,
        Error::InvalidPadding => 14,
        Error::InvalidPrime
        | Error::InvalidModulus
        | Error::InvalidExponent
        | Error::InvalidCoefficient
        | Error::ModulusTooLarge
        | Error::PublicExponentTooSmall
        | Error::PublicExponentTooLarge => 15,
        _ => 16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enigma::GenerationError;

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let cases: Vec<(CliError, u8)> = vec![
            (CliError::InvalidArgument("bits".into()), 3),
            (CliError::io("-", io::Error::from(io::ErrorKind::NotFound)), 4),
            (CliError::key_file("public", enigma::pkcs1::Error::Crypto), 5),
            (
                CliError::from(enigma::Error::Generation(GenerationError::TooFewPrimes)),
                10,
            ),
            (CliError::from(enigma::Error::NotInvertible), 11),
            (CliError::from(enigma::Error::PayloadTooLarge { len: 60, max: 53 }), 12),
            (CliError::from(enigma::Error::InvalidCiphertext), 13),
            (CliError::from(enigma::Error::InvalidPadding), 14),
            (CliError::from(enigma::Error::InvalidExponent), 15),
            (CliError::from(enigma::Error::Internal), 16),
        ];

        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn test_display_names_the_file() {
        let err = CliError::io("secret.key", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(err.to_string().starts_with("secret.key: "));
    }
}
