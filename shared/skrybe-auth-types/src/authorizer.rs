use core::fmt;

use alloy_primitives::{Address, B256};

/// Errors raised by a signing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerError {
    /// Key material could not be parsed or is not a valid secp256k1 scalar.
    InvalidKey,
    /// The signing primitive failed.
    SigningFailed,
}

impl fmt::Display for SignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerError::InvalidKey => f.write_str("invalid signing key"),
            SignerError::SigningFailed => f.write_str("signing failed"),
        }
    }
}

/// Signing capability held by the designated authority.
///
/// Injected into whoever produces authorizations, so the key never comes from ambient config.
pub trait AuthorizingSigner {
    /// Address the verifier is configured to trust.
    fn address(&self) -> Address;

    /// Sign an authorization digest using the personal-message convention.
    ///
    /// Returns the 65-byte `r || s || v` signature.
    fn sign_digest(&self, digest: B256) -> Result<[u8; 65], SignerError>;
}
