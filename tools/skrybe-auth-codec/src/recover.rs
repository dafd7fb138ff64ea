//! Signature recovery and the verifier's acceptance rule.
//!
//! Mirrors what the factory does on-chain: recompute the digest, recover the signer from the
//! personal-message hash, and accept only the single configured authorizer.

use alloy_primitives::{Address, FixedBytes};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use log::debug;
use skrybe_auth_types::CreationError;

use crate::{encoder::eth_signed_message_hash, errors::SignatureError, signer::address_of};

/// Recover the signing address from an authorization digest and a 65-byte signature.
///
/// Accepts v in {0, 1, 27, 28}; high-S signatures are rejected.
pub fn recover_signer(
    digest: FixedBytes<32>,
    signature: &[u8],
) -> Result<Address, SignatureError> {
    if signature.len() != 65 {
        return Err(SignatureError::InvalidLength(signature.len()));
    }
    let v = signature[64];
    let recovery_byte = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        other => return Err(SignatureError::InvalidRecoveryId(other)),
    };
    let recovery_id =
        RecoveryId::from_byte(recovery_byte).ok_or(SignatureError::InvalidRecoveryId(v))?;

    let sig = Signature::from_slice(&signature[..64]).map_err(|_| SignatureError::InvalidFormat)?;
    if sig.normalize_s().is_some() {
        return Err(SignatureError::MalleableSignature);
    }

    let prehash = eth_signed_message_hash(digest);
    let key = VerifyingKey::recover_from_prehash(prehash.as_slice(), &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    Ok(address_of(&key))
}

/// Accept `signature` only if it recovers to `expected_signer`.
pub fn verify_authorization(
    digest: FixedBytes<32>,
    signature: &[u8],
    expected_signer: Address,
) -> Result<(), CreationError> {
    match recover_signer(digest, signature) {
        Ok(recovered) if recovered == expected_signer => Ok(()),
        Ok(recovered) => {
            debug!("authorization signed by {recovered}, expected {expected_signer}");
            Err(CreationError::InvalidCreationSignature)
        }
        Err(e) => {
            debug!("malformed authorization signature: {e}");
            Err(CreationError::InvalidCreationSignature)
        }
    }
}
