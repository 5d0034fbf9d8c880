use ed25519_dalek::{Signer as DalekSigner, SigningKey};

use crate::error::{Result, SolverError};

/// A signing capability, defined abstractly: the core only needs a pubkey
/// and a sign operation.
pub trait Signer: Send + Sync {
    fn pubkey(&self) -> Vec<u8>;
    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

/// A process-local Ed25519 signer loaded from a 64-char hex private key.
/// Used only by the façade's test endpoints (`/intent/create`,
/// `/intent/execute`) and the solver's own execution path, which all
/// hold keys in the process environment.
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    pub fn from_hex(private_key_hex: &str) -> Result<Self> {
        let bytes = hex::decode(private_key_hex)
            .map_err(|e| SolverError::InvalidArgument(format!("invalid hex private key: {e}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SolverError::InvalidArgument("private key must be 32 bytes".to_string()))?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(&bytes),
        })
    }

    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: SigningKey::generate(&mut csprng),
        }
    }
}

impl Signer for Ed25519Signer {
    fn pubkey(&self) -> Vec<u8> {
        self.signing_key.verifying_key().to_bytes().to_vec()
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_sign_and_verify() {
        use ed25519_dalek::{Signature, Verifier, VerifyingKey};

        let signer = Ed25519Signer::generate();
        let message = b"intent-execute-payload";
        let signature_bytes = signer.sign(message);

        let verifying_key = VerifyingKey::from_bytes(&signer.pubkey().try_into().unwrap()).unwrap();
        let signature = Signature::from_bytes(&signature_bytes.try_into().unwrap());
        assert!(verifying_key.verify(message, &signature).is_ok());
    }

    #[test]
    fn rejects_malformed_hex_key() {
        assert!(Ed25519Signer::from_hex("not-hex").is_err());
        assert!(Ed25519Signer::from_hex("ab").is_err());
    }
}
