//! Signing keypair provisioning.
//!
//! The private key is fetched from disk, or generated on first start. The
//! public key file is rewritten on every start so it always tracks the
//! private key. Keys are read once at startup and immutable afterwards.

use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use service_core::error::AppError;
use std::fs;
use std::path::Path;

const PRIVATE_KEY_FILE: &str = "privateKey.pem";
const PUBLIC_KEY_FILE: &str = "publicKey.pem";
const PRIVATE_KEY_BITS: usize = 4096;

/// PEM-encoded keypair handed to the token codec.
#[derive(Debug, Clone)]
pub struct KeyPairPems {
    pub private_key_pem: String,
    pub public_key_pem: String,
}

pub fn generate_private_key(bits: usize) -> Result<RsaPrivateKey, AppError> {
    RsaPrivateKey::new(&mut rand::rngs::OsRng, bits)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("generating rsa key: {}", e)))
}

/// Encode a private key and its public half as PEM.
pub fn key_pair_pems(private_key: &RsaPrivateKey) -> Result<KeyPairPems, AppError> {
    let private_key_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("encoding private key: {}", e)))?
        .to_string();
    let public_key_pem = RsaPublicKey::from(private_key)
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("encoding public key: {}", e)))?;

    Ok(KeyPairPems {
        private_key_pem,
        public_key_pem,
    })
}

/// Fetch the signing keypair from `dir`, generating one if absent.
pub fn provision_key_pair(dir: &Path) -> Result<KeyPairPems, AppError> {
    let private_key_path = dir.join(PRIVATE_KEY_FILE);

    let private_key = if private_key_path.exists() {
        let pem = fs::read_to_string(&private_key_path)?;
        RsaPrivateKey::from_pkcs8_pem(&pem).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "parsing private key {}: {}",
                private_key_path.display(),
                e
            ))
        })?
    } else {
        tracing::info!(
            path = %private_key_path.display(),
            "private key not found, generating a new key pair"
        );
        let key = generate_private_key(PRIVATE_KEY_BITS)?;
        let pem = key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("encoding private key: {}", e)))?;
        fs::write(&private_key_path, pem.as_bytes())?;
        key
    };

    let pems = key_pair_pems(&private_key)?;
    fs::write(dir.join(PUBLIC_KEY_FILE), &pems.public_key_pem)?;

    Ok(pems)
}
