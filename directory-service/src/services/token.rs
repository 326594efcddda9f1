//! Token codec: claims envelopes signed as compact JWTs.
//!
//! Signing uses RSASSA-PSS with SHA-512 (PS512). The payload is the wrapped
//! claims envelope itself; expiration lives inside the envelope and is
//! checked when the envelope is unwrapped, not here.

use crate::error::TokenError;
use crate::models::claims::{Claims, WrappedClaims};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Signs claims envelopes. Holds the private key; only token-issuing
/// services construct one.
#[derive(Clone)]
pub struct TokenGenerator {
    encoding_key: EncodingKey,
}

impl TokenGenerator {
    pub fn from_rsa_pem(private_key_pem: &[u8]) -> Result<Self, TokenError> {
        let encoding_key =
            EncodingKey::from_rsa_pem(private_key_pem).map_err(TokenError::InvalidKey)?;
        Ok(Self { encoding_key })
    }

    /// Wrap the claims and sign the envelope into a compact token.
    pub fn generate_token(&self, claims: &Claims) -> Result<String, TokenError> {
        let wrapped = WrappedClaims::wrap(claims)?;
        let header = Header::new(Algorithm::PS512);
        encode(&header, &wrapped, &self.encoding_key).map_err(TokenError::Signing)
    }
}

/// Verifies compact tokens against the public key and returns the wrapped
/// envelope. Callers unwrap, which is where expiry is enforced.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
}

impl TokenValidator {
    pub fn from_rsa_pem(public_key_pem: &[u8]) -> Result<Self, TokenError> {
        let decoding_key =
            DecodingKey::from_rsa_pem(public_key_pem).map_err(TokenError::InvalidKey)?;
        Ok(Self { decoding_key })
    }

    pub fn validate_jwt(&self, jwt: &str) -> Result<WrappedClaims, TokenError> {
        // The registered exp claim is not part of the payload; expiry is an
        // envelope concern.
        let mut validation = Validation::new(Algorithm::PS512);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<WrappedClaims>(jwt, &self.decoding_key, &validation)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                    TokenError::InvalidJwt {
                        reasons: vec![err.to_string()],
                    }
                }
                ErrorKind::Json(_) => TokenError::JwtUnmarshalling {
                    reasons: vec![err.to_string()],
                },
                // Anything else is a failed or tampered signature; never
                // retried.
                _ => TokenError::JwtVerification {
                    reasons: vec![err.to_string()],
                },
            })?;

        Ok(token_data.claims)
    }
}
