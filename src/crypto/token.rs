use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// The size of a bearer token in bytes.
const TOKEN_SIZE: usize = 32;

/// Generates a new random bearer token.
///
/// # Returns
///
/// A URL-safe base64-encoded token.
pub fn generate_token() -> String {
    let mut token = [0u8; TOKEN_SIZE];
    OsRng.fill_bytes(&mut token);

    general_purpose::URL_SAFE_NO_PAD.encode(token)
}

/// Hex SHA-256 digest of a token; the only form a token is stored in.
pub fn digest_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
