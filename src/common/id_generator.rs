// src/common/id_generator.rs
//! Identifier generation
//!
//! Two families of identifiers live here:
//! - User IDs: prefixed Crockford Base32 (`U_XXXXXXXXXXXXXXXX`). Not secret,
//!   only required to be unique, so a thread-local RNG is enough.
//! - Opaque tokens (OAuth state, session IDs): raw bytes from the operating
//!   system CSPRNG, URL-safe base64 without padding. Unguessability is the
//!   security property, so these never fall back to a weaker source.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Random characters in a user ID (80 bits)
const USER_ID_LENGTH: usize = 16;

/// Bytes of entropy in OAuth state tokens
pub const STATE_TOKEN_BYTES: usize = 32;

/// Bytes of entropy in session IDs
pub const SESSION_ID_BYTES: usize = 32;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID with custom length
pub fn generate_id_with_length(prefix: EntityPrefix, length: usize) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(length))
}

/// Generate a User ID (U_XXXXXXXXXXXXXXXX)
pub fn generate_user_id() -> String {
    generate_id_with_length(EntityPrefix::User, USER_ID_LENGTH)
}

/// Generate an opaque, URL-safe token from `bytes` bytes of OS entropy.
///
/// Fails only if the operating system entropy source fails.
pub fn generate_secure_token(bytes: usize) -> Result<String, rand::Error> {
    let mut buf = vec![0u8; bytes];
    OsRng.try_fill_bytes(&mut buf)?;
    Ok(URL_SAFE_NO_PAD.encode(&buf))
}

/// Generate an OAuth state token
pub fn generate_state_token() -> Result<String, rand::Error> {
    generate_secure_token(STATE_TOKEN_BYTES)
}

/// Generate a session ID
pub fn generate_session_id() -> Result<String, rand::Error> {
    generate_secure_token(SESSION_ID_BYTES)
}
