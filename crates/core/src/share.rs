//! Opaque share tokens.
//!
//! A share token grants read-only access to one user's collection
//! snapshot. Tokens are random alphanumeric strings with no embedded
//! meaning; stability across repeated enables is enforced by the
//! repository layer, which reuses an existing token instead of rotating.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of a generated share token.
pub const SHARE_TOKEN_LEN: usize = 32;

/// Generate a fresh opaque share token.
pub fn generate_share_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHARE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Basic shape check for tokens arriving from the outside.
pub fn is_plausible_token(token: &str) -> bool {
    token.len() == SHARE_TOKEN_LEN && token.chars().all(|c| c.is_ascii_alphanumeric())
}
