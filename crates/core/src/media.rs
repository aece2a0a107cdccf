//! Blob naming and payload decoding for the media store.
//!
//! Blobs are keyed `{userId}/{pokemonId}/{uuid}.{ext}`; the userId prefix
//! is what makes ownership checkable from the name alone, which the
//! delete path relies on.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DexId;

/// Fallback extension when the upload carries no usable file name.
const DEFAULT_EXTENSION: &str = "png";

/// Build a unique blob name for an upload.
pub fn blob_name(user_id: &str, pokemon_id: DexId, file_name: Option<&str>) -> String {
    let ext = file_extension(file_name);
    format!("{user_id}/{pokemon_id}/{}.{ext}", Uuid::new_v4())
}

/// The extension to store a file under, derived from its original name.
fn file_extension(file_name: Option<&str>) -> &str {
    file_name
        .and_then(|n| n.rsplit_once('.').map(|(_, ext)| ext))
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Whether `blob_name` belongs to `user_id`.
///
/// Ownership is encoded as a `{userId}/` name prefix; anything else is
/// someone else's blob.
pub fn blob_owned_by(blob_name: &str, user_id: &str) -> bool {
    !user_id.is_empty() && blob_name.starts_with(&format!("{user_id}/"))
}

/// Decode a base64 image payload, tolerating an optional
/// `data:image/...;base64,` prefix.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, CoreError> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:image/") => rest,
        _ => payload,
    };
    BASE64
        .decode(data.trim())
        .map_err(|e| CoreError::Validation(format!("Invalid base64 file payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_names_are_user_prefixed_and_unique() {
        let a = blob_name("user_1", 25, Some("pikachu.png"));
        let b = blob_name("user_1", 25, Some("pikachu.png"));
        assert!(a.starts_with("user_1/25/"));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn extension_falls_back_to_png() {
        assert!(blob_name("u", 1, None).ends_with(".png"));
        assert!(blob_name("u", 1, Some("no-extension")).ends_with(".png"));
        assert!(blob_name("u", 1, Some("weird.")).ends_with(".png"));
        assert!(blob_name("u", 1, Some("shot.jpeg")).ends_with(".jpeg"));
    }

    #[test]
    fn ownership_requires_exact_prefix() {
        assert!(blob_owned_by("user_1/25/abc.png", "user_1"));
        assert!(!blob_owned_by("user_12/25/abc.png", "user_1"));
        assert!(!blob_owned_by("user_2/25/abc.png", "user_1"));
        assert!(!blob_owned_by("user_1/25/abc.png", ""));
    }

    #[test]
    fn decodes_raw_base64() {
        let decoded = decode_image_payload("aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn decodes_data_url_payload() {
        let decoded = decode_image_payload("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(decode_image_payload("not base64 !!!").is_err());
    }
}
