//! Layered payload decoding: raw bytes, gzip, Base64 and plain text.
//!
//! The transport never says what it sent. Gzip is recognized by its magic number
//! and Base64 by the shape of the string, so every path here is a heuristic. Short
//! plain-text sentinels such as `Not Authorized` must survive untouched, which is
//! why the Base64 path validates its output and falls back to the original string.

use async_compression::tokio::bufread::GzipDecoder;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::payload::{RawPayload, extract_payload};
use crate::sentinel::mentions_sentinel;
use rpcgrid_types::GridError;

/// First two bytes of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Strings of this length or shorter are never treated as Base64.
pub const MIN_BASE64_LEN: usize = 20;

/// Encoding detected for a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadEncoding {
    /// Byte buffer starting with the gzip magic number.
    Gzip,
    /// Byte buffer holding text directly.
    Utf8Bytes,
    /// Base64 string whose decoded bytes are gzip.
    Base64Gzip,
    /// Base64 string whose decoded bytes are (probably) text.
    Base64Text,
    /// Anything else: used verbatim.
    PlainText,
}

/// True when `bytes` starts with the gzip magic number.
#[must_use]
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Shape test for Base64: long enough, only alphabet characters plus up to two
/// trailing `=`, and a length that is a multiple of four.
#[must_use]
pub fn looks_like_base64(s: &str) -> bool {
    if s.len() <= MIN_BASE64_LEN || s.len() % 4 != 0 {
        return false;
    }
    let body = s.trim_end_matches('=');
    if s.len() - body.len() > 2 {
        return false;
    }
    body.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Classify a byte buffer.
#[must_use]
pub fn classify_bytes(bytes: &[u8]) -> PayloadEncoding {
    if is_gzip(bytes) {
        PayloadEncoding::Gzip
    } else {
        PayloadEncoding::Utf8Bytes
    }
}

/// Classify a string.
#[must_use]
pub fn classify_text(text: &str) -> PayloadEncoding {
    sniff_text(text).0
}

fn sniff_text(text: &str) -> (PayloadEncoding, Option<Vec<u8>>) {
    if !looks_like_base64(text) {
        return (PayloadEncoding::PlainText, None);
    }
    match BASE64.decode(text) {
        Ok(bytes) if is_gzip(&bytes) => (PayloadEncoding::Base64Gzip, Some(bytes)),
        Ok(bytes) => (PayloadEncoding::Base64Text, Some(bytes)),
        Err(_) => (PayloadEncoding::PlainText, None),
    }
}

/// Inflate a gzip buffer.
///
/// # Errors
/// Returns `Decode` if the stream is corrupt or truncated.
pub async fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, GridError> {
    let mut decoder = GzipDecoder::new(bytes);
    decoder.multiple_members(true);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .await
        .map_err(|e| GridError::Decode(format!("gunzip failed: {e}")))?;
    Ok(out)
}

/// Decoded Base64 text is only trusted when it looks like something the
/// endpoint would send.
fn plausible_text(text: &str) -> bool {
    !text.contains('\u{FFFD}')
        && (text.contains(';') || text.contains('|') || mentions_sentinel(text))
}

/// Decode a string payload, resolving Base64 and Base64-wrapped gzip.
///
/// Never fails: anything that does not decode cleanly is returned unchanged.
pub async fn decode_text(text: String) -> String {
    match sniff_text(&text) {
        (PayloadEncoding::Base64Gzip, Some(bytes)) => match gunzip(&bytes).await {
            Ok(inflated) => String::from_utf8_lossy(&inflated).into_owned(),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_e, "base64 payload carried corrupt gzip; keeping original text");
                text
            }
        },
        (PayloadEncoding::Base64Text, Some(bytes)) => match String::from_utf8(bytes) {
            Ok(decoded) if plausible_text(&decoded) => decoded,
            _ => text,
        },
        _ => text,
    }
}

/// Decode a byte payload, inflating gzip when the magic number is present.
///
/// # Errors
/// Returns `Decode` when the buffer claims to be gzip but does not inflate.
pub async fn decode_bytes(bytes: &[u8]) -> Result<String, GridError> {
    match classify_bytes(bytes) {
        PayloadEncoding::Gzip => {
            let inflated = gunzip(bytes).await?;
            Ok(String::from_utf8_lossy(&inflated).into_owned())
        }
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Turn a payload into plain text.
///
/// `Empty` and JSON `null` yield `None`. Structured values that are not strings
/// are stringified; call [`extract_payload`] first to unwrap transport envelopes.
///
/// # Errors
/// Returns `Decode` only for a gzip byte buffer that fails to inflate.
pub async fn decode(payload: RawPayload) -> Result<Option<String>, GridError> {
    match payload {
        RawPayload::Empty | RawPayload::Json(Value::Null) => Ok(None),
        RawPayload::Bytes(b) => decode_bytes(&b).await.map(Some),
        RawPayload::Text(s) | RawPayload::Json(Value::String(s)) => Ok(Some(decode_text(s).await)),
        RawPayload::Json(other) => Ok(Some(other.to_string())),
    }
}

/// Unwrap a remote-call result for `method` and decode it.
///
/// # Errors
/// See [`decode`].
pub async fn decode_response(raw: RawPayload, method: &str) -> Result<Option<String>, GridError> {
    decode(extract_payload(raw, method)).await
}
