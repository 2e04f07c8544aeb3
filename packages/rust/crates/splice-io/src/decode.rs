//! Turning stored bytes into a patchable document.
//!
//! Patch offsets are byte offsets into the decoded text, and the decoded
//! text is what gets written back. A lossy decode therefore rewrites any
//! invalid sequence as U+FFFD on the next write; trees that must never do
//! that decode strictly.

use std::path::Path;

use memchr::memchr;

use crate::error::IoError;

/// Bytes scanned for NUL when sniffing binary content.
pub const BINARY_SNIFF_LEN: usize = 8192;

/// What to do with bytes that are not UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Replace invalid sequences with U+FFFD.
    #[default]
    Lossy,
    /// Refuse the document with `IoError::InvalidUtf8`.
    Strict,
}

/// Whether the leading bytes of `bytes` look binary (contain NUL).
#[must_use]
pub fn looks_binary(bytes: &[u8]) -> bool {
    let sniff = bytes.get(..BINARY_SNIFF_LEN).unwrap_or(bytes);
    memchr(0, sniff).is_some()
}

/// Decode the bytes stored at `path` into document text.
///
/// # Errors
/// `Binary` when the content looks binary, `InvalidUtf8` when it is not
/// UTF-8 under `DecodePolicy::Strict`.
pub fn decode_document(path: &Path, bytes: Vec<u8>, policy: DecodePolicy) -> Result<String, IoError> {
    if looks_binary(&bytes) {
        return Err(IoError::Binary {
            path: path.display().to_string(),
        });
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => match policy {
            DecodePolicy::Strict => Err(IoError::InvalidUtf8 {
                path: path.display().to_string(),
                valid_up_to: e.utf8_error().valid_up_to(),
            }),
            DecodePolicy::Lossy => {
                tracing::warn!(
                    path = %path.display(),
                    valid_up_to = e.utf8_error().valid_up_to(),
                    "invalid UTF-8 replaced while decoding"
                );
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        },
    }
}
