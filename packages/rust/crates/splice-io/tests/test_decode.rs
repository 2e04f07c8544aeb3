//! Tests for decode module - binary sniffing and UTF-8 policy.

use std::path::Path;

use splice_io::{DecodePolicy, IoError, decode_document, looks_binary};

#[test]
fn test_binary_detection() {
    assert!(looks_binary(b"\x00\x01\x02\x03"));
    assert!(!looks_binary(b"<body></body>"));
}

#[test]
fn test_decode_text() -> Result<(), Box<dyn std::error::Error>> {
    let text = decode_document(
        Path::new("src/app/app.module.ts"),
        b"import { A } from './a';".to_vec(),
        DecodePolicy::Strict,
    )?;
    assert_eq!(text, "import { A } from './a';");
    Ok(())
}

#[test]
fn test_binary_error_names_path() {
    let err = decode_document(Path::new("src/favicon.ico"), b"\x00\x01".to_vec(), DecodePolicy::Lossy)
        .unwrap_err();
    assert!(matches!(err, IoError::Binary { ref path } if path == "src/favicon.ico"));
    assert!(err.to_string().contains("src/favicon.ico"));
}

#[test]
fn test_lossy_policy_replaces_invalid_bytes() {
    let text = decode_document(Path::new("a.html"), vec![0x48, 0x65, 0x6c, 0xff, 0x6f], DecodePolicy::Lossy)
        .unwrap();
    assert_eq!(text, "Hel\u{fffd}o");
}

#[test]
fn test_strict_policy_rejects_invalid_bytes() {
    let err = decode_document(Path::new("a.html"), vec![0x48, 0x65, 0x6c, 0xff, 0x6f], DecodePolicy::Strict)
        .unwrap_err();
    assert!(matches!(err, IoError::InvalidUtf8 { valid_up_to: 3, .. }));
}
