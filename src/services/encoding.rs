use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::error::{DictError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult> {
    let bytes = fs::read(path).map_err(|e| DictError::io("read", path, e))?;
    Ok(detect(&bytes))
}

pub fn detect(bytes: &[u8]) -> EncodingDetectionResult {
    if bytes.starts_with(&UTF8_BOM) {
        return EncodingDetectionResult {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            candidates: vec![
                EncodingCandidate {
                    name: "utf-8-sig".into(),
                    confidence: 0.99,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.90,
                },
            ],
        };
    }

    let encoding = guess(bytes);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];

    // IME tools disagree on what to call the same Japanese code page
    match best.as_str() {
        "shift_jis" => {
            candidates.push(EncodingCandidate {
                name: "windows-31j".into(),
                confidence: (confidence - 0.03).max(0.0),
            });
            candidates.push(EncodingCandidate {
                name: "cp932".into(),
                confidence: (confidence - 0.05).max(0.0),
            });
        }
        "utf-8" => {
            candidates.push(EncodingCandidate {
                name: "utf-8-sig".into(),
                confidence: (confidence - 0.20).max(0.0),
            });
        }
        _ => {}
    }

    EncodingDetectionResult {
        best,
        confidence,
        candidates,
    }
}

/// Decodes dictionary bytes to text. UTF-8 (with or without BOM) is taken
/// as is; anything else goes through detection, which in practice means
/// Shift-JIS files written by Windows IME tools.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let encoding = guess(bytes);
    tracing::warn!(encoding = encoding.name(), "input is not UTF-8, decoding with detected encoding");
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(encoding = encoding.name(), "malformed sequences replaced while decoding");
    }
    text.into_owned()
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    let base = if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    };

    if encoding == UTF_8 {
        (base + 0.05_f32).min(0.95)
    } else {
        base
    }
}
