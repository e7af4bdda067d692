//! Language identification

/// Texts shorter than this (in characters) are reported as unknown
pub const MIN_DETECTION_CHARS: usize = 50;

/// Only a prefix of long bodies is sampled
const SAMPLE_CHARS: usize = 2000;

/// Returned when detection is not confident
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Detects the language of `text` as an ISO 639-1 code
///
/// Returns `"unknown"` for short text, for unreliable detections and for
/// languages without a two-letter code.
pub fn detect_language(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_DETECTION_CHARS {
        return UNKNOWN_LANGUAGE.to_string();
    }

    let sample: String = trimmed.chars().take(SAMPLE_CHARS).collect();

    let Some(info) = whatlang::detect(&sample) else {
        tracing::trace!("No language detected");
        return UNKNOWN_LANGUAGE.to_string();
    };

    if !info.is_reliable() {
        tracing::trace!(
            "Unreliable language guess {} ({:.2})",
            info.lang().code(),
            info.confidence()
        );
        return UNKNOWN_LANGUAGE.to_string();
    }

    iso_639_1(info.lang().code())
        .unwrap_or(UNKNOWN_LANGUAGE)
        .to_string()
}

/// Individual languages whose two-letter code belongs to their macrolanguage
const MACROLANGUAGE_CODES: &[(&str, &str)] = &[("cmn", "zh"), ("pes", "fa")];

/// Maps an ISO 639-3 code to its ISO 639-1 equivalent
fn iso_639_1(code: &str) -> Option<&'static str> {
    if let Some((_, two)) = MACROLANGUAGE_CODES.iter().find(|(three, _)| *three == code) {
        return Some(*two);
    }

    isolang::Language::from_639_3(code).and_then(|lang| lang.to_639_1())
}
