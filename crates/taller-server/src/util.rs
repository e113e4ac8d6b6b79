use chrono::{TimeZone, Utc};
use getrandom::fill;
use unicode_normalization::UnicodeNormalization;

pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}

pub fn ts_to_rfc3339(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .unwrap_or_else(|| Utc.timestamp_opt(0, 0).single().unwrap())
        .to_rfc3339()
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    fill(&mut out).expect("Failed to generate random bytes");
    out
}

pub fn hex_encode(bytes: &[u8]) -> String {
    const LUT: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(LUT[(b >> 4) as usize] as char);
        out.push(LUT[(b & 0x0f) as usize] as char);
    }
    out
}

pub fn generate_session_token() -> String {
    // 256-bit token, hex-encoded.
    hex_encode(&random_bytes(32))
}

/// Lower-case and strip diacritics (NFD, drop combining marks).
///
/// Both sides of every customer/technician search go through this, which is
/// what makes "garcia" match "García". Linear-scan matching only; fine at
/// the data volumes a single shop produces.
pub fn normalize_text(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

fn is_combining_mark(c: char) -> bool {
    // Unicode combining diacritical mark blocks.
    matches!(c,
        '\u{0300}'..='\u{036f}'
        | '\u{1ab0}'..='\u{1aff}'
        | '\u{1dc0}'..='\u{1dff}'
        | '\u{20d0}'..='\u{20ff}'
        | '\u{fe20}'..='\u{fe2f}')
}

/// Case- and accent-insensitive containment check.
pub fn matches_query(haystack: &str, normalized_query: &str) -> bool {
    normalize_text(haystack).contains(normalized_query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_accents_and_case() {
        assert_eq!(normalize_text("García"), "garcia");
        assert_eq!(normalize_text("GARCÍA"), "garcia");
        assert_eq!(normalize_text("Ñoño"), "nono");
        assert_eq!(normalize_text("José Pérez"), "jose perez");
    }

    #[test]
    fn matches_query_is_accent_insensitive_both_ways() {
        let q = normalize_text("garcia");
        assert!(matches_query("García", &q));
        let q = normalize_text("GARCÍA");
        assert!(matches_query("garcia", &q));
    }

    #[test]
    fn hex_encode_known_bytes() {
        assert_eq!(hex_encode(&[0x00, 0xff, 0x10]), "00ff10");
    }

    #[test]
    fn session_tokens_are_unique_and_hex() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ts_to_rfc3339_epoch() {
        assert_eq!(ts_to_rfc3339(0), "1970-01-01T00:00:00+00:00");
    }
}
