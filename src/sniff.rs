//! Content-type detection from body bytes.
//!
//! Follows the WHATWG MIME sniffing table: at most the first 512 bytes are
//! inspected, known signatures win, and anything else is `text/plain` unless
//! it contains bytes that never appear in text. JSON sniffs as `text/plain`.
//! Headers are never consulted.

const SNIFF_LEN: usize = 512;

pub(crate) const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

// ── Signature tables ──────────────────────────────────────────────────────────

/// HTML openers, matched case-insensitively after leading whitespace and
/// only when followed by a space or `>`.
const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML", b"<HTML", b"<HEAD", b"<SCRIPT", b"<IFRAME", b"<H1",
    b"<DIV", b"<FONT", b"<TABLE", b"<A", b"<STYLE", b"<TITLE", b"<B",
    b"<BODY", b"<BR", b"<P", b"<!--",
];

/// Exact prefixes, checked against the raw bytes.
const EXACT: &[(&[u8], &str)] = &[
    (b"%PDF-",                            "application/pdf"),
    (b"%!PS-Adobe-",                      "application/postscript"),
    (b"\xFE\xFF",                         "text/plain; charset=utf-16be"),
    (b"\xFF\xFE",                         "text/plain; charset=utf-16le"),
    (b"\xEF\xBB\xBF",                     TEXT_PLAIN),
    (b"\x00\x00\x01\x00",                 "image/x-icon"),
    (b"\x00\x00\x02\x00",                 "image/x-icon"),
    (b"BM",                               "image/bmp"),
    (b"GIF87a",                           "image/gif"),
    (b"GIF89a",                           "image/gif"),
    (b"\x89PNG\x0D\x0A\x1A\x0A",          "image/png"),
    (b"\xFF\xD8\xFF",                     "image/jpeg"),
    (b"OggS\x00",                         "application/ogg"),
    (b"ID3",                              "audio/mpeg"),
    (b"wOFF",                             "font/woff"),
    (b"wOF2",                             "font/woff2"),
    (b"\x1F\x8B\x08",                     "application/x-gzip"),
    (b"PK\x03\x04",                       "application/zip"),
    (b"Rar!\x1A\x07\x00",                 "application/x-rar-compressed"),
    (b"Rar!\x1A\x07\x01\x00",             "application/x-rar-compressed"),
    (b"\x00\x61\x73\x6D",                 "application/wasm"),
];

/// Returns the MIME type `data` looks like.
pub fn sniff(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    let start = data.iter().position(|b| !is_ws(*b)).unwrap_or(data.len());
    let trimmed = &data[start..];

    if HTML_TAGS.iter().any(|tag| html_match(trimmed, tag)) {
        return "text/html; charset=utf-8";
    }
    if trimmed.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }
    if let Some((_, mime)) = EXACT.iter().find(|(sig, _)| data.starts_with(sig)) {
        return *mime;
    }
    if data.len() >= 14 && &data[..4] == b"RIFF" && &data[8..14] == b"WEBPVP" {
        return "image/webp";
    }
    if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WAVE" {
        return "audio/wave";
    }
    if data.iter().any(|b| is_binary(*b)) {
        return OCTET_STREAM;
    }
    TEXT_PLAIN
}

/// Whether a detected type is one whose bodies are worth keeping for logs.
pub fn is_loggable(mime: &str) -> bool {
    mime.contains("text/plain") || mime.contains("application/json")
}

fn html_match(data: &[u8], tag: &[u8]) -> bool {
    if data.len() < tag.len() + 1 {
        return false;
    }
    let prefix_matches = data
        .iter()
        .zip(tag)
        .all(|(d, t)| d.to_ascii_uppercase() == *t);
    prefix_matches && matches!(data[tag.len()], b' ' | b'>')
}

fn is_ws(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_and_prose_are_plain_text() {
        assert_eq!(sniff(br#"{"id":1,"name":"x"}"#), TEXT_PLAIN);
        assert_eq!(sniff(b"hello world"), TEXT_PLAIN);
        assert_eq!(sniff(b""), TEXT_PLAIN);
    }

    #[test]
    fn html_needs_a_terminator() {
        assert_eq!(sniff(b"  <html><body>hi</body></html>"), "text/html; charset=utf-8");
        assert_eq!(sniff(b"<p>para</p>"), "text/html; charset=utf-8");
        assert_eq!(sniff(b"<pre>x</pre>"), TEXT_PLAIN);
    }

    #[test]
    fn magic_numbers_win() {
        assert_eq!(sniff(b"\x89PNG\x0D\x0A\x1A\x0A\x00\x00"), "image/png");
        assert_eq!(sniff(b"%PDF-1.7"), "application/pdf");
        assert_eq!(sniff(b"\x1F\x8B\x08\x00"), "application/x-gzip");
        assert_eq!(sniff(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "image/webp");
    }

    #[test]
    fn control_bytes_make_it_binary() {
        assert_eq!(sniff(&[0x01, 0x02, b'a']), OCTET_STREAM);
    }

    #[test]
    fn only_the_prefix_is_inspected() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(sniff(&data), TEXT_PLAIN);
    }

    #[test]
    fn loggable_types() {
        assert!(is_loggable(TEXT_PLAIN));
        assert!(is_loggable("application/json"));
        assert!(!is_loggable("image/png"));
        assert!(!is_loggable(OCTET_STREAM));
    }
}
