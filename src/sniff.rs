//! Content sniffing over a byte prefix, following the WHATWG MIME sniffing
//! rules for the signatures that matter to uploads.

/// Only this many leading bytes are considered.
pub const SNIFF_LEN: usize = 512;

/// Result when no signature and no text heuristic matches.
pub const OCTET_STREAM: &str = "application/octet-stream";

const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
const TEXT_HTML_UTF8: &str = "text/html; charset=utf-8";

enum Signature {
    /// Data starts with the pattern.
    Exact(&'static [u8], &'static str),
    /// `data[i] & mask[i] == pattern[i]` for every i.
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        skip_whitespace: bool,
        content_type: &'static str,
    },
    /// Case-insensitive HTML tag followed by a space or `>`.
    Html(&'static [u8]),
    Mp4,
    /// Fallback: no binary control bytes after leading whitespace.
    Text,
}

const fn masked(mask: &'static [u8], pattern: &'static [u8], content_type: &'static str) -> Signature {
    Signature::Masked {
        mask,
        pattern,
        skip_whitespace: false,
        content_type,
    }
}

const EOT_MASK: &[u8] = b"\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\xFF\xFF";
const EOT_PATTERN: &[u8] = b"\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00LP";

// Order matters: the first match wins and `Text` must stay last.
static SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"<?xml",
        skip_whitespace: true,
        content_type: "text/xml; charset=utf-8",
    },
    Signature::Exact(b"%PDF-", "application/pdf"),
    Signature::Exact(b"%!PS-Adobe-", "application/postscript"),
    // UTF byte order marks
    masked(b"\xFF\xFF\x00\x00", b"\xFE\xFF\x00\x00", "text/plain; charset=utf-16be"),
    masked(b"\xFF\xFF\x00\x00", b"\xFF\xFE\x00\x00", "text/plain; charset=utf-16le"),
    masked(b"\xFF\xFF\xFF\x00", b"\xEF\xBB\xBF\x00", TEXT_PLAIN_UTF8),
    // Images
    Signature::Exact(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::Exact(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::Exact(b"BM", "image/bmp"),
    Signature::Exact(b"GIF87a", "image/gif"),
    Signature::Exact(b"GIF89a", "image/gif"),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00WEBPVP",
        "image/webp",
    ),
    Signature::Exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::Exact(b"\xFF\xD8\xFF", "image/jpeg"),
    // Audio and video
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"FORM\x00\x00\x00\x00AIFF",
        "audio/aiff",
    ),
    masked(b"\xFF\xFF\xFF", b"ID3", "audio/mpeg"),
    masked(b"\xFF\xFF\xFF\xFF\xFF", b"OggS\x00", "application/ogg"),
    masked(
        b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
        b"MThd\x00\x00\x00\x06",
        "audio/midi",
    ),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00AVI ",
        "video/avi",
    ),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00WAVE",
        "audio/wave",
    ),
    Signature::Mp4,
    Signature::Exact(b"\x1A\x45\xDF\xA3", "video/webm"),
    // Fonts
    masked(EOT_MASK, EOT_PATTERN, "application/vnd.ms-fontobject"),
    Signature::Exact(b"\x00\x01\x00\x00", "font/ttf"),
    Signature::Exact(b"OTTO", "font/otf"),
    Signature::Exact(b"ttcf", "font/collection"),
    Signature::Exact(b"wOFF", "font/woff"),
    Signature::Exact(b"wOF2", "font/woff2"),
    // Archives
    Signature::Exact(b"\x1F\x8B\x08", "application/x-gzip"),
    Signature::Exact(b"PK\x03\x04", "application/zip"),
    Signature::Exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Signature::Exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Signature::Exact(b"\x00\x61\x73\x6D", "application/wasm"),
    Signature::Text,
];

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

fn is_tag_terminator(b: u8) -> bool {
    matches!(b, b' ' | b'>')
}

fn is_binary_control(b: u8) -> bool {
    b <= 0x08 || b == 0x0B || (0x0E..=0x1A).contains(&b) || (0x1C..=0x1F).contains(&b)
}

impl Signature {
    fn matches(&self, data: &[u8], first_non_ws: usize) -> Option<&'static str> {
        match self {
            Signature::Exact(prefix, content_type) => {
                data.starts_with(prefix).then_some(*content_type)
            }
            Signature::Masked {
                mask,
                pattern,
                skip_whitespace,
                content_type,
            } => {
                let data = if *skip_whitespace {
                    &data[first_non_ws..]
                } else {
                    data
                };
                if mask.len() != pattern.len() || data.len() < pattern.len() {
                    return None;
                }
                pattern
                    .iter()
                    .zip(mask.iter())
                    .zip(data.iter())
                    .all(|((p, m), d)| d & m == *p)
                    .then_some(*content_type)
            }
            Signature::Html(tag) => {
                let data = &data[first_non_ws..];
                if data.len() < tag.len() + 1 {
                    return None;
                }
                let same = tag.iter().zip(data.iter()).all(|(t, d)| {
                    let d = if t.is_ascii_uppercase() { d & 0xDF } else { *d };
                    *t == d
                });
                (same && is_tag_terminator(data[tag.len()])).then_some(TEXT_HTML_UTF8)
            }
            Signature::Mp4 => match_mp4(data),
            Signature::Text => data[first_non_ws..]
                .iter()
                .all(|b| !is_binary_control(*b))
                .then_some(TEXT_PLAIN_UTF8),
        }
    }
}

fn match_mp4(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 {
        return None;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 || data[4..8] != *b"ftyp" {
        return None;
    }
    // Offset 12 holds the major brand version, not a brand.
    (8..box_size)
        .step_by(4)
        .filter(|offset| *offset != 12)
        .any(|offset| data[offset..offset + 3] == *b"mp4")
        .then_some("video/mp4")
}

/// Classify `data` by its leading bytes. Never fails; unknown binary content
/// is `application/octet-stream`.
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];
    let first_non_ws = data
        .iter()
        .position(|b| !is_whitespace(*b))
        .unwrap_or(data.len());

    SIGNATURES
        .iter()
        .find_map(|signature| signature.matches(data, first_non_ws))
        .unwrap_or(OCTET_STREAM)
}
