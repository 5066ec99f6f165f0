//! Content-type sniffing.
//!
//! Implements the WHATWG MIME sniffing signatures: the content type is
//! derived from at most the first 512 bytes of the payload, never from the
//! file name. Unknown binary data is `application/octet-stream`; data
//! without binary bytes is `text/plain; charset=utf-8` (JSON included).

/// Number of leading bytes considered.
pub const SNIFF_LEN: usize = 512;

const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

enum Signature {
    /// Case-insensitive tag followed by a space or `>`, after leading whitespace.
    Html(&'static [u8]),
    /// Pattern compared against `data & mask`.
    Masked {
        pattern: &'static [u8],
        mask: &'static [u8],
        skip_ws: bool,
        content_type: &'static str,
    },
    Exact(&'static [u8], &'static str),
    Mp4,
    Text,
}

use Signature::{Exact, Html, Masked, Mp4, Text};

const FULL4: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF];

static SIGNATURES: &[Signature] = &[
    Html(b"<!DOCTYPE HTML"),
    Html(b"<HTML"),
    Html(b"<HEAD"),
    Html(b"<SCRIPT"),
    Html(b"<IFRAME"),
    Html(b"<H1"),
    Html(b"<DIV"),
    Html(b"<FONT"),
    Html(b"<TABLE"),
    Html(b"<A"),
    Html(b"<STYLE"),
    Html(b"<TITLE"),
    Html(b"<B"),
    Html(b"<BODY"),
    Html(b"<BR"),
    Html(b"<P"),
    Html(b"<!--"),
    Masked {
        pattern: b"<?xml",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        skip_ws: true,
        content_type: "text/xml; charset=utf-8",
    },
    Exact(b"%PDF-", "application/pdf"),
    Exact(b"%!PS-Adobe-", "application/postscript"),
    // UTF BOMs
    Masked {
        pattern: &[0xFE, 0xFF, 0x00, 0x00],
        mask: &[0xFF, 0xFF, 0x00, 0x00],
        skip_ws: false,
        content_type: "text/plain; charset=utf-16be",
    },
    Masked {
        pattern: &[0xFF, 0xFE, 0x00, 0x00],
        mask: &[0xFF, 0xFF, 0x00, 0x00],
        skip_ws: false,
        content_type: "text/plain; charset=utf-16le",
    },
    Masked {
        pattern: &[0xEF, 0xBB, 0xBF, 0x00],
        mask: &[0xFF, 0xFF, 0xFF, 0x00],
        skip_ws: false,
        content_type: TEXT,
    },
    // Images
    Exact(b"\x00\x00\x01\x00", "image/x-icon"),
    Exact(b"\x00\x00\x02\x00", "image/x-icon"),
    Exact(b"BM", "image/bmp"),
    Exact(b"GIF87a", "image/gif"),
    Exact(b"GIF89a", "image/gif"),
    Masked {
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        skip_ws: false,
        content_type: "image/webp",
    },
    Exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Exact(b"\xFF\xD8\xFF", "image/jpeg"),
    // Audio and video
    Masked {
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF],
        skip_ws: false,
        content_type: "audio/aiff",
    },
    Masked {
        pattern: b"ID3",
        mask: &[0xFF, 0xFF, 0xFF],
        skip_ws: false,
        content_type: "audio/mpeg",
    },
    Masked {
        pattern: b"OggS\x00",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        skip_ws: false,
        content_type: "application/ogg",
    },
    Masked {
        pattern: b"MThd\x00\x00\x00\x06",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        skip_ws: false,
        content_type: "audio/midi",
    },
    Masked {
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF],
        skip_ws: false,
        content_type: "video/avi",
    },
    Masked {
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        mask: &[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF],
        skip_ws: false,
        content_type: "audio/wave",
    },
    Mp4,
    Exact(b"\x1A\x45\xDF\xA3", "video/webm"),
    // Fonts
    Masked {
        // 34 bytes of anything, then "LP"
        pattern: &[
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, b'L', b'P',
        ],
        mask: &[
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0xFF, 0xFF,
        ],
        skip_ws: false,
        content_type: "application/vnd.ms-fontobject",
    },
    Exact(b"\x00\x01\x00\x00", "font/ttf"),
    Exact(b"OTTO", "font/otf"),
    Exact(b"ttcf", "font/collection"),
    Exact(b"wOFF", "font/woff"),
    Exact(b"wOF2", "font/woff2"),
    // Archives
    Exact(b"\x1F\x8B\x08", "application/x-gzip"),
    Exact(b"PK\x03\x04", "application/zip"),
    Exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Masked {
        pattern: b"\x00asm",
        mask: FULL4,
        skip_ws: false,
        content_type: "application/wasm",
    },
    Text,
];

/// Sniff the content type of `data`. Always returns a valid MIME type.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];
    let first_non_ws = data.iter().position(|b| !is_ws(*b)).unwrap_or(data.len());

    SIGNATURES
        .iter()
        .find_map(|sig| sig.matches(data, first_non_ws))
        .unwrap_or(OCTET_STREAM)
}

impl Signature {
    fn matches(&self, data: &[u8], first_non_ws: usize) -> Option<&'static str> {
        match self {
            Html(tag) => {
                let data = &data[first_non_ws..];
                if data.len() < tag.len() + 1 {
                    return None;
                }
                for (i, b) in tag.iter().enumerate() {
                    let mut db = data[i];
                    if b.is_ascii_uppercase() {
                        db &= 0xDF;
                    }
                    if *b != db {
                        return None;
                    }
                }
                matches!(data[tag.len()], b' ' | b'>').then_some(HTML)
            }
            Masked {
                pattern,
                mask,
                skip_ws,
                content_type,
            } => {
                let data = if *skip_ws { &data[first_non_ws..] } else { data };
                if pattern.len() != mask.len() || data.len() < pattern.len() {
                    return None;
                }
                pattern
                    .iter()
                    .zip(mask.iter())
                    .zip(data)
                    .all(|((p, m), d)| d & m == *p)
                    .then_some(*content_type)
            }
            Exact(sig, content_type) => data.starts_with(sig).then_some(*content_type),
            Mp4 => is_mp4(data).then_some("video/mp4"),
            Text => (!data[first_non_ws..].iter().any(|b| is_binary(*b))).then_some(TEXT),
        }
    }
}

fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 {
        return false;
    }
    if &data[4..8] != b"ftyp" {
        return false;
    }
    // Brands start at offset 8; offset 12 holds the minor version.
    (8..box_size)
        .step_by(4)
        .filter(|st| *st != 12)
        .any(|st| data.get(st..st + 3) == Some(b"mp4".as_slice()))
}

fn is_ws(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | 0x0C | b'\r' | b' ')
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures() {
        let cases: &[(&[u8], &str)] = &[
            (b"", TEXT),
            (b"Hello, world", TEXT),
            (b"{\"users\": []}", TEXT),
            (b"\n\n<!DOCTYPE html><html></html>", HTML),
            (b"<html>", HTML),
            (b"<HtMl><bOdY>blah</bOdY></HtMl>", HTML),
            (b"<p>para", HTML),
            (b"<pre>not html", TEXT),
            (b"<?xml version=\"1.0\"?><a/>", "text/xml; charset=utf-8"),
            (b"%PDF-1.7\n", "application/pdf"),
            (b"\x89PNG\x0D\x0A\x1A\x0A\x00\x00", "image/png"),
            (b"\xFF\xD8\xFF\xE0", "image/jpeg"),
            (b"GIF89a...", "image/gif"),
            (b"RIFF\x10\x00\x00\x00WEBPVP8 ", "image/webp"),
            (b"ID3\x03", "audio/mpeg"),
            (b"PK\x03\x04\x14\x00", "application/zip"),
            (b"\x1F\x8B\x08\x00", "application/x-gzip"),
            (b"\x00asm\x01\x00\x00\x00", "application/wasm"),
            (b"\xEF\xBB\xBFbom text", TEXT),
            (b"\xFE\xFF\x00\x41", "text/plain; charset=utf-16be"),
            (b"\x01\x02\x03binary", OCTET_STREAM),
        ];
        for (data, want) in cases {
            assert_eq!(detect_content_type(data), *want, "data {data:?}");
        }
    }

    #[test]
    fn test_mp4() {
        let mut data = vec![0x00, 0x00, 0x00, 0x1C];
        data.extend_from_slice(b"ftypisom");
        data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
        data.extend_from_slice(b"isomiso2mp41");
        assert_eq!(detect_content_type(&data), "video/mp4");
    }

    #[test]
    fn test_only_leading_bytes_considered() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(detect_content_type(&data), TEXT);
    }
}
