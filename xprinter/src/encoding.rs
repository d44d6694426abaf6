//! Text encoding for plain line printing
//!
//! These printers expect GBK. ASCII passes through unchanged; characters GBK
//! can't represent are replaced with `?` rather than emitted as HTML entities.

const NEWLINE: &[u8] = b"\r\n";

/// Encode text as GBK, one `?` per unmappable character
pub fn encode_gbk(s: &str) -> Vec<u8> {
    let (cow, _, had_errors) = encoding_rs::GBK.encode(s);
    if !had_errors {
        return cow.into_owned();
    }

    // encoding_rs writes NCRs for unmappable chars; redo per char
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        let mut tmp = [0u8; 4];
        let (cow, _, err) = encoding_rs::GBK.encode(c.encode_utf8(&mut tmp));
        if err {
            out.push(b'?');
        } else {
            out.extend_from_slice(&cow);
        }
    }
    out
}

/// A printable line: GBK text followed by CR LF
pub fn text_line(s: &str) -> Vec<u8> {
    let mut out = encode_gbk(s);
    out.extend_from_slice(NEWLINE);
    out
}
