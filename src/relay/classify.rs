//! Response header classification.
//!
//! The relay never rewrites these values; it only reads `Content-Type` and
//! `Content-Encoding` to tell textual bodies from binary ones, and flags the
//! `Transfer-Encoding` line that must not be re-emitted.

/// Split a raw header line into name and trimmed value. Both stay bytes: a
/// value may carry obs-text that is not UTF-8.
pub fn split_header_line(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let colon = line.iter().position(|&b| b == b':')?;
    let name = line[..colon].trim_ascii();
    if name.is_empty() || name.contains(&b' ') {
        return None;
    }
    Some((name, line[colon + 1..].trim_ascii()))
}

/// `Transfer-Encoding` lines are dropped on emission; the body is already
/// fully materialized.
pub fn is_transfer_encoding(line: &[u8]) -> bool {
    line.get(..17)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"transfer-encoding"))
}

/// Content metadata extracted from a response header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentInfo {
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
}

impl ContentInfo {
    /// Scan header lines; later occurrences override earlier ones.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut info = ContentInfo::default();
        for line in lines {
            let Some((name, value)) = split_header_line(line) else {
                continue;
            };
            let value = String::from_utf8_lossy(value);
            if name.eq_ignore_ascii_case(b"content-type") {
                let media = value.split(';').next().unwrap_or_default();
                info.content_type = Some(media.trim().to_ascii_lowercase());
            } else if name.eq_ignore_ascii_case(b"content-encoding") {
                info.content_encoding = Some(value.to_ascii_lowercase());
            }
        }
        info
    }

    /// Whether the body can be treated as text.
    pub fn is_textual(&self) -> bool {
        if self
            .content_encoding
            .as_deref()
            .is_some_and(|enc| !enc.is_empty() && enc != "identity")
        {
            return false;
        }
        match self.content_type.as_deref() {
            Some(ct) => {
                ct.starts_with("text/")
                    || ct.ends_with("+json")
                    || ct.ends_with("+xml")
                    || matches!(
                        ct,
                        "application/json"
                            | "application/xml"
                            | "application/javascript"
                            | "application/x-www-form-urlencoded"
                    )
            }
            None => false,
        }
    }
}

/// Status code and reason phrase of a line such as `HTTP/1.1 404 Not Found`.
/// The reason is empty when the line carries none.
pub fn parse_status_line(line: &[u8]) -> Option<(u16, &[u8])> {
    let space = line.iter().position(|&b| b == b' ')?;
    if !line[..space].starts_with(b"HTTP/") {
        return None;
    }
    let rest = line[space + 1..].trim_ascii_start();
    let code = rest.get(..3)?;
    if !code.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let reason = &rest[3..];
    if !reason.is_empty() && reason[0] != b' ' {
        return None;
    }
    let code = code
        .iter()
        .fold(0u16, |acc, digit| acc * 10 + u16::from(digit - b'0'));
    Some((code, reason.trim_ascii()))
}
