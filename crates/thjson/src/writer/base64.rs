//! Byte-literal output: short payloads as `` `BASE64` ``, longer ones wrapped
//! at 64 columns between `<<<`/`>>>` markers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const INLINE_THRESHOLD: usize = 80;
const WRAP_COLUMNS: usize = 64;

/// Renders `bytes` as a quoted or triple-bytes literal body (the surrounding
/// backticks/angle brackets are included; the caller just splices the
/// result in as a value).
#[must_use]
pub(super) fn render_bytes(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    if bytes.len() <= INLINE_THRESHOLD {
        format!("`{encoded}`")
    } else {
        let mut body = String::with_capacity(encoded.len() + encoded.len() / WRAP_COLUMNS + 8);
        body.push_str("<<<\n");
        for chunk in encoded.as_bytes().chunks(WRAP_COLUMNS) {
            // `encoded` is ASCII, so per-byte chunking never splits a
            // multi-byte scalar.
            body.push_str(std::str::from_utf8(chunk).expect("base64 output is ASCII"));
            body.push('\n');
        }
        body.push_str(">>>");
        body
    }
}
