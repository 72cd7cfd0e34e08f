//! Query string, url-encoded and multipart/form-data body construction.
//!
//! Values are inserted verbatim; no percent-encoding is applied. Fields keep
//! their declaration order, and in multipart bodies every text part precedes
//! every binary part.

use uuid::Uuid;

use crate::types::{BinaryField, TextField};

const CRLF: &[u8] = b"\r\n";
const BOUNDARY_PREFIX: &str = "--------------------------";

/// Render `name=value` pairs joined by `&`.
pub fn build_query_string(fields: &[TextField]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(&field.name);
        out.push('=');
        out.push_str(&field.value);
    }
    out
}

/// UTF-8 bytes of the query-string rendering, used as a POST body.
pub fn build_url_encoded_body(fields: &[TextField]) -> Vec<u8> {
    build_query_string(fields).into_bytes()
}

/// Build a `multipart/form-data` body delimited by `boundary`.
///
/// The returned bytes end with the closing `--{boundary}--` line.
pub fn build_multipart_body(
    boundary: &str,
    text_fields: &[TextField],
    binary_fields: &[BinaryField],
) -> Vec<u8> {
    let mut body = Vec::new();

    for field in text_fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field.name).as_bytes(),
        );
        body.extend_from_slice(field.value.as_bytes());
        body.extend_from_slice(CRLF);
    }

    for field in binary_fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field.name, field.filename
            )
            .as_bytes(),
        );
        let content_type = field.effective_content_type();
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(&field.data);
        body.extend_from_slice(CRLF);
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// A fresh boundary token: a dash run followed by 32 random hex digits.
pub fn generate_boundary() -> String {
    format!("{BOUNDARY_PREFIX}{}", Uuid::new_v4().simple())
}

/// Whether the delimiter `--{boundary}` occurs inside any part payload.
pub fn boundary_collides(
    boundary: &str,
    text_fields: &[TextField],
    binary_fields: &[BinaryField],
) -> bool {
    let delimiter = format!("--{boundary}");
    let needle = delimiter.as_bytes();
    text_fields.iter().any(|f| contains(f.value.as_bytes(), needle))
        || binary_fields.iter().any(|f| contains(&f.data, needle))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
