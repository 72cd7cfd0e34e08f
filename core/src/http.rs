//! HTTP transport types.
//!
//! # Design
//! `HttpRequest` describes a planned request as plain data so that any
//! transport (ureq, a C host, a test double) can execute it. The response
//! side is a `ResponseHandle`: status, headers and cookies are plain data,
//! while the body is a stream that is moved out on the first read. Reading
//! twice yields `RequestError::BodyConsumed` instead of silently returning
//! an exhausted stream.

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::types::Cookie;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Produced by `client::build_request`. `url` already carries the query
/// string for GET requests; `body` is `None` for GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// The result of executing an `HttpRequest`.
///
/// The body stream is owned by the handle until it is read; reading moves it
/// out and drops it once drained, which releases the underlying connection.
pub struct ResponseHandle {
    status: u16,
    headers: Vec<(String, String)>,
    cookies: Vec<Cookie>,
    body: Option<Box<dyn Read>>,
}

impl ResponseHandle {
    /// Wrap a status, header list and body stream. Cookies are collected
    /// from every `Set-Cookie` header. The stream need not be `Send`.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Read + 'static) -> Self {
        let cookies = headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("set-cookie"))
            .filter_map(|(_, value)| Cookie::parse_set_cookie(value))
            .collect();
        Self {
            status,
            headers,
            cookies,
            body: Some(Box::new(body)),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Cookies set by the response, in header order.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx status into `RequestError::HttpStatus`.
    pub fn error_for_status(self) -> Result<Self, RequestError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(RequestError::HttpStatus { status: self.status })
        }
    }

    /// Whether the body is still available to read.
    pub fn is_consumed(&self) -> bool {
        self.body.is_none()
    }

    /// Drain the body into memory. Only the first call succeeds.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, RequestError> {
        let mut body = self.body.take().ok_or(RequestError::BodyConsumed)?;
        let mut buf = Vec::new();
        body.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Drain the body and decode it as UTF-8. Only the first call succeeds.
    pub fn read_text(&mut self) -> Result<String, RequestError> {
        let bytes = self.read_bytes()?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl fmt::Debug for ResponseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseHandle")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("cookies", &self.cookies)
            .field("consumed", &self.body.is_none())
            .finish()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
