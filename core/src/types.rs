//! Request description types.
//!
//! # Design
//! `RequestSpec` is plain data: the caller fills it in, hands it to
//! `client::send` (or `client::build_request`) once, and drops it. Every type
//! derives serde so a host can ship a spec across the FFI boundary as JSON.
//! Missing sequences deserialize as empty, which covers the "absent" case.

use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;

/// Content type used for a binary part whose content type is empty.
pub const DEFAULT_BINARY_CONTENT_TYPE: &str = "application/octet-stream";

/// One named text form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextField {
    pub name: String,
    pub value: String,
}

impl TextField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One named file attachment. Only sent with POST requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryField {
    pub name: String,
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
    pub data: Vec<u8>,
}

impl BinaryField {
    pub fn new(
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            content_type: String::new(),
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// The content type written into the part header.
    pub fn effective_content_type(&self) -> &str {
        if self.content_type.is_empty() {
            DEFAULT_BINARY_CONTENT_TYPE
        } else {
            &self.content_type
        }
    }
}

/// A name/value cookie pair, sent on requests and collected from responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse the leading `name=value` pair of a `Set-Cookie` header value.
    /// Attributes such as `Path` or `Expires` are ignored.
    pub fn parse_set_cookie(header: &str) -> Option<Self> {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value.trim()))
    }
}

/// Everything needed to issue one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub text_fields: Vec<TextField>,
    #[serde(default)]
    pub binary_fields: Vec<BinaryField>,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    /// When false the request asks the server to close the connection.
    #[serde(default)]
    pub keep_alive: bool,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            text_fields: Vec::new(),
            binary_fields: Vec::new(),
            cookies: Vec::new(),
            keep_alive: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text_fields.push(TextField::new(name, value));
        self
    }

    pub fn binary(mut self, field: BinaryField) -> Self {
        self.binary_fields.push(field);
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push(Cookie::new(name, value));
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }
}
