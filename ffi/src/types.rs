//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible fields: `*mut c_char`
//! for text, pointer + length for byte buffers (multipart bodies can hold NUL
//! bytes), and tagged enums with explicit discriminants. Conversion functions
//! live here so `lib.rs` stays focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use webreq_core::{HttpMethod, HttpRequest, RequestError};

/// Convert message text into an owned C string. Interior NUL bytes cannot be
/// represented and yield an empty string.
fn message_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A planned HTTP request described as C-compatible plain data.
///
/// Built by `webreq_build_request`. The C caller executes the request and
/// frees it with `webreq_free_request`. `body` is null for GET requests.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: usize,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Returns `None` if the URL or any header contains an interior NUL byte,
    /// which a C string cannot carry.
    pub(crate) fn from_core(req: HttpRequest) -> Option<*mut Self> {
        let url = CString::new(req.url).ok()?;
        let headers = req
            .headers
            .into_iter()
            .map(|(k, v)| Some((CString::new(k).ok()?, CString::new(v).ok()?)))
            .collect::<Option<Vec<_>>>()?;

        let headers_len = headers.len() as u32;
        let headers = if headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: k.into_raw(),
                    value: v.into_raw(),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        let (body, body_len) = match req.body {
            Some(b) => {
                let len = b.len();
                (Box::into_raw(b.into_boxed_slice()) as *mut u8, len)
            }
            None => (std::ptr::null_mut(), 0),
        };

        Some(Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: url.into_raw(),
            headers,
            headers_len,
            body,
            body_len,
        })))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller fills this in after executing a request and passes a pointer
/// to `webreq_read_response`. The FFI layer copies but does not free the body.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResponseResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Encoding = 1,
    NullArg = 2,
    Panic = 3,
    Read = 4,
}

/// Result envelope for `webreq_read_response`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `text` holds
/// the decoded body. On failure `text` is null and `error_message` is a
/// human-readable C string.
#[repr(C)]
pub struct FfiResponseResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub text: *mut c_char,
}

impl FfiResponseResult {
    /// Build a success result carrying the response text.
    pub(crate) fn ok_text(status: u16, text: String) -> *mut Self {
        match CString::new(text) {
            Ok(text) => Box::into_raw(Box::new(FfiResponseResult {
                error_code: FfiErrorCode::Ok,
                error_message: std::ptr::null_mut(),
                http_status: status,
                text: text.into_raw(),
            })),
            Err(_) => Self::error(
                FfiErrorCode::Encoding,
                status,
                "response text contains a NUL byte",
            ),
        }
    }

    /// Build an error result from a `RequestError`.
    pub(crate) fn from_error(status: u16, err: RequestError) -> *mut Self {
        let code = match err {
            RequestError::Encoding(_) => FfiErrorCode::Encoding,
            _ => FfiErrorCode::Read,
        };
        Self::error(code, status, &err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg)
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiResponseResult {
            error_code,
            error_message: message_c_string(msg),
            http_status,
            text: std::ptr::null_mut(),
        }))
    }
}
