//! C-ABI wrapper around `webreq-core`.
//!
//! # Overview
//! Lets any language with a C FFI plan form requests (query string,
//! url-encoded or multipart body, headers) and decode the response text while
//! doing the network I/O itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Requests are described to us as a JSON `RequestSpec`, which keeps the C
//!   surface small and lets binary payloads travel as byte arrays.
//! - The C caller owns all returned pointers and must call the matching
//!   `webreq_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::io::Cursor;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use webreq_core::{build_request, RequestSpec, ResponseHandle};

use types::*;

// ---------------------------------------------------------------------------
// Build request
// ---------------------------------------------------------------------------

/// Plan an HTTP request from a JSON-encoded `RequestSpec`.
///
/// Returns null if `spec_json` is null, is not valid UTF-8 or JSON, describes
/// an invalid request (for example a GET with binary fields), yields a URL or
/// header with an interior NUL byte, or if an internal panic occurs. The
/// caller must free the returned pointer with `webreq_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn webreq_build_request(spec_json: *const c_char) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if spec_json.is_null() {
            return std::ptr::null_mut();
        }
        let json = match unsafe { CStr::from_ptr(spec_json) }.to_str() {
            Ok(s) => s,
            Err(_) => return std::ptr::null_mut(),
        };
        let spec: RequestSpec = match serde_json::from_str(json) {
            Ok(spec) => spec,
            Err(_) => return std::ptr::null_mut(),
        };
        match build_request(&spec) {
            Ok(req) => FfiHttpRequest::from_core(req).unwrap_or(std::ptr::null_mut()),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Read response
// ---------------------------------------------------------------------------

/// Decode the body of a host-executed response as UTF-8 text.
///
/// A null `body` with `body_len == 0` is an empty body.
#[unsafe(no_mangle)]
pub extern "C" fn webreq_read_response(
    response: *const FfiHttpResponse,
) -> *mut FfiResponseResult {
    catch_unwind(|| {
        if response.is_null() {
            return FfiResponseResult::null_arg("response");
        }
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() {
            if resp.body_len > 0 {
                return FfiResponseResult::null_arg("response.body");
            }
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(resp.body, resp.body_len) }.to_vec()
        };

        let mut handle = ResponseHandle::new(resp.status, Vec::new(), Cursor::new(body));
        match handle.read_text() {
            Ok(text) => FfiResponseResult::ok_text(resp.status, text),
            Err(e) => FfiResponseResult::from_error(resp.status, e),
        }
    })
    .unwrap_or_else(|_| FfiResponseResult::panic("panic in webreq_read_response"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `webreq_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webreq_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            let body = std::ptr::slice_from_raw_parts_mut(req.body, req.body_len);
            drop(unsafe { Box::from_raw(body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers =
                std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = unsafe { Box::from_raw(headers) };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiResponseResult` returned by `webreq_read_response`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webreq_free_result(result: *mut FfiResponseResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.text.is_null() {
            drop(unsafe { CString::from_raw(result.text) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn webreq_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_of(req: &FfiHttpRequest) -> Vec<(String, String)> {
        let headers = unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) };
        headers
            .iter()
            .map(|h| {
                let k = unsafe { CStr::from_ptr(h.key) }.to_str().unwrap().to_string();
                let v = unsafe { CStr::from_ptr(h.value) }.to_str().unwrap().to_string();
                (k, v)
            })
            .collect()
    }

    fn body_of(req: &FfiHttpRequest) -> &[u8] {
        unsafe { std::slice::from_raw_parts(req.body, req.body_len) }
    }

    #[test]
    fn build_get_request_appends_query() {
        let json = CString::new(
            r#"{"method":"GET","url":"http://localhost:3000/echo",
                "text_fields":[{"name":"a","value":"1"},{"name":"b","value":"2"}]}"#,
        )
        .unwrap();
        let req = webreq_build_request(json.as_ptr());
        assert!(!req.is_null());

        let r = unsafe { &*req };
        assert_eq!(r.method, FfiHttpMethod::Get);
        let url = unsafe { CStr::from_ptr(r.url) }.to_str().unwrap();
        assert_eq!(url, "http://localhost:3000/echo?a=1&b=2");
        assert!(r.body.is_null());
        assert_eq!(r.body_len, 0);
        assert_eq!(
            headers_of(r),
            vec![("connection".to_string(), "close".to_string())]
        );

        webreq_free_request(req);
    }

    #[test]
    fn build_post_form_request() {
        let json = CString::new(
            r#"{"method":"POST","url":"http://localhost:3000/form","keep_alive":true,
                "text_fields":[{"name":"fname","value":"awa"},{"name":"lname","value":"qwq"}]}"#,
        )
        .unwrap();
        let req = webreq_build_request(json.as_ptr());
        assert!(!req.is_null());

        let r = unsafe { &*req };
        assert_eq!(r.method, FfiHttpMethod::Post);
        assert_eq!(body_of(r), b"fname=awa&lname=qwq");
        assert_eq!(
            headers_of(r),
            vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string()
            )]
        );

        webreq_free_request(req);
    }

    #[test]
    fn build_multipart_request_keeps_nul_bytes() {
        let json = CString::new(
            r#"{"method":"POST","url":"http://localhost:3000/upload",
                "binary_fields":[{"name":"f","filename":"z.bin","data":[0,0,7]}]}"#,
        )
        .unwrap();
        let req = webreq_build_request(json.as_ptr());
        assert!(!req.is_null());

        let r = unsafe { &*req };
        let headers = headers_of(r);
        let content_type = &headers[0].1;
        let boundary = content_type.strip_prefix("multipart/form-data; boundary=").unwrap();
        let body = body_of(r);
        assert!(body.windows(3).any(|w| w == [0, 0, 7]));
        assert!(body.ends_with(format!("--{boundary}--\r\n").as_bytes()));

        webreq_free_request(req);
    }

    #[test]
    fn build_null_returns_null() {
        assert!(webreq_build_request(std::ptr::null()).is_null());
    }

    #[test]
    fn build_bad_json_returns_null() {
        let json = CString::new("not json").unwrap();
        assert!(webreq_build_request(json.as_ptr()).is_null());
    }

    #[test]
    fn build_get_with_binary_returns_null() {
        let json = CString::new(
            r#"{"method":"GET","url":"http://localhost:3000/echo",
                "binary_fields":[{"name":"f","filename":"f","data":[1]}]}"#,
        )
        .unwrap();
        assert!(webreq_build_request(json.as_ptr()).is_null());
    }

    #[test]
    fn build_nul_in_query_value_returns_null() {
        let json = CString::new(
            r#"{"method":"GET","url":"http://localhost:3000/echo",
                "text_fields":[{"name":"a","value":"x\u0000y"}]}"#,
        )
        .unwrap();
        assert!(webreq_build_request(json.as_ptr()).is_null());
    }

    #[test]
    fn build_nul_in_cookie_returns_null() {
        let json = CString::new(
            r#"{"method":"POST","url":"http://localhost:3000/form",
                "cookies":[{"name":"sid","value":"a\u0000b"}]}"#,
        )
        .unwrap();
        assert!(webreq_build_request(json.as_ptr()).is_null());
    }

    #[test]
    fn build_nul_in_multipart_value_is_kept_in_body() {
        let json = CString::new(
            r#"{"method":"POST","url":"http://localhost:3000/upload",
                "text_fields":[{"name":"a","value":"x\u0000y"}],
                "binary_fields":[{"name":"f","filename":"f","data":[1]}]}"#,
        )
        .unwrap();
        let req = webreq_build_request(json.as_ptr());
        assert!(!req.is_null());
        let r = unsafe { &*req };
        assert!(body_of(r).windows(3).any(|w| w == b"x\0y"));

        webreq_free_request(req);
    }

    #[test]
    fn read_response_text() {
        let body = "fname: awa, lname: qwq";
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
            body_len: body.len(),
        };
        let result = webreq_read_response(&resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.http_status, 200);
        assert!(r.error_message.is_null());
        let text = unsafe { CStr::from_ptr(r.text) }.to_str().unwrap();
        assert_eq!(text, body);

        webreq_free_result(result);
    }

    #[test]
    fn read_response_empty_body() {
        let resp = FfiHttpResponse {
            status: 204,
            body: std::ptr::null(),
            body_len: 0,
        };
        let result = webreq_read_response(&resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        let text = unsafe { CStr::from_ptr(r.text) }.to_str().unwrap();
        assert_eq!(text, "");

        webreq_free_result(result);
    }

    #[test]
    fn read_response_invalid_utf8() {
        let body = [0x66u8, 0xff, 0xfe];
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
            body_len: body.len(),
        };
        let result = webreq_read_response(&resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Encoding);
        assert!(!r.error_message.is_null());
        assert!(r.text.is_null());

        webreq_free_result(result);
    }

    #[test]
    fn read_null_response_returns_null_arg() {
        let result = webreq_read_response(std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);

        webreq_free_result(result);
    }

    #[test]
    fn generated_header_prefixes_enumerators() {
        let header = std::fs::read_to_string(concat!(env!("OUT_DIR"), "/webreq.h")).unwrap();
        assert!(header.contains("FfiErrorCode_Ok"));
        assert!(header.contains("FfiHttpMethod_Post"));
        assert!(header.contains("webreq_build_request"));
    }

    #[test]
    fn free_request_null_is_safe() {
        webreq_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        webreq_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        webreq_free_string(std::ptr::null_mut());
    }
}
