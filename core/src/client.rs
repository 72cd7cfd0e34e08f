//! Request planning and the transport seam.
//!
//! # Design
//! `build_request` turns a `RequestSpec` into a plain-data `HttpRequest`
//! without touching the network: it appends the GET query string, picks the
//! url-encoded or multipart body, generates the boundary as a local value,
//! and sets the `content-type`, `cookie` and `connection` headers. `send`
//! runs that plan through a `Transport`. One attempt, no retries.

use tracing::{debug, warn};

use crate::error::RequestError;
use crate::form::{
    boundary_collides, build_multipart_body, build_query_string, build_url_encoded_body,
    generate_boundary,
};
use crate::http::{HttpMethod, HttpRequest, ResponseHandle};
use crate::types::RequestSpec;

pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// Executes a planned request and hands back the response.
///
/// Implementations own connection setup, TLS, redirects and DNS. A failure to
/// reach the server is reported as `RequestError::Transport`; HTTP status
/// codes are returned as data.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<ResponseHandle, RequestError>;
}

/// Plan `spec` into an `HttpRequest`.
pub fn build_request(spec: &RequestSpec) -> Result<HttpRequest, RequestError> {
    if spec.url.is_empty() {
        return Err(RequestError::InvalidRequest("url is empty".to_string()));
    }

    let mut headers = Vec::new();
    let (url, body) = match spec.method {
        HttpMethod::Get => {
            if !spec.binary_fields.is_empty() {
                return Err(RequestError::InvalidRequest(
                    "binary fields can only be sent with POST".to_string(),
                ));
            }
            let url = if spec.text_fields.is_empty() {
                spec.url.clone()
            } else {
                format!("{}?{}", spec.url, build_query_string(&spec.text_fields))
            };
            (url, None)
        }
        HttpMethod::Post if spec.binary_fields.is_empty() => {
            headers.push(("content-type".to_string(), FORM_URL_ENCODED.to_string()));
            (spec.url.clone(), Some(build_url_encoded_body(&spec.text_fields)))
        }
        HttpMethod::Post => {
            let boundary = fresh_boundary(spec);
            headers.push((
                "content-type".to_string(),
                format!("multipart/form-data; boundary={boundary}"),
            ));
            let body = build_multipart_body(&boundary, &spec.text_fields, &spec.binary_fields);
            (spec.url.clone(), Some(body))
        }
    };

    if !spec.cookies.is_empty() {
        let cookie = spec
            .cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");
        headers.push(("cookie".to_string(), cookie));
    }
    if !spec.keep_alive {
        headers.push(("connection".to_string(), "close".to_string()));
    }

    Ok(HttpRequest {
        method: spec.method,
        url,
        headers,
        body,
    })
}

/// Plan `spec` and execute it on `transport`, blocking until the response
/// head arrives or the transport fails.
pub fn send<T: Transport + ?Sized>(
    spec: &RequestSpec,
    transport: &T,
) -> Result<ResponseHandle, RequestError> {
    let request = build_request(spec)?;
    debug!(
        method = %request.method,
        url = %request.url,
        body_len = request.body.as_ref().map_or(0, Vec::len),
        "sending request"
    );
    let response = transport.execute(request)?;
    debug!(status = response.status(), cookies = response.cookies().len(), "received response");
    Ok(response)
}

fn fresh_boundary(spec: &RequestSpec) -> String {
    loop {
        let boundary = generate_boundary();
        if !boundary_collides(&boundary, &spec.text_fields, &spec.binary_fields) {
            return boundary;
        }
        warn!(%boundary, "boundary occurs in form content, regenerating");
    }
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// An agent that returns 4xx/5xx responses as data rather than `Err`.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent. Status handling follows its config.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<ResponseHandle, RequestError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                let body = request.body.unwrap_or_default();
                builder.send(&body[..])
            }
        };
        let response = result.map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.into_body().into_reader();
        Ok(ResponseHandle::new(status, headers, body))
    }
}
