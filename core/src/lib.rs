//! Form-encoding HTTP request helper.
//!
//! # Overview
//! Builds GET query strings, `application/x-www-form-urlencoded` bodies and
//! `multipart/form-data` bodies from ordered text and binary fields, plans
//! them into plain-data `HttpRequest` values, and hands the round-trip to a
//! `Transport`. The response comes back as a `ResponseHandle` whose body can
//! be drained exactly once, as bytes or as text.
//!
//! # Design
//! - Body construction (`form`) is pure and deterministic given a boundary.
//! - `client::build_request` does all planning without I/O, so hosts that
//!   execute requests themselves (see the FFI crate) share the same logic.
//! - `UreqTransport` is the default transport; socket I/O, TLS, redirects and
//!   DNS are ureq's concern, not ours.

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod types;

pub use client::{build_request, send, Transport, UreqTransport};
pub use error::RequestError;
pub use http::{HttpMethod, HttpRequest, ResponseHandle};
pub use types::{BinaryField, Cookie, RequestSpec, TextField};
