//! Per-request HTTP envelope with encrypted cookie support.
//!
//! The crate turns already-tokenized HTTP data into a queryable
//! [`Envelope`]: cookie and parameter tables are derived once at
//! construction, outgoing headers accumulate in an ordered buffer, and
//! security cookies round-trip through a symmetric cipher
//! (see [`security`]). Listening, routing, and message tokenization are
//! left to the host application — the envelope starts where the parser
//! stops and ends at the serialized response header block.

pub mod config;
pub mod handler;
pub mod http;
pub mod security;
pub mod template;

pub use config::Settings;
pub use http::HttpMethod;
pub use http::cookie::SetCookie;
pub use http::envelope::{Envelope, EnvelopeError, RawHttpData};
pub use security::codec::CookieCodec;
