//! The per-request envelope.
//!
//! One [`Envelope`] is built per inbound request from the tokenizer's
//! output and consumed entirely within that request: handler code reads
//! cookies, parameters, and headers from it, stages outgoing headers on it,
//! and the transport writer finally serializes
//! [`Envelope::response_header_block`] in front of whatever body the
//! handler produced. Cookie and parameter tables are derived eagerly, so a
//! request that does not match its own grammar is rejected before any
//! handler runs.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::config::Settings;
use crate::http::cookie::{self, MalformedCookieError, SetCookie};
use crate::http::headers::ResponseHeaders;
use crate::http::{FORM_MEDIA_TYPE, JSON_MEDIA_TYPE, media_type};
use crate::security::codec::{CookieCodec, DecodeError};
use crate::template::{RenderError, TemplateRenderer};

/// Tokenized HTTP input as the (external) message parser delivers it: the
/// request target, the header map with lowercased names, and the body when
/// one was sent. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct RawHttpData {
    pub url: String,
    pub header: HashMap<String, String>,
    pub body: Option<String>,
}

/// Construction failed: the request does not match its own grammar.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error(transparent)]
    MalformedCookie(#[from] MalformedCookieError),
    #[error(transparent)]
    BodyParse(#[from] BodyParseError),
}

/// The body does not match the grammar its `Content-Type` declared.
#[derive(Debug, Error)]
pub enum BodyParseError {
    #[error("form body segment `{0}` has no `=` delimiter")]
    Form(String),
    #[error("body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON body is not an object")]
    NotAnObject,
}

pub struct Envelope {
    data: RawHttpData,
    message: String,
    settings: Arc<Settings>,
    codec: CookieCodec,
    cookies: IndexMap<String, String>,
    params: IndexMap<String, String>,
    response: ResponseHeaders,
}

impl Envelope {
    /// Build the envelope for one inbound request.
    ///
    /// Fails fast on a cookie segment without an `=` delimiter and on a
    /// body that its declared content type cannot parse.
    pub fn new(
        data: RawHttpData,
        message: impl Into<String>,
        settings: Arc<Settings>,
    ) -> Result<Self, EnvelopeError> {
        let raw_cookies = data.header.get("cookie").map(String::as_str).unwrap_or("");
        let cookies = cookie::parse_cookie_header(raw_cookies)?;
        let params = derive_params(&data)?;
        let codec = CookieCodec::new(&settings.cookie_secret);
        let response = ResponseHeaders::new(&settings.server_name);

        Ok(Self {
            data,
            message: message.into(),
            settings,
            codec,
            cookies,
            params,
            response,
        })
    }

    pub fn url(&self) -> &str {
        &self.data.url
    }

    pub fn get_cookie(&self, key: &str) -> Option<&str> {
        self.cookies.get(key).map(String::as_str)
    }

    /// Decrypt a cookie written by [`Envelope::set_security_cookie`].
    ///
    /// Absent or empty cookies are `Ok(None)`. A value that fails to decode
    /// propagates the [`DecodeError`]; callers wanting graceful degradation
    /// fall back to their default explicitly rather than the failure being
    /// swallowed here.
    pub fn get_security_cookie(&self, key: &str) -> Result<Option<String>, DecodeError> {
        match self.get_cookie(key) {
            None | Some("") => Ok(None),
            Some(wire) => self.codec.decode(wire).map(Some),
        }
    }

    pub fn get_parameter(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Percent-decoded parameter value. Absent or empty parameters are
    /// `None`, so a caller-side default is never run through the decoder.
    pub fn get_decoded_parameter(&self, key: &str) -> Option<String> {
        self.get_parameter(key)
            .filter(|value| !value.is_empty())
            .map(|value| {
                let bytes = urlencoding::decode_binary(value.as_bytes());
                String::from_utf8_lossy(&bytes).into_owned()
            })
    }

    /// Case-insensitive lookup against the incoming header map, which the
    /// tokenizer stores with lowercased names.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.data
            .header
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Append one header line per entry. Same-named lines accumulate;
    /// cookies go through [`Envelope::set_cookie`], which replaces instead.
    pub fn set_header<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in entries {
            self.response.set_raw(name, value);
        }
    }

    /// Stage a `Set-Cookie` line, replacing any staged cookie of the same
    /// name in place.
    pub fn set_cookie(&mut self, cookie: SetCookie) {
        self.response.set_cookie(cookie);
    }

    /// Like [`Envelope::set_cookie`], with the value encrypted by the
    /// cookie codec first.
    pub fn set_security_cookie(&mut self, mut cookie: SetCookie) {
        cookie.value = self.codec.encode(&cookie.value);
        self.response.set_cookie(cookie);
    }

    /// Instruct the client to delete a cookie: empty value, expiry now.
    pub fn clear_cookie(&mut self, name: &str, path: &str, domain: Option<&str>) {
        let mut cookie = SetCookie::new(name, "").expires_days(0).path(path);
        if let Some(domain) = domain {
            cookie = cookie.domain(domain);
        }
        self.set_cookie(cookie);
    }

    /// Clear every cookie the *request* carried. Cookies staged on this
    /// envelope but absent from the original request are left alone.
    pub fn clear_all_cookies(&mut self, path: &str, domain: Option<&str>) {
        let names: Vec<String> = self.cookies.keys().cloned().collect();
        for name in &names {
            self.clear_cookie(name, path, domain);
        }
    }

    /// Drop every staged header line whose name is exactly `name`,
    /// case-sensitive. Staged cookies answer to `Set-Cookie`.
    pub fn clear_header(&mut self, name: &str) {
        self.response.clear(name);
    }

    /// The serialized response header block: a leading blank line,
    /// CRLF-terminated header lines, and a trailing blank line.
    pub fn response_header_block(&self) -> String {
        self.response.to_block()
    }

    /// Serialize `data` as the JSON response body and tag the response
    /// `Content-Type: application/json`. Non-ASCII text stays unescaped.
    pub fn render_as_json<T: Serialize>(&mut self, data: &T) -> serde_json::Result<String> {
        let body = serde_json::to_string(data)?;
        self.set_header([("Content-Type", JSON_MEDIA_TYPE)]);
        Ok(body)
    }

    /// Render a template below the configured template root. Renderer
    /// failures propagate unchanged.
    pub fn render(
        &self,
        renderer: &dyn TemplateRenderer,
        template_path: &str,
        bindings: &HashMap<String, String>,
    ) -> Result<String, RenderError> {
        let full_path = format!("{}{}", self.settings.template_root, template_path);
        renderer.render(Path::new(&full_path), bindings)
    }

    /// The original unparsed message text, for diagnostics or pass-through.
    pub fn raw_message(&self) -> &str {
        &self.message
    }

    /// The raw message split at the first blank line into its header part
    /// and body part, when the separator exists.
    pub fn message_halves(&self) -> Option<(&str, &str)> {
        self.message.split_once("\r\n\r\n")
    }
}

/// Merge URL query parameters with body parameters; body pairs win on a
/// key collision.
fn derive_params(data: &RawHttpData) -> Result<IndexMap<String, String>, BodyParseError> {
    let mut params = IndexMap::new();

    if let Some((_, query)) = data.url.split_once('?') {
        for segment in query.split('&').filter(|s| !s.is_empty()) {
            // A bare query key carries an empty value.
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            params.insert(key.to_string(), value.to_string());
        }
    }

    let declared = data
        .header
        .get("content-type")
        .map(|value| media_type(value))
        .unwrap_or_default();

    if let Some(body) = data.body.as_deref().filter(|body| !body.is_empty()) {
        if declared == FORM_MEDIA_TYPE {
            for segment in body.split('&').filter(|s| !s.is_empty()) {
                let (key, value) = segment
                    .split_once('=')
                    .ok_or_else(|| BodyParseError::Form(segment.to_string()))?;
                params.insert(key.to_string(), value.to_string());
            }
        } else if declared == JSON_MEDIA_TYPE {
            let parsed: serde_json::Value = serde_json::from_str(body)?;
            let object = parsed.as_object().ok_or(BodyParseError::NotAnObject)?;
            for (key, value) in object {
                let value = match value {
                    serde_json::Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                params.insert(key.clone(), value);
            }
        }
    }

    Ok(params)
}
