//! Cookie wire grammar: parsing the incoming `Cookie` header and building
//! outgoing `Set-Cookie` lines.

use std::time::{Duration, SystemTime};

use indexmap::IndexMap;
use thiserror::Error;

use crate::http::headers::clean;

/// A `Cookie` header segment carried no `=` delimiter.
#[derive(Debug, Error)]
#[error("cookie segment `{segment}` has no `=` delimiter")]
pub struct MalformedCookieError {
    pub segment: String,
}

/// Parse a `Cookie` request header into an ordered name -> value table.
///
/// Pairs are separated by `"; "` and split on the first `=`, so a value may
/// itself contain `=`. Later pairs win on a duplicate name. A segment
/// without a delimiter fails the whole parse rather than being dropped.
pub fn parse_cookie_header(raw: &str) -> Result<IndexMap<String, String>, MalformedCookieError> {
    let mut cookies = IndexMap::new();
    if raw.is_empty() {
        return Ok(cookies);
    }

    for segment in raw.split("; ") {
        match segment.split_once('=') {
            Some((name, value)) => {
                cookies.insert(name.to_string(), value.to_string());
            }
            None => {
                return Err(MalformedCookieError {
                    segment: segment.to_string(),
                });
            }
        }
    }

    Ok(cookies)
}

/// An outgoing cookie, serialized as
/// `Set-Cookie: name=value; expires=<RFC1123>; Path=<path>[; Domain=<domain>]`.
///
/// Defaults: one day until expiry, path `/`, no domain.
#[derive(Debug, Clone)]
pub struct SetCookie {
    pub(crate) name: String,
    pub(crate) value: String,
    expires_days: u64,
    path: String,
    domain: Option<String>,
}

impl SetCookie {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: clean(name),
            value: clean(value),
            expires_days: 1,
            path: "/".to_string(),
            domain: None,
        }
    }

    pub fn expires_days(mut self, days: u64) -> Self {
        self.expires_days = days;
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = clean(path);
        self
    }

    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = Some(clean(domain));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire line, without the terminating CRLF. The expiry is computed
    /// at serialization time as now + `expires_days` days; zero days yields
    /// a cookie already expired when the client processes it.
    pub fn to_line(&self) -> String {
        let expires = SystemTime::now() + Duration::from_secs(self.expires_days * 86_400);
        let mut line = format!(
            "Set-Cookie: {}={}; expires={}; Path={}",
            self.name,
            self.value,
            httpdate::fmt_http_date(expires),
            self.path,
        );
        if let Some(domain) = &self.domain {
            line.push_str("; Domain=");
            line.push_str(domain);
        }
        line
    }
}
