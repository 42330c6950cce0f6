pub mod cookie;
pub mod envelope;
pub mod headers;

/// Media type declaring a form-encoded request body.
pub const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Media type declaring a JSON request body, also set on JSON responses.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// All HTTP methods the handler seam dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Unknown,
}

impl HttpMethod {
    pub fn parse(method: &str) -> HttpMethod {
        match method {
            "GET" => HttpMethod::Get,
            "HEAD" => HttpMethod::Head,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "TRACE" => HttpMethod::Trace,
            "OPTIONS" => HttpMethod::Options,
            "CONNECT" => HttpMethod::Connect,
            _ => HttpMethod::Unknown,
        }
    }
}

/// Media type of a `Content-Type` value: anything after a `;` parameter is
/// dropped and the result is lowercased, so `application/json; charset=utf-8`
/// still reads as JSON.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
