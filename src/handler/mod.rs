//! Per-verb handler seam.
//!
//! The (external) router owns method selection; this module provides the
//! capability it dispatches to. Every verb defaults to a no-op so a handler
//! implementation only writes the verbs it serves.

use crate::http::HttpMethod;
use crate::http::envelope::Envelope;

/// One method per HTTP verb, each returning the response body it produced,
/// or `None` for a verb the handler does not serve.
pub trait Handler {
    fn get(&mut self, envelope: &mut Envelope) -> Option<String> {
        let _ = envelope;
        None
    }

    fn post(&mut self, envelope: &mut Envelope) -> Option<String> {
        let _ = envelope;
        None
    }

    fn put(&mut self, envelope: &mut Envelope) -> Option<String> {
        let _ = envelope;
        None
    }

    /// Default: log the request target and respond with an empty body.
    fn head(&mut self, envelope: &mut Envelope) -> Option<String> {
        log::info!("{}", envelope.url());
        Some(String::new())
    }

    fn options(&mut self, envelope: &mut Envelope) -> Option<String> {
        let _ = envelope;
        None
    }

    fn delete(&mut self, envelope: &mut Envelope) -> Option<String> {
        let _ = envelope;
        None
    }

    /// Default: the received message's two halves around the first
    /// blank-line separator, or `None` when the message has no separator.
    fn trace(&mut self, envelope: &mut Envelope) -> Option<(String, String)> {
        envelope
            .message_halves()
            .map(|(head, body)| (head.to_string(), body.to_string()))
    }

    fn connect(&mut self, envelope: &mut Envelope) -> Option<String> {
        let _ = envelope;
        None
    }
}

/// Route a parsed method to the matching handler capability. The trace
/// halves are echoed back re-joined by the separator they were split on.
pub fn dispatch(
    handler: &mut dyn Handler,
    method: HttpMethod,
    envelope: &mut Envelope,
) -> Option<String> {
    match method {
        HttpMethod::Get => handler.get(envelope),
        HttpMethod::Head => handler.head(envelope),
        HttpMethod::Post => handler.post(envelope),
        HttpMethod::Put => handler.put(envelope),
        HttpMethod::Delete => handler.delete(envelope),
        HttpMethod::Options => handler.options(envelope),
        HttpMethod::Connect => handler.connect(envelope),
        HttpMethod::Trace => handler
            .trace(envelope)
            .map(|(head, body)| format!("{head}\r\n\r\n{body}")),
        HttpMethod::Unknown => None,
    }
}
