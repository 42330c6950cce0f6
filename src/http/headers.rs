//! Outgoing header buffer for [`Envelope`](crate::http::envelope::Envelope).
//!
//! Entries are stored structured, in insertion order; wire text only exists
//! once [`ResponseHeaders::to_block`] serializes the buffer. Plain headers
//! accumulate — repeating a name appends another line, which is what
//! repeatable headers need — while cookies are keyed by their exact name and
//! replaced in place on re-set, so no duplicate `Set-Cookie` lines build up
//! for one cookie.

use crate::http::cookie::SetCookie;

enum HeaderEntry {
    Raw { name: String, value: String },
    Cookie(SetCookie),
}

impl HeaderEntry {
    fn name(&self) -> &str {
        match self {
            HeaderEntry::Raw { name, .. } => name,
            HeaderEntry::Cookie(_) => "Set-Cookie",
        }
    }

    fn line(&self) -> String {
        match self {
            HeaderEntry::Raw { name, value } => format!("{}: {}", name, value),
            HeaderEntry::Cookie(cookie) => cookie.to_line(),
        }
    }
}

pub struct ResponseHeaders {
    entries: Vec<HeaderEntry>,
}

impl ResponseHeaders {
    /// A fresh buffer always opens with the server identification header.
    pub fn new(server_name: &str) -> Self {
        let mut headers = Self {
            entries: Vec::new(),
        };
        headers.set_raw("Server", server_name);
        headers
    }

    /// Append a header entry. Repeated names accumulate; cookies go through
    /// [`ResponseHeaders::set_cookie`] instead.
    pub fn set_raw(&mut self, name: &str, value: &str) {
        self.entries.push(HeaderEntry::Raw {
            name: clean(name),
            value: clean(value),
        });
    }

    /// Insert a cookie, replacing any buffered cookie carrying the same name
    /// in place (the buffer position is kept). Matching is on the exact
    /// name, so `user` never shadows `username`.
    pub fn set_cookie(&mut self, cookie: SetCookie) {
        let existing = self.entries.iter().position(|entry| match entry {
            HeaderEntry::Cookie(buffered) => buffered.name() == cookie.name(),
            HeaderEntry::Raw { .. } => false,
        });
        match existing {
            Some(i) => self.entries[i] = HeaderEntry::Cookie(cookie),
            None => self.entries.push(HeaderEntry::Cookie(cookie)),
        }
    }

    /// Remove every entry whose name equals `name` exactly, case-sensitive,
    /// keeping the order of the rest. Buffered cookies answer to
    /// `Set-Cookie`.
    pub fn clear(&mut self, name: &str) {
        self.entries.retain(|entry| entry.name() != name);
    }

    /// Serialize the buffer: a leading blank line, one CRLF-terminated line
    /// per entry, and a trailing blank line, ready for the transport writer
    /// to concatenate with the response body.
    pub fn to_block(&self) -> String {
        let mut block = String::from("\r\n");
        for entry in &self.entries {
            block.push_str(&entry.line());
            block.push_str("\r\n");
        }
        block.push_str("\r\n");
        block
    }
}

/// Names and values never embed the line terminator.
pub(crate) fn clean(part: &str) -> String {
    part.replace(['\r', '\n'], "")
}
