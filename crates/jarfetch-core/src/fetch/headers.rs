//! Track the status line, `Content-Length` and `Location` of the response
//! being received.

/// Head of the most recent response in a redirect chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: Option<u32>,
    pub content_length: Option<u64>,
    /// Raw `Location` value, possibly relative.
    pub location: Option<String>,
}

impl ResponseHead {
    /// Feed one raw header line as delivered by libcurl. A status line starts a
    /// new response and discards what was recorded for the previous hop.
    pub fn observe(&mut self, line: &str) {
        let line = line.trim();
        if let Some(code) = parse_status_line(line) {
            *self = ResponseHead {
                status: Some(code),
                ..ResponseHead::default()
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse::<u64>().ok();
            }
            if name.eq_ignore_ascii_case("location") {
                self.location = Some(value.trim().to_string());
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.status.is_some_and(|code| code >= 400)
    }

    /// Target libcurl is about to follow, once this response's headers are complete.
    pub fn redirect_target(&self) -> Option<&str> {
        match self.status {
            Some(code) if (300..400).contains(&code) => self.location.as_deref(),
            _ => None,
        }
    }
}

/// `HTTP/1.1 302 Found` -> `Some(302)`.
pub fn parse_status_line(line: &str) -> Option<u32> {
    let mut parts = line.split_whitespace();
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}
