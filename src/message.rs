//! Message intake: reads the raw input and hands the rest of the pipeline
//! decoded plain-Unicode text per body part.
//!
//! MIME multipart walking and transfer decoding are delegated to
//! `mail-parser`; this module only decides which parts are text, in what
//! order, and whether the input is an email at all.

use mail_parser::{Message, MessageParser, PartType};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Headers that commonly carry links worth offering alongside the body.
pub const LINK_HEADERS: &[&str] = &[
    "Link",
    "Archived-At",
    "List-Archive",
    "List-Unsubscribe",
    "List-Subscribe",
    "List-Post",
    "List-Help",
    "X-Mailing-List",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Plain,
    Html,
}

/// One decoded text body part, in scan order.
#[derive(Debug, Clone)]
pub struct MessagePart {
    pub kind: PartKind,
    pub text: String,
}

/// The decoded message: its text parts plus any captured link headers.
#[derive(Debug, Clone, Default)]
pub struct ParsedMessage {
    pub parts: Vec<MessagePart>,
    /// (header name, unfolded value) pairs, in `LINK_HEADERS` order.
    pub headers: Vec<(String, String)>,
}

/// Read the whole input up front. The interactive session reads keypresses
/// from /dev/tty, so the piped message stream must be fully consumed before
/// the event loop starts.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let bytes = match path {
        Some(p) => fs::read(p)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };
    tracing::debug!("read {} input bytes", bytes.len());
    Ok(bytes)
}

/// Decode the raw input into text parts.
///
/// Anything that parses as an email with at least a `From` or `Date` header
/// is walked part by part, descending into every multipart branch -
/// including every side of a multipart/alternative, so the same content may
/// yield the same URL more than once. Everything else is treated as one
/// plain-text part, so shell pipes of arbitrary text keep working and no
/// parser eats their first line.
pub fn parse(raw: &[u8], scan_headers: bool) -> ParsedMessage {
    if let Some(msg) = MessageParser::default().parse(raw) {
        if msg.from().is_some() || msg.date().is_some() {
            let mut parsed = ParsedMessage::default();
            collect_parts(&msg, &mut parsed.parts);
            if scan_headers {
                parsed.headers = link_headers(&msg);
            }
            tracing::debug!(
                "parsed email: {} text part(s), {} link header(s)",
                parsed.parts.len(),
                parsed.headers.len()
            );
            return parsed;
        }
    }

    ParsedMessage {
        parts: vec![MessagePart {
            kind: PartKind::Plain,
            text: String::from_utf8_lossy(raw).into_owned(),
        }],
        headers: Vec::new(),
    }
}

fn collect_parts(msg: &Message, out: &mut Vec<MessagePart>) {
    for part in &msg.parts {
        match &part.body {
            PartType::Text(text) => out.push(MessagePart {
                kind: PartKind::Plain,
                text: text.to_string(),
            }),
            PartType::Html(html) => out.push(MessagePart {
                kind: PartKind::Html,
                text: html.to_string(),
            }),
            PartType::Message(nested) => collect_parts(nested, out),
            _ => {}
        }
    }
}

fn link_headers(msg: &Message) -> Vec<(String, String)> {
    let mut found = Vec::new();
    for &name in LINK_HEADERS {
        if let Some(raw) = msg.header_raw(name) {
            let value = unfold(raw);
            if !value.is_empty() {
                found.push((name.to_string(), value));
            }
        }
    }
    found
}

/// Collapse folded header continuation lines into one spaced value.
fn unfold(raw: &str) -> String {
    raw.split(['\r', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_pipe_input_is_one_part() {
        let parsed = parse(b"just some text with http://example.com in it", false);
        assert_eq!(parsed.parts.len(), 1);
        assert_eq!(parsed.parts[0].kind, PartKind::Plain);
        assert!(parsed.parts[0].text.contains("http://example.com"));
    }

    #[test]
    fn first_line_of_non_email_survives() {
        // An email parser would swallow a leading "Subject:"-shaped line;
        // inputs without From/Date must pass through untouched.
        let parsed = parse(b"http://first.example\nmore text\n", false);
        assert!(parsed.parts[0].text.starts_with("http://first.example"));
    }

    #[test]
    fn multipart_alternative_yields_both_parts() {
        let raw = concat!(
            "From: a@example.com\r\n",
            "Date: Mon, 1 Jan 2024 00:00:00 +0000\r\n",
            "MIME-Version: 1.0\r\n",
            "Content-Type: multipart/alternative; boundary=\"b\"\r\n",
            "\r\n",
            "--b\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "See http://b.example please\r\n",
            "--b\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>See <a href=\"http://b.example\">here</a> please</p>\r\n",
            "--b--\r\n",
        );
        let parsed = parse(raw.as_bytes(), false);
        assert_eq!(parsed.parts.len(), 2);
        assert_eq!(parsed.parts[0].kind, PartKind::Plain);
        assert_eq!(parsed.parts[1].kind, PartKind::Html);
    }

    #[test]
    fn link_headers_are_captured_in_fixed_order() {
        let raw = concat!(
            "From: a@example.com\r\n",
            "List-Unsubscribe: <mailto:leave@example.com>\r\n",
            "List-Archive: <http://archive.example/list>\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "body\r\n",
        );
        let parsed = parse(raw.as_bytes(), true);
        let names: Vec<&str> = parsed.headers.iter().map(|(n, _)| n.as_str()).collect();
        // List-Archive comes before List-Unsubscribe in LINK_HEADERS.
        assert_eq!(names, vec!["List-Archive", "List-Unsubscribe"]);
    }

    #[test]
    fn unfold_joins_continuation_lines() {
        assert_eq!(
            unfold("<http://a.example/one>,\r\n <http://a.example/two>"),
            "<http://a.example/one>, <http://a.example/two>"
        );
    }
}
