//! The extraction engine: scans normalized paragraphs for URL and email
//! occurrences and builds the ordered entry list the chooser operates on.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::Result;
use crate::message::ParsedMessage;
use crate::normalize;

/// TLDs accepted when guessing that a bare `host.name.tld` token is a URL.
/// A curated common subset; extend it rather than matching every dotted word.
const KNOWN_TLDS: &[&str] = &[
    "com", "org", "net", "edu", "gov", "mil", "int", "info", "biz", "name", "io", "dev", "app",
    "ai", "co", "me", "tv", "cc", "xyz", "online", "site", "tech", "blog", "news", "cloud", "eu",
    "us", "uk", "de", "fr", "es", "it", "nl", "se", "no", "fi", "dk", "pl", "cz", "ch", "at",
    "be", "ru", "ua", "jp", "cn", "kr", "in", "au", "nz", "ca", "br", "mx", "ar", "za",
];

const URL_INTERIOR: &str = r"[{}()@\w/\-%?!&.=:;+,#~]";
const URL_TRAILING: &str = r"[{}()@\w/\-%&=+#]";

/// The default matcher: scheme'd URLs, email addresses (with or without
/// `mailto:`), and bare hostnames ending in a known TLD. An optional
/// `<URL:...>` / `<...>` wrapper is tolerated and excluded from the match.
static DEFAULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?i)<?(?:URL:)?(?P<m>(?:https?|ftps?|file)://{interior}*{trailing}|(?P<email>(?:mailto:)?[\w.+-]+@[\w.-]*[\w-])|\b[\w-]+(?:\.[\w-]+)*\.(?:{tlds})\b)>?",
        interior = URL_INTERIOR,
        trailing = URL_TRAILING,
        tlds = KNOWN_TLDS.join("|"),
    );
    Regex::new(&pattern).expect("default pattern is well-formed")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Url,
    Email,
}

/// One extracted URL or email-address occurrence.
///
/// `text` and `order` never change after extraction; `shortened` and
/// `escaped` are display toggles owned by the chooser.
#[derive(Debug, Clone)]
pub struct LinkEntry {
    /// The exact matched string as it appears in the source.
    pub text: String,
    pub kind: EntryKind,
    /// The paragraph the match was found in; empty when context is disabled.
    pub context: String,
    /// First-seen index across all parts; display order may be reversed but
    /// this never changes.
    pub order: usize,
    /// Truncate the URL to the display width.
    pub shortened: bool,
    /// Show the raw percent-escaped form instead of the decoded one.
    pub escaped: bool,
}

impl LinkEntry {
    /// What actually gets dispatched: bare email addresses become `mailto:`
    /// targets, everything else is passed through verbatim.
    pub fn target(&self) -> String {
        match self.kind {
            EntryKind::Email if !starts_with_ignore_case(&self.text, "mailto:") => {
                format!("mailto:{}", self.text)
            }
            _ => self.text.clone(),
        }
    }

    /// The text to render, honoring the escape and shorten toggles.
    pub fn display_text(&self, width: usize) -> String {
        let shown = if self.escaped {
            self.text.clone()
        } else {
            percent_decode_str(&self.text)
                .decode_utf8()
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| self.text.clone())
        };
        if self.shortened && width > 0 && shown.chars().count() > width {
            let mut cut: String = shown.chars().take(width.saturating_sub(1)).collect();
            cut.push('…');
            cut
        } else {
            shown
        }
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Scans text with either the default matcher or a user-supplied pattern.
///
/// A custom pattern replaces all default matching: linksift then behaves as
/// a general text selector, and every match is treated as a `Url` entry.
pub struct Extractor {
    pattern: Option<Regex>,
    with_context: bool,
}

impl Extractor {
    /// Fails fast with a `PatternError` on an invalid user pattern; no
    /// scanning happens after a failure.
    pub fn new(custom_pattern: Option<&str>, with_context: bool) -> Result<Self> {
        let pattern = custom_pattern.map(Regex::new).transpose()?;
        Ok(Self {
            pattern,
            with_context,
        })
    }

    /// Extract all entries from a parsed message: body parts first in scan
    /// order, then any captured link headers.
    pub fn extract(&self, message: &ParsedMessage) -> Vec<LinkEntry> {
        let mut entries = Vec::new();
        for part in &message.parts {
            for paragraph in normalize::paragraphs(part) {
                self.scan_block(&paragraph, &paragraph, &mut entries);
            }
        }
        for (name, value) in &message.headers {
            let context = format!("{}: {}", name, value);
            self.scan_block(value, &context, &mut entries);
        }
        tracing::debug!("extracted {} entries", entries.len());
        entries
    }

    fn scan_block(&self, text: &str, context: &str, entries: &mut Vec<LinkEntry>) {
        match &self.pattern {
            Some(custom) => {
                for m in custom.find_iter(text) {
                    push_entry(entries, m.as_str(), EntryKind::Url, context, self.with_context);
                }
            }
            None => {
                for caps in DEFAULT_PATTERN.captures_iter(text) {
                    let text = caps.name("m").map(|m| m.as_str()).unwrap_or_default();
                    let kind = if caps.name("email").is_some() {
                        EntryKind::Email
                    } else {
                        EntryKind::Url
                    };
                    push_entry(entries, text, kind, context, self.with_context);
                }
            }
        }
    }
}

fn push_entry(
    entries: &mut Vec<LinkEntry>,
    text: &str,
    kind: EntryKind,
    context: &str,
    with_context: bool,
) {
    entries.push(LinkEntry {
        text: text.to_string(),
        kind,
        context: if with_context {
            context.to_string()
        } else {
            String::new()
        },
        order: entries.len(),
        shortened: true,
        escaped: false,
    });
}

/// Remove later entries whose `text` exactly matches an earlier one
/// (case-sensitive, byte-exact). The first occurrence keeps its order and
/// context.
pub fn dedupe(entries: Vec<LinkEntry>) -> Vec<LinkEntry> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.text.clone()))
        .collect()
}
