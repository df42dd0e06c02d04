//! Text normalization: turns a decoded body part into plain text with
//! paragraph boundaries preserved (blank-line-separated blocks).
//!
//! HTML handling is deliberately coarse. Markup is stripped, whitespace
//! collapsed, and block-level elements become paragraph breaks; context is
//! recovered at paragraph granularity, not word granularity. This is a
//! known limitation, not something to paper over with layout heuristics.

use scraper::{ElementRef, Html, Node};

use crate::message::{MessagePart, PartKind};

/// Normalize one body part into its paragraphs.
pub fn paragraphs(part: &MessagePart) -> Vec<String> {
    match part.kind {
        PartKind::Plain => plain_paragraphs(&part.text),
        PartKind::Html => html_paragraphs(&part.text),
    }
}

/// Plain text: paragraphs are maximal runs of non-blank lines.
pub fn plain_paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// HTML: strip tags into running text, breaking paragraphs at block-level
/// elements. Link targets that would vanish with the markup (`a href`,
/// `img src`) are appended to the paragraph so extraction still sees them.
pub fn html_paragraphs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut walker = ParagraphWalker::default();
    walker.walk(&document.root_element());
    let out = walker.finish();

    if out.is_empty() && !html.trim().is_empty() {
        // The tree walk came up empty (malformed or exotic markup);
        // fall back to html2text like the email renderer ladder does.
        tracing::debug!("html walk produced no text, falling back to html2text");
        return plain_paragraphs(&html2text::from_read(html.as_bytes(), 200));
    }
    out
}

#[derive(Default)]
struct ParagraphWalker {
    paragraphs: Vec<String>,
    current: String,
}

impl ParagraphWalker {
    fn walk(&mut self, element: &ElementRef) {
        for node in element.children() {
            match node.value() {
                Node::Element(el) => {
                    let Some(child) = ElementRef::wrap(node) else {
                        continue;
                    };
                    match el.name() {
                        "script" | "style" | "head" | "meta" | "link" | "title" => {}
                        "br" => self.break_paragraph(),
                        "a" => {
                            self.walk(&child);
                            if let Some(href) = child.value().attr("href") {
                                self.append_target(href);
                            }
                        }
                        "img" => {
                            if let Some(alt) = child.value().attr("alt") {
                                self.push_text(alt);
                            }
                            if let Some(src) = child.value().attr("src") {
                                self.append_target(src);
                            }
                        }
                        name if is_block(name) => {
                            self.break_paragraph();
                            self.walk(&child);
                            self.break_paragraph();
                        }
                        _ => self.walk(&child),
                    }
                }
                Node::Text(text) => self.push_text(text),
                _ => {}
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        for word in text.split_whitespace() {
            if !self.current.is_empty() {
                self.current.push(' ');
            }
            self.current.push_str(word);
        }
    }

    /// Keep a link target visible in the paragraph unless the anchor text
    /// already spelled it out.
    fn append_target(&mut self, target: &str) {
        let target = target.trim();
        let linkish = ["http://", "https://", "ftp://", "ftps://", "mailto:"]
            .iter()
            .any(|scheme| target.len() > scheme.len() && target[..scheme.len()].eq_ignore_ascii_case(scheme));
        if linkish && !self.current.contains(target) {
            self.push_text(target);
        }
    }

    fn break_paragraph(&mut self) {
        let para = self.current.trim();
        if !para.is_empty() {
            self.paragraphs.push(para.to_string());
        }
        self.current.clear();
    }

    fn finish(mut self) -> Vec<String> {
        self.break_paragraph();
        self.paragraphs
    }
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "ul"
            | "ol"
            | "li"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "table"
            | "tr"
            | "blockquote"
            | "pre"
            | "hr"
            | "section"
            | "article"
            | "header"
            | "footer"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_splits_on_blank_lines() {
        let paras = plain_paragraphs("one\ntwo\n\nthree\n\n\nfour\n");
        assert_eq!(paras, vec!["one\ntwo", "three", "four"]);
    }

    #[test]
    fn html_blocks_become_paragraphs() {
        let paras = html_paragraphs("<p>first block</p><p>second block</p>");
        assert_eq!(paras, vec!["first block", "second block"]);
    }

    #[test]
    fn inline_markup_flattens_into_running_text() {
        let paras = html_paragraphs("<p>go to <b>the</b> <i>site</i> now</p>");
        assert_eq!(paras, vec!["go to the site now"]);
    }

    #[test]
    fn href_survives_tag_stripping() {
        let paras = html_paragraphs("<p>click <a href=\"http://x.example/page\">here</a></p>");
        assert_eq!(paras, vec!["click here http://x.example/page"]);
    }

    #[test]
    fn spelled_out_anchor_is_not_doubled() {
        let paras =
            html_paragraphs("<p><a href=\"http://x.example\">http://x.example</a></p>");
        assert_eq!(paras, vec!["http://x.example"]);
    }

    #[test]
    fn script_and_style_are_skipped() {
        let paras = html_paragraphs(
            "<style>p { color: red }</style><p>visible</p><script>var x = 'http://no.example'</script>",
        );
        assert_eq!(paras, vec!["visible"]);
    }

    #[test]
    fn list_items_break_paragraphs() {
        let paras = html_paragraphs("<ul><li>alpha</li><li>beta</li></ul>");
        assert_eq!(paras, vec!["alpha", "beta"]);
    }

    #[test]
    fn br_breaks_paragraph() {
        let paras = html_paragraphs("<p>top<br>bottom</p>");
        assert_eq!(paras, vec!["top", "bottom"]);
    }
}
