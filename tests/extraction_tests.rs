use linksift::extract::{self, EntryKind, Extractor};
use linksift::message;

#[test]
fn dedupe_collapses_repeated_urls_end_to_end() {
    let parsed = message::parse(b"Check http://a.example AND http://a.example again", false);
    let extractor = Extractor::new(None, true).unwrap();
    let entries = extract::dedupe(extractor.extract(&parsed));
    let targets: Vec<String> = entries.iter().map(|e| e.target()).collect();
    assert_eq!(targets, vec!["http://a.example"]);
}

#[test]
fn dedupe_never_leaves_equal_texts_and_keeps_smallest_order() {
    let parsed = message::parse(
        b"http://a.example http://b.example\n\nhttp://a.example http://c.example http://b.example",
        false,
    );
    let extractor = Extractor::new(None, true).unwrap();
    let entries = extract::dedupe(extractor.extract(&parsed));
    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            assert_ne!(a.text, b.text);
        }
    }
    // Survivors keep the order of their first occurrence.
    let orders: Vec<usize> = entries.iter().map(|e| e.order).collect();
    assert_eq!(orders, vec![0, 1, 3]);
}

#[test]
fn multipart_alternative_yields_duplicate_entries_without_dedupe() {
    let raw = concat!(
        "From: sender@example.com\r\n",
        "Date: Mon, 1 Jan 2024 00:00:00 +0000\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/alternative; boundary=\"sep\"\r\n",
        "\r\n",
        "--sep\r\n",
        "Content-Type: text/plain\r\n",
        "\r\n",
        "read http://b.example today\r\n",
        "--sep\r\n",
        "Content-Type: text/html\r\n",
        "\r\n",
        "<p>read <a href=\"http://b.example\">http://b.example</a> today</p>\r\n",
        "--sep--\r\n",
    );
    let parsed = message::parse(raw.as_bytes(), false);
    let extractor = Extractor::new(None, true).unwrap();

    // Both alternative branches are scanned; the same URL appears once per
    // part, in part scan order.
    let entries = extractor.extract(&parsed);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, entries[1].text);
    assert!(entries[0].order < entries[1].order);

    let deduped = extract::dedupe(entries);
    assert_eq!(deduped.len(), 1);
}

#[test]
fn html_part_contributes_paragraph_context() {
    let raw = concat!(
        "From: sender@example.com\r\n",
        "Content-Type: text/html\r\n",
        "\r\n",
        "<p>intro text</p><p>the offer at <a href=\"http://deal.example\">the shop</a> ends soon</p>\r\n",
    );
    let parsed = message::parse(raw.as_bytes(), false);
    let extractor = Extractor::new(None, true).unwrap();
    let entries = extractor.extract(&parsed);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "http://deal.example");
    assert!(entries[0].context.contains("ends soon"));
    assert!(!entries[0].context.contains("intro text"));
}

#[test]
fn header_scanning_appends_after_body() {
    let raw = concat!(
        "From: sender@example.com\r\n",
        "List-Archive: <http://archive.example/list>\r\n",
        "Content-Type: text/plain\r\n",
        "\r\n",
        "body link http://body.example\r\n",
    );
    let extractor = Extractor::new(None, true).unwrap();

    let without = extractor.extract(&message::parse(raw.as_bytes(), false));
    assert_eq!(without.len(), 1);

    let with = extractor.extract(&message::parse(raw.as_bytes(), true));
    let texts: Vec<&str> = with.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["http://body.example", "http://archive.example/list"]);
}

#[test]
fn custom_pattern_turns_the_tool_into_a_text_selector() {
    let parsed = message::parse(b"ticket FOO-123 blocks http://tracker.example/FOO-456", false);
    let extractor = Extractor::new(Some(r"FOO-\d+"), false).unwrap();
    let entries = extractor.extract(&parsed);
    let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["FOO-123", "FOO-456"]);
    assert!(entries.iter().all(|e| e.kind == EntryKind::Url));
}

#[test]
fn compact_extraction_leaves_context_empty() {
    let parsed = message::parse(b"a paragraph with http://x.example inside", false);
    let extractor = Extractor::new(None, false).unwrap();
    let entries = extractor.extract(&parsed);
    assert_eq!(entries[0].context, "");
}

#[test]
fn email_addresses_are_offered_as_mailto_targets() {
    let parsed = message::parse(b"contact support@example.net for help", false);
    let extractor = Extractor::new(None, false).unwrap();
    let entries = extractor.extract(&parsed);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Email);
    assert_eq!(entries[0].text, "support@example.net");
    assert_eq!(entries[0].target(), "mailto:support@example.net");
}
