use markspan_core::{Document, Mark, MarkKind, decode, encode, encode_sanitized};

fn mark(start: usize, end: usize, kind: MarkKind) -> Mark {
    Mark::new(start, end, kind, None).expect("valid mark")
}

fn mark_with(start: usize, end: usize, kind: MarkKind, data: &str) -> Mark {
    Mark::new(start, end, kind, Some(data.to_string())).expect("valid mark")
}

fn doc(text: &str, marks: Vec<Mark>) -> Document {
    Document {
        text: text.to_string(),
        marks,
    }
}

#[test]
fn bold_prefix_round_trips_exactly() {
    let document = doc("Hello world", vec![mark(0, 5, MarkKind::Bold)]);
    let markup = encode(&document);
    assert_eq!(markup, "<strong>Hello</strong> world");
    assert_eq!(decode(&markup), document);
}

#[test]
fn links_carry_their_href() {
    let document = doc(
        "Hello world",
        vec![mark_with(0, 5, MarkKind::Link, "https://example.com/?a=1&b=2")],
    );
    let markup = encode(&document);
    assert_eq!(
        markup,
        "<a href=\"https://example.com/?a=1&amp;b=2\">Hello</a> world"
    );
    assert_eq!(decode(&markup), document);
}

#[test]
fn style_marks_nest_as_three_spans() {
    let document = doc(
        "Hello world",
        vec![
            mark_with(0, 5, MarkKind::FontSize, "12"),
            mark_with(0, 5, MarkKind::FontColor, "ff0000"),
            mark_with(0, 5, MarkKind::FontFamily, "mono"),
        ],
    );
    let markup = encode(&document);
    assert_eq!(
        markup,
        "<span style=\"font-size: 12px\"><span style=\"color: #ff0000\">\
<span style=\"font-family: monospace\">Hello</span></span></span> world"
    );
    let decoded = decode(&markup);
    assert_eq!(decoded.text, document.text);
    let mut expected = document.marks.clone();
    expected.sort_by_key(|m| m.kind);
    let mut actual = decoded.marks.clone();
    actual.sort_by_key(|m| m.kind);
    assert_eq!(actual, expected);
}

#[test]
fn one_span_may_open_several_marks() {
    let decoded = decode("<span style=\"font-size: 20px; color: #00ff00\">hi</span>");
    assert_eq!(decoded.text, "hi");
    assert_eq!(
        decoded.marks,
        vec![
            mark_with(0, 2, MarkKind::FontSize, "20"),
            mark_with(0, 2, MarkKind::FontColor, "00ff00"),
        ]
    );
}

#[test]
fn newlines_become_break_tags_and_back() {
    let document = doc("a\nb", vec![]);
    assert_eq!(encode(&document), "a<br />b");
    for variant in ["a<br>b", "a<br/>b", "a<br />b", "a<BR>b"] {
        assert_eq!(decode(variant), document, "variant {variant}");
    }
}

#[test]
fn text_is_entity_escaped() {
    let document = doc("a & b < c > d", vec![]);
    let markup = encode(&document);
    assert_eq!(markup, "a &amp; b &lt; c &gt; d");
    assert_eq!(decode(&markup), document);
}

#[test]
fn unclosed_tags_are_force_closed_at_the_end() {
    let decoded = decode("<strong>abc<em>de");
    assert_eq!(decoded.text, "abcde");
    assert_eq!(
        decoded.marks,
        vec![mark(0, 5, MarkKind::Bold), mark(3, 5, MarkKind::Italic)]
    );
}

#[test]
fn stray_close_tags_are_ignored() {
    let decoded = decode("</em>abc</strong>");
    assert_eq!(decoded.text, "abc");
    assert_eq!(decoded.marks, vec![]);
}

#[test]
fn unknown_tags_are_dropped_but_their_text_kept() {
    let decoded = decode("<div class=\"x\">one</div> <blink>two</blink>");
    assert_eq!(decoded.text, "one two");
    assert_eq!(decoded.marks, vec![]);
}

#[test]
fn nested_marks_decode_to_overlapping_ranges() {
    let decoded = decode("<strong>ab<em>cd</em></strong>");
    assert_eq!(decoded.text, "abcd");
    assert_eq!(
        decoded.marks,
        vec![mark(0, 4, MarkKind::Bold), mark(2, 4, MarkKind::Italic)]
    );
}

#[test]
fn zero_length_tag_pairs_produce_no_marks() {
    let decoded = decode("ab<strong></strong>cd");
    assert_eq!(decoded.text, "abcd");
    assert_eq!(decoded.marks, vec![]);
}

#[test]
fn alternate_tag_spellings_decode_to_the_same_kinds() {
    let decoded = decode("<b>a</b><i>b</i><strike>c</strike><del>d</del>");
    assert_eq!(decoded.text, "abcd");
    // The two adjacent strike ranges merge during normalization.
    assert_eq!(
        decoded.marks,
        vec![
            mark(0, 1, MarkKind::Bold),
            mark(1, 2, MarkKind::Italic),
            mark(2, 4, MarkKind::Strike),
        ]
    );
}

#[test]
fn single_quoted_attributes_are_accepted() {
    let decoded = decode("<a href='https://example.com'>x</a>");
    assert_eq!(
        decoded.marks,
        vec![mark_with(0, 1, MarkKind::Link, "https://example.com")]
    );
}

#[test]
fn truncated_tag_at_end_is_literal_text() {
    let decoded = decode("ab<stro");
    assert_eq!(decoded.text, "ab<stro");
    assert_eq!(decoded.marks, vec![]);
}

#[test]
fn clamped_marks_encode_inside_the_buffer() {
    let document = doc("hello", vec![mark(3, 100, MarkKind::Bold)]);
    assert_eq!(encode(&document), "hel<strong>lo</strong>");
}

#[test]
fn encoded_output_is_well_formed_for_non_overlapping_marks() {
    let document = doc(
        "Hello brave new world",
        vec![
            mark(0, 5, MarkKind::Bold),
            mark(6, 11, MarkKind::Italic),
            mark_with(12, 15, MarkKind::Link, "https://example.com"),
            mark_with(16, 21, MarkKind::FontColor, "336699"),
        ],
    );
    let markup = format!("<root>{}</root>", encode(&document));
    let parsed = roxmltree::Document::parse(&markup).expect("well-formed markup");
    let strongs: Vec<_> = parsed
        .descendants()
        .filter(|node| node.has_tag_name("strong"))
        .collect();
    assert_eq!(strongs.len(), 1);
    assert_eq!(strongs[0].text(), Some("Hello"));
}

#[test]
fn sanitized_encoding_keeps_the_engine_vocabulary() {
    let document = doc(
        "Hello world",
        vec![
            mark(0, 5, MarkKind::Bold),
            mark_with(6, 11, MarkKind::FontColor, "ff0000"),
        ],
    );
    let sanitized = encode_sanitized(&document);
    assert!(sanitized.contains("<strong>Hello</strong>"));
    assert!(sanitized.contains("ff0000"));
}
