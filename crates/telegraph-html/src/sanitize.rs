//! Tag and attribute filtering
//!
//! The input is parsed leniently as an HTML fragment, so malformed markup
//! never fails; it is repaired the way a browser would repair it. The output
//! is built fresh by recursive descent: an allowed element is re-emitted with
//! only its allowed attributes, a disallowed element is replaced by its
//! sanitized children.
//!
//! Unwrapping can leave allowed elements nested in ways the parser repairs on
//! the next read (`<p>` in `<p>`, a heading in a heading, `<a>` in `<a>`), so
//! the output is fed back through the filter until it stops changing. Running
//! `sanitize` on its own output changes nothing.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Tags Telegraph renders.
pub const ALLOWED_TAGS: &[&str] = &[
    "a",
    "aside",
    "b",
    "blockquote",
    "br",
    "code",
    "em",
    "figcaption",
    "figure",
    "h3",
    "h4",
    "hr",
    "i",
    "iframe",
    "img",
    "li",
    "ol",
    "p",
    "pre",
    "s",
    "strong",
    "u",
    "ul",
    "video",
];

/// Attributes kept on surviving tags.
pub const ALLOWED_ATTRS: &[&str] = &["href", "src"];

/// Elements whose content is code or fallback, not article text.
const DROPPED_WITH_CONTENT: &[&str] = &["script", "style", "template", "noscript"];

/// Allowed elements written without an end tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img"];

/// Allowed elements whose children are discarded (raw-text fallback content).
const EMPTY_TAGS: &[&str] = &["iframe"];

/// Upper bound on filter passes; repaired nesting settles after one re-read.
const MAX_PASSES: usize = 4;

/// Filter `markup` down to the Telegraph tag and attribute sets.
pub fn sanitize(markup: &str) -> String {
    let mut out = filter(markup);
    for _ in 1..MAX_PASSES {
        let next = filter(&out);
        if next == out {
            break;
        }
        out = next;
    }
    out
}

fn filter(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut out = String::with_capacity(markup.len());
    write_children(fragment.root_element(), &mut out);
    out
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => escape_text(text, out),
            Node::Element(data) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = data.name();

                if DROPPED_WITH_CONTENT.contains(&name) {
                    continue;
                }
                if !ALLOWED_TAGS.contains(&name) {
                    // Unwrap: children land in the parent, in order.
                    write_children(child_element, out);
                    continue;
                }

                out.push('<');
                out.push_str(name);
                for (attr, value) in data.attrs() {
                    if ALLOWED_ATTRS.contains(&attr) {
                        out.push(' ');
                        out.push_str(attr);
                        out.push_str("=\"");
                        escape_attr(value, out);
                        out.push('"');
                    }
                }
                out.push('>');

                if VOID_TAGS.contains(&name) {
                    continue;
                }
                if !EMPTY_TAGS.contains(&name) {
                    let start = out.len();
                    write_children(child_element, out);
                    // The parser eats one newline right after `<pre>`.
                    if name == "pre" && out[start..].starts_with('\n') {
                        out.insert(start, '\n');
                    }
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            // Comments, doctypes, processing instructions
            _ => {}
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

pub(crate) fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_and_event_handlers() {
        let out = sanitize(r#"<div><script>x</script><b onclick="y">ok</b></div>"#);
        assert_eq!(out, "<b>ok</b>");
    }

    #[test]
    fn output_is_a_fixed_point() {
        let inputs = [
            r#"<div><script>x</script><b onclick="y">ok</b></div>"#,
            r#"<p class="lead">a &amp; b &lt; c</p><img src="/x.png" alt="x">"#,
            "<table><tr><td>cell</td></tr></table><ul><li>one<li>two</ul>",
            r#"<iframe src="https://youtube.com/embed/1">fallback <b>text</b></iframe>"#,
            "<p>unclosed <em>emphasis<p>next",
            "<h3><span><h4>x</h4></span></h3>",
            "<pre>\n\nx</pre>",
            "<pre><span>\nx</span></pre>",
            "<p><button><p>x</p></button></p>",
            r#"<a href="1">1<table><tr><td><a href="2">2</a></td></tr></table></a>"#,
        ];
        for input in inputs {
            let once = sanitize(input);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "not idempotent for input {input:?}");
        }
    }

    #[test]
    fn pre_keeps_leading_newline() {
        assert_eq!(sanitize("<pre>\n\nx</pre>"), "<pre>\n\nx</pre>");
        assert_eq!(sanitize("<pre>\nx</pre>"), "<pre>x</pre>");
    }

    #[test]
    fn unwrapped_heading_nesting_settles() {
        assert_eq!(sanitize("<h3><span><h4>x</h4></span></h3>"), "<h3></h3><h4>x</h4>");
    }

    #[test]
    fn nested_disallowed_tags_unwrap_in_order() {
        assert_eq!(sanitize("<span><div><b>A</b></div>B</span>"), "<b>A</b>B");
    }

    #[test]
    fn deeply_nested_unwrap_does_not_duplicate() {
        let out =
            sanitize("<section><article><div><span>one</span></div>two</article>three</section>");
        assert_eq!(out, "onetwothree");
    }

    #[test]
    fn keeps_only_href_and_src() {
        let out = sanitize(
            r#"<a href="https://example.com" target="_blank" rel="nofollow">link</a><img src="a.png" width="10">"#,
        );
        assert_eq!(out, r#"<a href="https://example.com">link</a><img src="a.png">"#);
    }

    #[test]
    fn allowed_tags_survive_intact() {
        let input =
            "<blockquote><p>quote</p></blockquote><h3>Title</h3><pre><code>let x = 1;</code></pre><hr>";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn escapes_text_and_attribute_values() {
        let out =
            sanitize(r#"<a href="/q?a=1&amp;b=&quot;2&quot;">1 &lt; 2 &amp;&amp; 3 &gt; 2</a>"#);
        assert_eq!(
            out,
            r#"<a href="/q?a=1&amp;b=&quot;2&quot;">1 &lt; 2 &amp;&amp; 3 &gt; 2</a>"#
        );
    }

    #[test]
    fn drops_comments_and_styles() {
        let out = sanitize("<!-- tracking --><style>p{}</style><p>text</p>");
        assert_eq!(out, "<p>text</p>");
    }

    #[test]
    fn iframe_keeps_src_but_not_fallback_content() {
        let out = sanitize(
            r#"<iframe src="https://example.com/embed" allowfullscreen>fallback</iframe>"#,
        );
        assert_eq!(out, r#"<iframe src="https://example.com/embed"></iframe>"#);
    }

    #[test]
    fn malformed_markup_is_repaired_not_rejected() {
        let out = sanitize("<b>bold <i>both</b> italic?");
        assert!(out.starts_with("<b>bold <i>both</i></b>"), "got: {out}");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize("just words"), "just words");
        assert_eq!(sanitize(""), "");
    }
}
