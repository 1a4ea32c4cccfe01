//! HTML rendering of formatted message text.
//!
//! Two modes exist. The generic mode emits only widely supported markup
//! (`<b>`, `<i>`, `<a href>`, ...). The extended mode additionally emits the
//! protocol's own tags: `<tg-spoiler>`, `<tg-emoji>` and `tg://user` mention
//! links. In generic mode those entities render as escaped plain text.

use crate::entity::{EntityKind, MessageEntity};

/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders `text` with `entities` translated into markup.
///
/// Entity ranges are clamped to the text; empty ranges and entities with no
/// markup in the chosen mode are ignored. With no entities this is exactly
/// [`escape_html`]. Partly overlapping entities stay well-nested: an inner
/// tag that outlives its parent is closed with it and reopened after.
pub fn render_html(text: &str, entities: &[MessageEntity], allow_extended: bool) -> String {
    if entities.is_empty() {
        return escape_html(text);
    }

    let units: Vec<u16> = text.encode_utf16().collect();
    let slice = |start: usize, end: usize| String::from_utf16_lossy(&units[start..end]);

    let mut spans: Vec<Span> = entities
        .iter()
        .map(|e| (e.offset.min(units.len()), e.end().min(units.len()), e))
        .filter(|(start, end, _)| start < end)
        .filter_map(|(start, end, entity)| {
            let (open, close) = tags(&entity.kind, &slice(start, end), allow_extended)?;
            Some(Span {
                start,
                end,
                open,
                close,
            })
        })
        .collect();
    // Outer entities first: earlier start, then longer span.
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut boundaries: Vec<usize> = spans.iter().flat_map(|s| [s.start, s.end]).collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut html = String::with_capacity(text.len() + spans.len() * 16);
    let mut stack: Vec<usize> = Vec::new();
    let mut next = 0;
    let mut cursor = 0;
    for pos in boundaries {
        if pos > cursor {
            html.push_str(&escape_html(&slice(cursor, pos)));
            cursor = pos;
        }

        // Unwind down to the deepest span ending here, then reopen survivors.
        if stack.iter().any(|&i| spans[i].end == pos) {
            let mut reopen = Vec::new();
            while let Some(i) = stack.pop() {
                html.push_str(&spans[i].close);
                if spans[i].end != pos {
                    reopen.push(i);
                }
                if !stack.iter().any(|&j| spans[j].end == pos) {
                    break;
                }
            }
            for i in reopen.into_iter().rev() {
                html.push_str(&spans[i].open);
                stack.push(i);
            }
        }

        while next < spans.len() && spans[next].start == pos {
            html.push_str(&spans[next].open);
            stack.push(next);
            next += 1;
        }
    }
    html.push_str(&escape_html(&slice(cursor, units.len())));
    html
}

struct Span {
    start: usize,
    end: usize,
    open: String,
    close: String,
}

/// Opening and closing tag for one entity, or `None` for plain text.
fn tags(kind: &EntityKind, covered: &str, allow_extended: bool) -> Option<(String, String)> {
    let simple = |name: &str| Some((format!("<{name}>"), format!("</{name}>")));
    let link = |href: String| {
        Some((
            format!("<a href=\"{}\">", escape_html(&href)),
            "</a>".to_owned(),
        ))
    };

    match kind {
        EntityKind::Bold => simple("b"),
        EntityKind::Italic => simple("i"),
        EntityKind::Underline => simple("u"),
        EntityKind::Strike => simple("s"),
        EntityKind::Code => simple("code"),
        EntityKind::Blockquote => simple("blockquote"),
        EntityKind::Pre { language } if language.is_empty() => simple("pre"),
        EntityKind::Pre { language } => Some((
            format!("<pre language=\"{}\">", escape_html(language)),
            "</pre>".to_owned(),
        )),
        EntityKind::Url => link(covered.to_owned()),
        EntityKind::TextUrl { url } => link(url.clone()),
        EntityKind::Email => link(format!("mailto:{covered}")),
        EntityKind::Phone => link(format!("tel:{covered}")),
        EntityKind::Spoiler if allow_extended => simple("tg-spoiler"),
        EntityKind::CustomEmoji { document_id } if allow_extended => Some((
            format!("<tg-emoji emoji-id=\"{document_id}\">"),
            "</tg-emoji>".to_owned(),
        )),
        EntityKind::MentionName { user_id } if allow_extended => {
            link(format!("tg://user?id={user_id}"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(kind: EntityKind, offset: usize, length: usize) -> MessageEntity {
        MessageEntity::new(kind, offset, length)
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_keeps_non_ascii() {
        assert_eq!(escape_html("café <ok>"), "café &lt;ok&gt;");
        assert_eq!(render_html("café", &[], true), "café");
    }

    #[test]
    fn test_no_entities_is_escape() {
        let text = "1 < 2 && 3 > 2";
        assert_eq!(render_html(text, &[], false), escape_html(text));
        assert_eq!(render_html(text, &[], true), escape_html(text));
    }

    #[test]
    fn test_simple_tags() {
        let html = render_html(
            "bold and code",
            &[e(EntityKind::Bold, 0, 4), e(EntityKind::Code, 9, 4)],
            false,
        );
        assert_eq!(html, "<b>bold</b> and <code>code</code>");
    }

    #[test]
    fn test_nested_tags_close_in_order() {
        let html = render_html(
            "abc",
            &[e(EntityKind::Italic, 0, 2), e(EntityKind::Bold, 0, 3)],
            false,
        );
        assert_eq!(html, "<b><i>ab</i>c</b>");
    }

    #[test]
    fn test_adjacent_tags() {
        let html = render_html(
            "ab",
            &[e(EntityKind::Bold, 0, 1), e(EntityKind::Italic, 1, 1)],
            false,
        );
        assert_eq!(html, "<b>a</b><i>b</i>");
    }

    #[test]
    fn test_text_is_escaped_inside_tags() {
        let html = render_html("<x>", &[e(EntityKind::Bold, 0, 3)], false);
        assert_eq!(html, "<b>&lt;x&gt;</b>");
    }

    #[test]
    fn test_links() {
        let text = "site a@b.c +123";
        let url = EntityKind::TextUrl {
            url: "https://x.y/?a=1&b=2".into(),
        };
        let html = render_html(
            text,
            &[
                e(url, 0, 4),
                e(EntityKind::Email, 5, 5),
                e(EntityKind::Phone, 11, 4),
            ],
            false,
        );
        assert_eq!(
            html,
            "<a href=\"https://x.y/?a=1&amp;b=2\">site</a> \
             <a href=\"mailto:a@b.c\">a@b.c</a> \
             <a href=\"tel:+123\">+123</a>"
        );
    }

    #[test]
    fn test_pre_language() {
        let pre = EntityKind::Pre {
            language: "rust".into(),
        };
        let html = render_html("fn x()", &[e(pre, 0, 6)], false);
        assert_eq!(html, "<pre language=\"rust\">fn x()</pre>");
    }

    #[test]
    fn test_extended_tags_toggle() {
        let text = "secret hi Bob";
        let entities = vec![
            e(EntityKind::Spoiler, 0, 6),
            e(EntityKind::CustomEmoji { document_id: 99 }, 7, 2),
            e(EntityKind::MentionName { user_id: 5 }, 10, 3),
        ];
        assert_eq!(render_html(text, &entities, false), "secret hi Bob");
        assert_eq!(
            render_html(text, &entities, true),
            "<tg-spoiler>secret</tg-spoiler> \
             <tg-emoji emoji-id=\"99\">hi</tg-emoji> \
             <a href=\"tg://user?id=5\">Bob</a>"
        );
    }

    #[test]
    fn test_partial_overlap_stays_nested() {
        let html = render_html(
            "abcde",
            &[e(EntityKind::Bold, 0, 3), e(EntityKind::Italic, 2, 3)],
            false,
        );
        assert_eq!(html, "<b>ab<i>c</i></b><i>de</i>");
    }

    #[test]
    fn test_overlap_reopens_every_survivor() {
        let html = render_html(
            "abcdef",
            &[
                e(EntityKind::Bold, 0, 3),
                e(EntityKind::Italic, 1, 4),
                e(EntityKind::Underline, 2, 4),
            ],
            false,
        );
        assert_eq!(html, "<b>a<i>b<u>c</u></i></b><i><u>de</u></i><u>f</u>");
    }

    #[test]
    fn test_utf16_offsets() {
        let html = render_html("😀 hey", &[e(EntityKind::Bold, 3, 3)], false);
        assert_eq!(html, "😀 <b>hey</b>");
    }

    #[test]
    fn test_out_of_range_entities_clamp() {
        let html = render_html(
            "abc",
            &[e(EntityKind::Bold, 1, 50), e(EntityKind::Italic, 10, 2)],
            false,
        );
        assert_eq!(html, "a<b>bc</b>");
    }

    #[test]
    fn test_unknown_and_plain_entities() {
        let unknown = EntityKind::Unknown { tag: "x".into() };
        let html = render_html(
            "#tag",
            &[e(EntityKind::Hashtag, 0, 4), e(unknown, 0, 4)],
            true,
        );
        assert_eq!(html, "#tag");
    }
}
