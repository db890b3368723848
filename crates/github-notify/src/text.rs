//! Text helpers shared by both renderers.
//!
//! All lengths are counted in characters, never bytes, so multi-byte input is
//! never split.

use std::sync::LazyLock;

use regex::Regex;

pub const ELLIPSIS: char = '…';
pub const ZERO_WIDTH_JOINER: char = '\u{200d}';

pub const DEFAULT_MESSAGE_LIMIT: usize = 100;
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 250;

/// Line breaks kept in a description; later ones become spaces.
const MAX_DESCRIPTION_NEWLINES: usize = 6;

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"));
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("valid tag pattern"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").expect("valid blank line pattern"));
static IRC_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x03(?:[0-9]{1,2}(?:,[0-9]{1,2})?)?").expect("valid colour code pattern")
});

/// First line of `text`, cut to `limit` characters.
///
/// Whenever anything was dropped the result ends in exactly one `…`; a
/// literal `...` at the cut is folded into it. A string that already ends
/// in `…` and is at most `limit` characters before it is left alone, which
/// makes the function idempotent.
pub fn short_message(text: &str, limit: usize) -> String {
    let text = text.trim();
    let first_line = text.split('\n').next().unwrap_or_default().trim_end();

    if fits(first_line, limit) {
        if first_line.len() == text.len() {
            return text.to_string();
        }
        return with_ellipsis(first_line);
    }

    with_ellipsis(take_chars(first_line, limit))
}

/// Body text for embeds: markup stripped, blank lines collapsed, at most a
/// handful of line breaks, truncated like [`short_message`].
pub fn short_description(text: &str, limit: usize) -> String {
    let text = text.replace("\r\n", "\n");
    let text = HTML_COMMENT.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    let text = BLANK_LINES.replace_all(text.trim(), "\n\n");

    let mut newlines = 0;
    let capped: String = text
        .chars()
        .map(|c| {
            if c != '\n' {
                return c;
            }
            newlines += 1;
            if newlines > MAX_DESCRIPTION_NEWLINES { ' ' } else { c }
        })
        .collect();

    if capped.chars().count() <= limit {
        return capped;
    }
    with_ellipsis(take_chars(&capped, limit))
}

/// Backslash-escapes characters Discord markdown treats as structure.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '*' | '|' | '`' | '[' | ']' | '(' | ')' | '<' | '>' | '_' | '~'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Inline code span. Backticks inside would end the span early, so they are
/// swapped for a look-alike.
pub fn code_span(text: &str) -> String {
    format!("`{}`", text.replace('`', "\u{02cb}"))
}

/// Drops IRC formatting codes (colour codes with their digits) and other
/// control characters. Line breaks and tabs become spaces so one
/// notification stays on one line.
pub fn escape_irc(text: &str) -> String {
    IRC_COLOR
        .replace_all(text, "")
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Puts a zero-width joiner after the first character so IRC clients do not
/// highlight the person or word being mentioned.
pub fn insert_zwj(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{first}{ZERO_WIDTH_JOINER}{}", chars.as_str()),
        None => String::new(),
    }
}

pub fn pluralize(count: usize, singular: &str) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        format!("{singular}s")
    }
}

fn fits(text: &str, limit: usize) -> bool {
    let count = text.chars().count();
    count <= limit
        || (count == limit + 1 && text.ends_with(ELLIPSIS) && !text.ends_with("……"))
}

fn take_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn with_ellipsis(text: &str) -> String {
    let mut tail = text;
    loop {
        let next = tail
            .trim_end()
            .trim_end_matches(ELLIPSIS)
            .trim_end_matches("...");
        if next.len() == tail.len() {
            break;
        }
        tail = next;
    }
    format!("{tail}{ELLIPSIS}")
}
