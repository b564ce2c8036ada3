//! Conversion of lightweight markdown content into Telegram HTML.
//!
//! Catalog descriptions and locale strings are authored in a small markdown
//! subset. Telegram messages are sent with `parse_mode: HTML`, so the markup
//! is rewritten before sending.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"#+ ").unwrap());
static BOLD_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*\*(.*?)\*\*\*").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());

/// Rewrite markdown markers into Telegram HTML tags.
///
/// Header markers are stripped, `***`/`**`/`*` nest into `<b><i>`/`<b>`/`<i>`,
/// backticks become `<code>`, and `[text](url)` becomes an anchor. Rewrites
/// never span line boundaries.
pub fn to_telegram_html(text: &str) -> String {
    let text = HEADER.replace_all(text, "");
    let text = BOLD_ITALIC.replace_all(&text, "<b><i>$1</i></b>");
    let text = BOLD.replace_all(&text, "<b>$1</b>");
    let text = ITALIC.replace_all(&text, "<i>$1</i>");
    let text = CODE.replace_all(&text, "<code>$1</code>");
    let text = LINK.replace_all(&text, r#"<a href="$2">$1</a>"#);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_headers() {
        assert_eq!(to_telegram_html("## Title"), "Title");
        assert_eq!(to_telegram_html("# A\n### B"), "A\nB");
    }

    #[test]
    fn converts_emphasis() {
        assert_eq!(to_telegram_html("***x***"), "<b><i>x</i></b>");
        assert_eq!(to_telegram_html("**x**"), "<b>x</b>");
        assert_eq!(to_telegram_html("*x*"), "<i>x</i>");
    }

    #[test]
    fn converts_code_and_links() {
        assert_eq!(to_telegram_html("`let x`"), "<code>let x</code>");
        assert_eq!(
            to_telegram_html("[docs](https://example.com)"),
            r#"<a href="https://example.com">docs</a>"#
        );
    }

    #[test]
    fn emphasis_does_not_span_lines() {
        assert_eq!(to_telegram_html("**a\nb**"), "**a\nb**");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(to_telegram_html(""), "");
    }

    #[test]
    fn mixed_markup() {
        assert_eq!(
            to_telegram_html("## Hi **there**, see `code` and [x](u)"),
            r#"Hi <b>there</b>, see <code>code</code> and <a href="u">x</a>"#
        );
    }
}
