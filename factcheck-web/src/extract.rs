use regex::Regex;
use std::sync::LazyLock;

static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script pattern compiles")
});
static STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("style pattern compiles")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern compiles"));
static SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// Flatten an HTML document to its visible text.
///
/// Script and style blocks are dropped with their contents; every other tag
/// becomes a single space. Entities are left as they are.
///
/// ```
/// use factcheck_web::extract::clean_html;
///
/// let html = "<html><head><style>p{}</style></head><body><p>Hello</p><script>x()</script><p>world</p></body></html>";
/// assert_eq!(clean_html(html), "Hello world");
/// ```
pub fn clean_html(html: &str) -> String {
    let text = SCRIPT.replace_all(html, "");
    let text = STYLE.replace_all(&text, "");
    let text = TAG.replace_all(&text, " ");
    SPACE.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_multiline_scripts_with_attributes() {
        let html = r#"<p>before</p>
<SCRIPT type="text/javascript">
  if (a < b) { document.write("<b>hi</b>"); }
</SCRIPT>
<p>after</p>"#;
        assert_eq!(clean_html(html), "before after");
    }

    #[test]
    fn keeps_text_between_adjacent_tags_apart() {
        assert_eq!(clean_html("<td>one</td><td>two</td>"), "one two");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(clean_html("  \n\t<h1> Title </h1>\n\n  body \t text  "), "Title body text");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(clean_html("just text"), "just text");
        assert_eq!(clean_html(""), "");
    }
}
