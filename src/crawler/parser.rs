//! HTML link discovery
//!
//! Produces the raw `href` value of every anchor on a page. No resolution or filtering
//! happens here; turning an `href` into a canonical address (or rejecting it) is the job
//! of [`crate::url::resolve`].

use scraper::{Html, Selector};

/// Returns the raw `href` of every `<a href>` element, in document order
///
/// Repeated anchors produce repeated entries.
///
/// # Example
///
/// ```
/// use maxtract::crawler::discover_links;
///
/// let html = r#"<a href="/a">A</a><a name="x">no href</a><a href="/a">again</a>"#;
/// assert_eq!(discover_links(html), vec!["/a", "/a"]);
/// ```
pub fn discover_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_and_absolute_links() {
        let html = r#"
            <html>
            <body>
                <a href="/page1">Link 1</a>
                <a href="page2">Link 2</a>
                <a href="https://other.com/page3">Link 3</a>
            </body>
            </html>
        "#;
        assert_eq!(
            discover_links(html),
            vec!["/page1", "page2", "https://other.com/page3"]
        );
    }

    #[test]
    fn test_hrefs_reported_raw() {
        let html = r##"<a href="mailto:a@b.com">m</a><a href="#top">t</a><a href=" /x ">x</a>"##;
        assert_eq!(discover_links(html), vec!["mailto:a@b.com", "#top", " /x "]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<a name="anchor">no link</a><link rel="canonical" href="/c">"#;
        assert!(discover_links(html).is_empty());
    }

    #[test]
    fn test_malformed_html() {
        let html = r#"<div><a href="/ok">ok<p><a href="/also">also"#;
        assert_eq!(discover_links(html), vec!["/ok", "/also"]);
    }
}
