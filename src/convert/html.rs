//! Post-processing of converter html.

use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::slides::RenderFormat;
use crate::core::LinkKind;

/// Click handler the viewer page defines for local file links.
const LOCAL_LINK_HANDLER: &str = "return localLinkClickEvent(this);";

/// Point relative `href`/`src` targets at the document's directory.
///
/// The viewer page is served from elsewhere, so `img.png` in
/// `/notes/a.md` has to become `file:///notes/img.png` and carry the
/// viewer's click handler. External, fragment, absolute and empty
/// targets are left as they are.
pub fn rewrite_links<'a>(html: &'a str, cwd: &Path) -> Cow<'a, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(\s(?:href|src))=(?:"([^"]*)"|'([^']*)')"#).expect("valid link pattern")
    });

    let dir = cwd.to_string_lossy();
    let dir = dir.trim_end_matches('/');

    re.replace_all(html, |caps: &Captures| {
        let attr = &caps[1];
        let target = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str());

        match LinkKind::parse(target) {
            LinkKind::FileRelative(path) if !path.is_empty() => {
                format!(r#"{attr}="file://{dir}/{path}" onclick="{LOCAL_LINK_HANDLER}""#)
            }
            _ => caps[0].to_string(),
        }
    })
}

/// Strip the anonymous `<section>` wrapper the slide writer puts around
/// a slide without a heading.
pub fn unwrap_section(html: &str) -> &str {
    html.strip_prefix("<section>\n")
        .and_then(|inner| inner.trim_end().strip_suffix("</section>"))
        .map_or(html, |inner| inner.trim_end_matches('\n'))
}

/// Cut the title block out of a standalone page.
pub fn extract_title(page: &str, format: RenderFormat) -> Option<&str> {
    let (open, close) = match format {
        RenderFormat::Html => (r#"<header id="title-block-header">"#, "</header>"),
        RenderFormat::Slides { .. } => (r#"<section id="title-slide""#, "</section>"),
    };

    let start = page.find(open)?;
    let end = start + page[start..].find(close)? + close.len();
    Some(&page[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_relative() {
        let html = r#"<img src="img/a.png" alt="x" />"#;
        assert_eq!(
            rewrite_links(html, Path::new("/notes")),
            r#"<img src="file:///notes/img/a.png" onclick="return localLinkClickEvent(this);" alt="x" />"#
        );
    }

    #[test]
    fn test_rewrite_single_quotes_and_parent() {
        let html = "<a href='../b.md'>b</a>";
        assert_eq!(
            rewrite_links(html, Path::new("/notes/")),
            r#"<a href="file:///notes/../b.md" onclick="return localLinkClickEvent(this);">b</a>"#
        );
    }

    #[test]
    fn test_rewrite_leaves_other_links() {
        let html = concat!(
            r#"<a href="https://x.org">x</a>"#,
            r##"<a href="#sec">s</a>"##,
            r#"<a href="/abs/c.md">c</a>"#,
            r#"<a href="">e</a>"#,
            r#"<img data-src="d.png">"#,
        );
        assert_eq!(rewrite_links(html, Path::new("/notes")), html);
    }

    #[test]
    fn test_rewrite_each_attribute_separately() {
        let html = r#"<a href="a.md">a</a> and <a href="https://b">b</a>"#;
        let out = rewrite_links(html, Path::new("/n"));
        assert!(out.contains(r#"href="file:///n/a.md""#));
        assert!(out.contains(r#"href="https://b">b</a>"#));
    }

    #[test]
    fn test_unwrap_section() {
        assert_eq!(unwrap_section("<section>\n<p>x</p>\n</section>\n"), "<p>x</p>");
        let titled = "<section id=\"a\" class=\"slide level1\">\n<h1>A</h1>\n</section>";
        assert_eq!(unwrap_section(titled), titled);
    }

    #[test]
    fn test_extract_html_title() {
        let page = "<body>\n<header id=\"title-block-header\">\n<h1 class=\"title\">T</h1>\n</header>\n<p>x</p>";
        assert_eq!(
            extract_title(page, RenderFormat::Html),
            Some("<header id=\"title-block-header\">\n<h1 class=\"title\">T</h1>\n</header>")
        );
    }

    #[test]
    fn test_extract_slides_title() {
        let page = "<div class=\"slides\">\n<section id=\"title-slide\">\n<h1>T</h1>\n</section>\n</div>";
        assert_eq!(
            extract_title(page, RenderFormat::Slides { level: 2 }),
            Some("<section id=\"title-slide\">\n<h1>T</h1>\n</section>")
        );
    }

    #[test]
    fn test_extract_missing_title() {
        assert_eq!(extract_title("<body></body>", RenderFormat::Html), None);
    }
}
