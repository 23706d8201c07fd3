use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::metadata::LiveMetadata;

/// What could be recovered from a saved copy of the live reference page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencePage {
    pub html_class: Option<String>,
    pub body_class: Option<String>,
    pub stylesheet_urls: Vec<String>,
}

impl ReferencePage {
    /// Scan reference markup for the first `<html>` and `<body>` class lists
    /// and every `rel="stylesheet"` link, in document order. Commented-out
    /// markup is ignored.
    ///
    /// Relative hrefs are resolved against `base_url` when given. Duplicate
    /// URLs keep their first position.
    pub fn extract(markup: &str, base_url: Option<&Url>) -> Self {
        let mut page = ReferencePage::default();

        static COMMENT: OnceLock<Regex> = OnceLock::new();
        static HTML_TAG: OnceLock<Regex> = OnceLock::new();
        static BODY_TAG: OnceLock<Regex> = OnceLock::new();
        static LINK_TAG: OnceLock<Regex> = OnceLock::new();
        static ATTR_CLASS: OnceLock<Regex> = OnceLock::new();
        static ATTR_REL: OnceLock<Regex> = OnceLock::new();
        static ATTR_HREF: OnceLock<Regex> = OnceLock::new();

        // A tag cut off by the end of the input still counts.
        let comment = COMMENT.get_or_init(|| regex("(?s)<!--.*?(?:-->|$)", "comment"));
        let html_tag = HTML_TAG.get_or_init(|| regex("(?is)<html\\b[^>]*(?:>|$)", "html tag"));
        let body_tag = BODY_TAG.get_or_init(|| regex("(?is)<body\\b[^>]*(?:>|$)", "body tag"));
        let link_tag = LINK_TAG.get_or_init(|| regex("(?is)<link\\b[^>]*(?:>|$)", "link tag"));
        let attr_class = ATTR_CLASS.get_or_init(|| {
            regex(
                "(?is)(?:^|\\s)class\\s*=\\s*(?:\"([^\"]*)\"|'([^']*)'|([^\\s>]+))",
                "class attr",
            )
        });
        let attr_rel = ATTR_REL.get_or_init(|| {
            regex(
                "(?is)(?:^|\\s)rel\\s*=\\s*(?:\"([^\"]*)\"|'([^']*)'|([^\\s>]+))",
                "rel attr",
            )
        });
        let attr_href = ATTR_HREF.get_or_init(|| {
            regex(
                "(?is)(?:^|\\s)href\\s*=\\s*(?:\"([^\"]*)\"|'([^']*)'|([^\\s>]+))",
                "href attr",
            )
        });

        let markup = comment.replace_all(markup, "");

        let class_of = |tag: &Regex| -> Option<String> {
            let tag = tag.find(&markup)?;
            let caps = attr_class.captures(tag.as_str())?;
            capture_first(&caps, &[1, 2, 3])
                .filter(|value| !value.is_empty())
                .map(|value| decode_entities(value).trim().to_string())
        };
        page.html_class = class_of(html_tag);
        page.body_class = class_of(body_tag);

        for tag in link_tag.find_iter(&markup) {
            let tag = tag.as_str();
            let is_stylesheet = attr_rel
                .captures(tag)
                .and_then(|caps| capture_first(&caps, &[1, 2, 3]))
                .is_some_and(|rel| rel.trim().eq_ignore_ascii_case("stylesheet"));
            if !is_stylesheet {
                continue;
            }
            let Some(href) = attr_href
                .captures(tag)
                .and_then(|caps| capture_first(&caps, &[1, 2, 3]))
                .filter(|href| !href.is_empty())
            else {
                continue;
            };
            let href = decode_entities(href);
            let resolved = match base_url {
                Some(base) => base
                    .join(&href)
                    .map(|u| u.to_string())
                    .unwrap_or(href),
                None => href,
            };
            if !page.stylesheet_urls.contains(&resolved) {
                page.stylesheet_urls.push(resolved);
            }
        }

        log::debug!(
            "reference page: html class {:?}, body class {:?}, {} stylesheet(s)",
            page.html_class,
            page.body_class,
            page.stylesheet_urls.len()
        );
        page
    }

    /// Fill whatever the page did not provide from `fallback`.
    pub fn into_metadata(self, fallback: &LiveMetadata) -> LiveMetadata {
        LiveMetadata {
            html_class: self
                .html_class
                .unwrap_or_else(|| fallback.html_class.clone()),
            body_class: self
                .body_class
                .unwrap_or_else(|| fallback.body_class.clone()),
            stylesheet_urls: if self.stylesheet_urls.is_empty() {
                fallback.stylesheet_urls.clone()
            } else {
                self.stylesheet_urls
            },
        }
    }
}

fn regex(pattern: &'static str, desc: &'static str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid {desc} regex: {err}"))
}

fn capture_first<'t>(caps: &regex::Captures<'t>, groups: &[usize]) -> Option<&'t str> {
    groups
        .iter()
        .find_map(|idx| caps.get(*idx).map(|m| m.as_str()))
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
