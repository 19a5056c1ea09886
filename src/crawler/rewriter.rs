use crate::crawler::{CrawlTask, FilterPolicy, Frontier};
use crate::url::PathMapper;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Element/attribute pairs that carry resource references
const URL_ATTRIBUTES: &[(&str, &str)] = &[
    ("a", "href"),
    ("link", "href"),
    ("script", "src"),
    ("img", "src"),
    ("iframe", "src"),
    ("source", "src"),
    ("video", "src"),
    ("audio", "src"),
    ("embed", "src"),
    ("object", "data"),
];

/// Discovers resource references in downloaded HTML/CSS, enqueues the ones
/// the filter admits, and rewrites each admitted reference to the relative
/// local path of its future copy.
///
/// Rewriting fails open: a reference that is not admitted, or whose relative
/// path cannot be computed, keeps its original value.
pub struct ContentRewriter {
    filter: Arc<FilterPolicy>,
    frontier: Arc<Frontier>,
    mapper: PathMapper,
    css_url: Regex,
}

impl ContentRewriter {
    pub fn new(filter: Arc<FilterPolicy>, frontier: Arc<Frontier>, mapper: PathMapper) -> Self {
        Self {
            filter,
            frontier,
            mapper,
            css_url: Regex::new(r#"(?i)url\(\s*["']?([^"')]+?)["']?\s*\)"#)
                .expect("css url pattern is valid"),
        }
    }

    /// Rewrites resource references in an HTML document.
    ///
    /// Every admitted reference becomes a `CrawlTask` at `depth + 1` with
    /// this page as referrer. Attribute rewrites are applied in document
    /// order; `<style>` bodies and `style=` attributes go through the CSS
    /// logic afterwards.
    pub fn process_html(&self, html: &str, page_url: &Url, depth: u32) -> String {
        let document = Html::parse_document(html);
        let mut output = html.to_string();
        let mut handled: HashSet<(String, String)> = HashSet::new();

        for (tag, attr) in URL_ATTRIBUTES {
            let selector = match Selector::parse(&format!("{}[{}]", tag, attr)) {
                Ok(s) => s,
                Err(_) => continue,
            };

            for element in document.select(&selector) {
                let original = match element.value().attr(attr) {
                    Some(v) => v,
                    None => continue,
                };
                // The same reference may occur repeatedly; one rewrite
                // (and one enqueue) covers every occurrence.
                if !handled.insert((attr.to_string(), original.to_string())) {
                    continue;
                }
                if let Some(rewritten) = self.rewrite_reference(original, page_url, depth) {
                    replace_attribute(&mut output, attr, original, &rewritten);
                }
            }
        }

        // Inline CSS carries url(...) references of its own
        if let Ok(selector) = Selector::parse("style") {
            for element in document.select(&selector) {
                let css: String = element.text().collect();
                if css.trim().is_empty() {
                    continue;
                }
                let rewritten = self.process_css(&css, page_url, depth);
                if rewritten != css {
                    output = output.replace(&css, &rewritten);
                }
            }
        }

        if let Ok(selector) = Selector::parse("[style]") {
            for element in document.select(&selector) {
                let css = match element.value().attr("style") {
                    Some(v) => v,
                    None => continue,
                };
                let rewritten = self.process_css(css, page_url, depth);
                if rewritten != css {
                    replace_attribute(&mut output, "style", css, &rewritten);
                }
            }
        }

        output
    }

    /// Rewrites `url(...)` references in CSS text.
    ///
    /// One algorithm, two entry points: called for inline styles during HTML
    /// processing and for fetched standalone stylesheets. `data:` URIs and
    /// fragment-only references pass through untouched.
    pub fn process_css(&self, css: &str, base_url: &Url, depth: u32) -> String {
        self.css_url
            .replace_all(css, |caps: &regex::Captures<'_>| {
                let reference = caps[1].trim();
                if reference.starts_with("data:") || reference.starts_with('#') {
                    return caps[0].to_string();
                }
                match self.rewrite_reference(reference, base_url, depth) {
                    Some(rel) => format!("url({})", rel),
                    None => caps[0].to_string(),
                }
            })
            .to_string()
    }

    /// Resolves one reference against the page URL, enqueues it when
    /// admitted, and returns the relative link to rewrite to. `None` means
    /// the attribute keeps its original value.
    fn rewrite_reference(&self, reference: &str, page_url: &Url, depth: u32) -> Option<String> {
        let absolute = resolve_reference(reference, page_url)?;

        if !self.filter.admit(&absolute, depth + 1) {
            return None;
        }

        self.frontier.push(CrawlTask {
            url: absolute.clone(),
            depth: depth + 1,
            referrer: Some(page_url.clone()),
        });

        match self.mapper.relative_link(page_url, &absolute) {
            Ok(rel) => Some(rel),
            Err(e) => {
                tracing::debug!("cannot relativize {}: {}", absolute, e);
                None
            }
        }
    }
}

/// Resolves a raw reference to an absolute http(s) URL.
///
/// Returns `None` for references that are never crawlable: empty values,
/// fragment-only anchors, and `data:`/`javascript:`/`mailto:`/`tel:`
/// schemes.
fn resolve_reference(reference: &str, base_url: &Url) -> Option<Url> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    for scheme in ["data:", "javascript:", "mailto:", "tel:"] {
        if reference.starts_with(scheme) {
            return None;
        }
    }

    let absolute = base_url.join(reference).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    Some(absolute)
}

/// Replaces `attr="old"` with `attr="new"` in the raw document text,
/// covering single-quoted and entity-encoded variants.
fn replace_attribute(html: &mut String, attr: &str, old: &str, new: &str) {
    let encoded = old.replace('&', "&amp;");
    let mut variants: Vec<&str> = vec![old];
    if encoded != old {
        variants.push(&encoded);
    }

    for variant in variants {
        for quote in ['"', '\''] {
            let needle = format!("{}={}{}{}", attr, quote, variant, quote);
            if html.contains(&needle) {
                let replacement = format!("{}={}{}{}", attr, quote, new, quote);
                *html = html.replace(&needle, &replacement);
            }
        }
    }
}
