use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

/// File extensions that are still crawled as pages.
const PAGE_EXTENSIONS: &[&str] = &["html", "htm"];

/// Collects anchor targets that stay under `root`, in document order and without duplicates.
///
/// Relative references are resolved against `page_url`. Fragments and queries
/// are dropped, and targets that look like static assets are skipped.
pub fn discover_links(document: &Html, page_url: &Url, root: &Url) -> Vec<String> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&anchors) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_route(href, page_url, root) else {
            continue;
        };
        let url = url.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }
    links
}

fn resolve_route(reference: &str, page_url: &Url, root: &Url) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return None;
    }

    let mut url = page_url.join(trimmed).ok()?;
    if url.origin() != root.origin() {
        return None;
    }
    url.set_fragment(None);
    url.set_query(None);
    if looks_like_asset(&url) {
        return None;
    }
    Some(url)
}

fn looks_like_asset(url: &Url) -> bool {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    match last.rsplit_once('.') {
        Some((_, ext)) => !PAGE_EXTENSIONS.iter().any(|p| p.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
