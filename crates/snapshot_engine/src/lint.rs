use std::collections::HashMap;

use scraper::{Html, Selector};

/// Advisory markup checks attached to each crawled page.
///
/// Each warning appears at most once per distinct problem, in a stable order:
/// title, images, then duplicate ids in document order.
pub fn lint_document(document: &Html) -> Vec<String> {
    let mut warnings = Vec::new();

    let has_title = select(document, "title")
        .into_iter()
        .any(|text| !text.trim().is_empty());
    if !has_title {
        warnings.push("missing <title>".to_string());
    }

    if let Ok(selector) = Selector::parse("img:not([alt])") {
        if document.select(&selector).next().is_some() {
            warnings.push("missing alt text".to_string());
        }
    }

    if let Ok(selector) = Selector::parse("[id]") {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for element in document.select(&selector) {
            let Some(id) = element.value().id() else {
                continue;
            };
            let count = counts.entry(id).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(id);
            }
        }
        warnings.extend(order.into_iter().map(|id| format!("duplicate id \"{id}\"")));
    }

    warnings
}

fn select(document: &Html, css: &str) -> Vec<String> {
    match Selector::parse(css) {
        Ok(selector) => document
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::lint_document;

    #[test]
    fn clean_page_has_no_warnings() {
        let html = r#"<html><head><title>Home</title></head>
            <body><img src="a.png" alt="A"><div id="app"></div></body></html>"#;
        assert!(lint_document(&Html::parse_document(html)).is_empty());
    }

    #[test]
    fn problems_are_reported_once_each() {
        let html = r#"<html><head><title> </title></head><body>
            <img src="a.png"><img src="b.png">
            <p id="x"></p><p id="y"></p><p id="x"></p><p id="x"></p><p id="y"></p>
        </body></html>"#;
        assert_eq!(
            lint_document(&Html::parse_document(html)),
            vec![
                "missing <title>".to_string(),
                "missing alt text".to_string(),
                "duplicate id \"x\"".to_string(),
                "duplicate id \"y\"".to_string(),
            ]
        );
    }
}
