use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Everything the crawler keeps from one fetched page. Immutable once
/// extracted; handed off by value to the summarizer and index builder.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub url: Url,
    pub title: String,
    pub body_text: String,
    pub links: Vec<Url>,
}

/// Parse fetched HTML into a `PageRecord`. Best-effort and infallible:
/// malformed markup degrades to partial fields, never an error, so every
/// 200-status HTML response produces a record.
pub fn extract(html: &str, base_url: &Url) -> PageRecord {
    let document = Html::parse_document(html);

    let title_sel = Selector::parse("title").expect("valid selector");
    let title = document
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let body_sel = Selector::parse("body").expect("valid selector");
    let body_text = match document.select(&body_sel).next() {
        Some(body) => visible_text(body),
        // no <body> at all: fall back to whatever text the fragment holds
        None => visible_text(document.root_element()),
    };

    let link_sel = Selector::parse("a[href]").expect("valid selector");
    let mut links = Vec::new();
    for el in document.select(&link_sel) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if let Some(link) = resolve_link(href, base_url) {
            links.push(link);
        }
    }

    PageRecord {
        url: base_url.clone(),
        title,
        body_text,
        links,
    }
}

/// Concatenated text nodes under `root`, skipping script/style subtrees,
/// with runs of whitespace collapsed to single spaces.
fn visible_text(root: ElementRef) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript" | "template"))
        });
        if hidden {
            continue;
        }
        out.push_str(text);
        out.push(' ');
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve an href against the page URL, keeping only crawlable http(s)
/// targets. Fragments are dropped so links dedup cleanly.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let mut resolved = base_url.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}
