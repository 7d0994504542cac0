use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched, with the depth it was discovered at.
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// Dedup key for a URL: scheme + host (+ non-default port) + canonical path.
/// Fragments and query strings are dropped, duplicate slashes collapsed,
/// trailing slashes stripped (except the root path). The url crate already
/// lowercases hosts and elides default ports at parse time.
pub fn normalize_url(url: &Url) -> String {
    let mut key = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        key.push(':');
        key.push_str(&port.to_string());
    }
    key.push_str(&canonical_path(url.path()));
    key
}

fn canonical_path(path: &str) -> String {
    let mut out = String::from("/");
    for seg in path.split('/').filter(|s| !s.is_empty()) {
        if out.len() > 1 {
            out.push('/');
        }
        out.push_str(seg);
    }
    out
}

/// The host/path-prefix boundary the crawl must stay inside, derived from
/// the seed URL. A seed of `https://host/docs/index.html` scopes the crawl
/// to `https://host/docs/...`.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    host: String,
    port: Option<u16>,
    path_prefix: String,
}

impl CrawlScope {
    pub fn from_seed(seed: &Url) -> Self {
        let path = canonical_path(seed.path());
        let path_prefix = match path.rfind('/') {
            Some(0) => "/".to_string(),
            Some(idx) => path[..=idx].to_string(),
            None => "/".to_string(),
        };
        Self {
            host: seed.host_str().unwrap_or_default().to_string(),
            port: seed.port(),
            path_prefix,
        }
    }

    pub fn in_scope(&self, url: &Url) -> bool {
        if url.host_str() != Some(self.host.as_str()) || url.port() != self.port {
            return false;
        }
        let path = canonical_path(url.path());
        // the prefix's own directory URL normalizes without the trailing slash
        path.starts_with(&self.path_prefix) || self.path_prefix == format!("{path}/")
    }
}

struct Inner {
    queue: VecDeque<FrontierEntry>,
    seen: HashSet<String>,
}

/// The crawl work-list: a FIFO of in-scope URLs, each admitted at most once
/// per run. The seen-set check and queue insert happen under one mutex so
/// concurrent workers can never double-admit a URL.
pub struct Frontier {
    scope: CrawlScope,
    max_depth: u32,
    inner: Mutex<Inner>,
}

impl Frontier {
    pub fn new(seed: &Url, max_depth: u32) -> Self {
        Self {
            scope: CrawlScope::from_seed(seed),
            max_depth,
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                seen: HashSet::new(),
            }),
        }
    }

    /// Admit `url` at `depth`. Returns false for anything over the depth
    /// limit, outside the crawl scope, or already seen this run.
    pub fn enqueue(&self, url: Url, depth: u32) -> bool {
        if depth > self.max_depth {
            return false;
        }
        if !self.scope.in_scope(&url) {
            tracing::trace!(%url, "out of scope, skipping");
            return false;
        }
        let key = normalize_url(&url);
        let mut inner = self.inner.lock();
        if !inner.seen.insert(key) {
            return false;
        }
        inner.queue.push_back(FrontierEntry { url, depth });
        true
    }

    pub fn dequeue(&self) -> Option<FrontierEntry> {
        self.inner.lock().queue.pop_front()
    }

    pub fn seen_count(&self) -> usize {
        self.inner.lock().seen.len()
    }

    pub fn queued_count(&self) -> usize {
        self.inner.lock().queue.len()
    }
}
