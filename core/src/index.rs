use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::tokenizer::tokenize;

pub type TermId = u32;
pub type DocId = u32;

/// How a document's teaser was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeaserSource {
    /// Summarized by the external text-generation service.
    Generated,
    /// Truncated from the page body at a word boundary.
    Truncated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    pub url: String,
    pub title: String,
    pub teaser: String,
    pub teaser_source: TeaserSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    /// Occurrences of the term in the document, always >= 1.
    pub term_frequency: u32,
}

/// Immutable inverted index over one crawl run. Built whole by
/// `IndexBuilder`; readers only ever see a finished instance.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub dictionary: HashMap<String, TermId>,
    /// Document frequency per term, indexed by TermId.
    pub df: Vec<u32>,
    /// Postings per term, sorted by doc_id.
    pub postings: HashMap<TermId, Vec<Posting>>,
    pub docs: HashMap<DocId, DocMeta>,
    pub num_docs: u32,
}

impl SearchIndex {
    pub fn postings_for(&self, term: &str) -> Option<&[Posting]> {
        let tid = self.dictionary.get(term)?;
        self.postings.get(tid).map(|p| p.as_slice())
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.dictionary
            .get(term)
            .and_then(|tid| self.df.get(*tid as usize).copied())
            .unwrap_or(0)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.dictionary.contains_key(term)
    }

    /// The term dictionary: every distinct indexed token.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.dictionary.keys().map(String::as_str)
    }
}

/// Accumulates pages into a fresh index. One builder per rebuild; the
/// result replaces the previous index wholesale, never mutates it.
#[derive(Default)]
pub struct IndexBuilder {
    next_doc_id: DocId,
    next_term_id: TermId,
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    postings: HashMap<TermId, Vec<Posting>>,
    docs: HashMap<DocId, DocMeta>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one page: title and body tokens both count toward term
    /// frequency, so title words are searchable.
    pub fn add_page(
        &mut self,
        url: &str,
        title: &str,
        body_text: &str,
        teaser: String,
        teaser_source: TeaserSource,
    ) {
        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;

        let mut tf: HashMap<TermId, u32> = HashMap::new();
        for token in tokenize(title).into_iter().chain(tokenize(body_text)) {
            let tid = *self.dictionary.entry(token).or_insert_with(|| {
                let id = self.next_term_id;
                self.next_term_id += 1;
                self.df.resize(id as usize + 1, 0);
                id
            });
            *tf.entry(tid).or_insert(0) += 1;
        }
        for (tid, count) in tf {
            self.df[tid as usize] += 1;
            self.postings.entry(tid).or_default().push(Posting {
                doc_id,
                term_frequency: count,
            });
        }

        self.docs.insert(
            doc_id,
            DocMeta {
                url: url.to_string(),
                title: title.to_string(),
                teaser,
                teaser_source,
            },
        );
    }

    pub fn finish(mut self) -> SearchIndex {
        for plist in self.postings.values_mut() {
            plist.sort_by_key(|p| p.doc_id);
        }
        let num_docs = self.next_doc_id;
        tracing::info!(num_docs, num_terms = self.dictionary.len(), "index built");
        SearchIndex {
            dictionary: self.dictionary,
            df: self.df,
            postings: self.postings,
            docs: self.docs,
            num_docs,
        }
    }
}

/// Publish handle for the query phase. Readers grab an `Arc` snapshot and
/// never observe a half-built index; `publish` swaps the snapshot in one
/// write-lock critical section.
#[derive(Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<Arc<SearchIndex>>>,
}

impl SharedIndex {
    pub fn new(index: SearchIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    pub fn snapshot(&self) -> Arc<SearchIndex> {
        self.inner.read().clone()
    }

    pub fn publish(&self, index: SearchIndex) {
        *self.inner.write() = Arc::new(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_index() -> SearchIndex {
        let mut b = IndexBuilder::new();
        b.add_page(
            "http://s.test/a",
            "Alpha",
            "search engine search",
            "teaser a".into(),
            TeaserSource::Truncated,
        );
        b.add_page(
            "http://s.test/b",
            "Beta",
            "engine room",
            "teaser b".into(),
            TeaserSource::Generated,
        );
        b.finish()
    }

    #[test]
    fn accumulates_term_frequencies() {
        let idx = tiny_index();
        let postings = idx.postings_for("search").unwrap();
        assert_eq!(postings, &[Posting { doc_id: 0, term_frequency: 2 }]);
        let postings = idx.postings_for("engine").unwrap();
        assert_eq!(postings.len(), 2);
        assert!(postings.iter().all(|p| p.term_frequency == 1));
    }

    #[test]
    fn title_tokens_are_indexed() {
        let idx = tiny_index();
        assert!(idx.contains_term("alpha"));
        assert_eq!(idx.document_frequency("alpha"), 1);
    }

    #[test]
    fn df_counts_documents_not_occurrences() {
        let idx = tiny_index();
        assert_eq!(idx.document_frequency("search"), 1);
        assert_eq!(idx.document_frequency("engine"), 2);
        assert_eq!(idx.document_frequency("missing"), 0);
    }

    #[test]
    fn shared_index_swaps_atomically() {
        let shared = SharedIndex::new(tiny_index());
        let before = shared.snapshot();
        assert_eq!(before.num_docs, 2);

        shared.publish(SearchIndex::default());
        assert_eq!(shared.snapshot().num_docs, 0);
        // old snapshot stays valid for readers that still hold it
        assert_eq!(before.num_docs, 2);
    }
}
