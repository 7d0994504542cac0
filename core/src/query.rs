use serde::Serialize;
use std::collections::HashMap;

use crate::index::{DocId, SearchIndex};
use crate::spell::suggest;
use crate::tokenizer::tokenize;

/// One ranked match. Ephemeral: computed per query, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub teaser: String,
    pub score: f32,
}

#[derive(Debug, Default, Serialize)]
pub struct QueryOutcome {
    pub hits: Vec<SearchHit>,
    /// "Did you mean" suggestion, present only when at least one query
    /// token was corrected. Retrieval already used the corrected tokens.
    pub corrected_query: Option<String>,
}

/// Read-only ranking over a published `SearchIndex`. Holds no state, so
/// concurrent queries need no locking.
pub struct QueryEngine;

impl QueryEngine {
    /// Tokenize, correct unknown tokens against the term dictionary, fetch
    /// postings, and rank with tf-idf. An empty or all-stopword query is a
    /// normal empty outcome, never an error.
    pub fn search(index: &SearchIndex, query_text: &str) -> QueryOutcome {
        let tokens = tokenize(query_text);
        if tokens.is_empty() {
            return QueryOutcome::default();
        }

        let mut corrected = false;
        let terms: Vec<String> = tokens
            .into_iter()
            .map(|token| {
                if index.contains_term(&token) {
                    return token;
                }
                match suggest(index, &token) {
                    Some(term) if term != token => {
                        tracing::debug!(from = %token, to = %term, "corrected query token");
                        corrected = true;
                        term
                    }
                    _ => token,
                }
            })
            .collect();

        let mut scores: HashMap<DocId, f32> = HashMap::new();
        let n = index.num_docs.max(1) as f32;
        for term in &terms {
            let Some(postings) = index.postings_for(term) else {
                continue;
            };
            let idf = (n / index.document_frequency(term).max(1) as f32).ln();
            for p in postings {
                *scores.entry(p.doc_id).or_insert(0.0) += p.term_frequency as f32 * idf;
            }
        }

        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .filter_map(|(doc_id, score)| {
                let meta = index.docs.get(&doc_id)?;
                let title = if meta.title.is_empty() {
                    meta.url.clone()
                } else {
                    meta.title.clone()
                };
                Some(SearchHit {
                    url: meta.url.clone(),
                    title,
                    teaser: meta.teaser.clone(),
                    score,
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.url.cmp(&b.url))
        });

        QueryOutcome {
            hits,
            corrected_query: corrected.then(|| terms.join(" ")),
        }
    }

    /// Top-ranked URL under the same ranking as `search`, or `None` when the
    /// query matches nothing.
    pub fn lucky(index: &SearchIndex, query_text: &str) -> Option<String> {
        Self::search(index, query_text)
            .hits
            .into_iter()
            .next()
            .map(|hit| hit.url)
    }
}
