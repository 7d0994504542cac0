use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Tokens shorter than this are discarded: single characters are noise for
/// both retrieval and spelling correction.
pub const MIN_TOKEN_LEN: usize = 2;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","will","with","would",
            "you","your","yours","yourself","yourselves",
        ];
        words.iter().copied().collect()
    };
}

/// Tokenize with the default English stopword set. Indexing and querying
/// must both go through this so dictionary terms and query terms agree.
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_with(text, &STOPWORDS)
}

/// Tokenize with a caller-supplied stopword set: NFKC normalization,
/// lowercasing, alphanumeric-run splitting, minimum-length and stopword
/// filtering. No stemming: the term dictionary must hold exact surface
/// forms for edit-distance correction.
pub fn tokenize_with(text: &str, stopwords: &HashSet<&str>) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for mat in RE.find_iter(&normalized) {
        let token = mat.as_str();
        if token.chars().count() < MIN_TOKEN_LEN || stopwords.contains(token) {
            continue;
        }
        tokens.push(token.to_string());
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_non_alphanumeric() {
        let t = tokenize("full-text search, for web/pages!");
        assert_eq!(t, vec!["full", "text", "search", "web", "pages"]);
    }

    #[test]
    fn lowercases_and_normalizes_unicode() {
        let t = tokenize("Caf\u{e9} MENU");
        assert!(t.contains(&"café".to_string()));
        assert!(t.contains(&"menu".to_string()));
    }

    #[test]
    fn drops_short_tokens_and_stopwords() {
        let t = tokenize("the quick brown fox and a dog x 7");
        assert_eq!(t, vec!["quick", "brown", "fox", "dog"]);
    }

    #[test]
    fn custom_stopwords_apply() {
        let stop: HashSet<&str> = ["quick"].into_iter().collect();
        let t = tokenize_with("the quick brown fox", &stop);
        assert_eq!(t, vec!["the", "brown", "fox"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \t\n ").is_empty());
    }
}
