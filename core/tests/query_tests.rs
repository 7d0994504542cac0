use ferret_core::{IndexBuilder, QueryEngine, SearchIndex, TeaserSource};

fn animal_index() -> SearchIndex {
    let mut b = IndexBuilder::new();
    // doc A: "cat" twice
    b.add_page(
        "http://site.test/a",
        "A",
        "cat cat",
        "about cats".into(),
        TeaserSource::Truncated,
    );
    // doc B: "cat" and "dog" once each
    b.add_page(
        "http://site.test/b",
        "B",
        "cat dog",
        "cats and dogs".into(),
        TeaserSource::Truncated,
    );
    // doc C: neither
    b.add_page(
        "http://site.test/c",
        "C",
        "weather report",
        "the weather".into(),
        TeaserSource::Truncated,
    );
    b.finish()
}

#[test]
fn ranking_follows_tf_idf_exactly() {
    let idx = animal_index();
    let out = QueryEngine::search(&idx, "cat dog");

    // doc C matches no query token and is excluded
    assert_eq!(out.hits.len(), 2);
    assert!(out.corrected_query.is_none());

    // N=3, df(cat)=2, df(dog)=1:
    //   score(A) = 2 * ln(3/2)
    //   score(B) = 1 * ln(3/2) + 1 * ln(3/1)
    let idf_cat = (3.0f32 / 2.0).ln();
    let idf_dog = 3.0f32.ln();
    let expect_a = 2.0 * idf_cat;
    let expect_b = idf_cat + idf_dog;
    assert!(expect_b > expect_a);

    assert_eq!(out.hits[0].url, "http://site.test/b");
    assert_eq!(out.hits[1].url, "http://site.test/a");
    assert!((out.hits[0].score - expect_b).abs() < 1e-6);
    assert!((out.hits[1].score - expect_a).abs() < 1e-6);
}

#[test]
fn equal_scores_order_by_url() {
    let mut b = IndexBuilder::new();
    b.add_page("http://site.test/z", "Z", "fox", "".into(), TeaserSource::Truncated);
    b.add_page("http://site.test/a", "A", "fox", "".into(), TeaserSource::Truncated);
    let idx = b.finish();

    let out = QueryEngine::search(&idx, "fox");
    assert_eq!(out.hits.len(), 2);
    assert_eq!(out.hits[0].url, "http://site.test/a");
    assert_eq!(out.hits[1].url, "http://site.test/z");
}

#[test]
fn misspelled_token_is_corrected_and_used() {
    let mut b = IndexBuilder::new();
    b.add_page(
        "http://site.test/",
        "",
        "search engine",
        "".into(),
        TeaserSource::Truncated,
    );
    let idx = b.finish();

    let out = QueryEngine::search(&idx, "serch");
    assert_eq!(out.corrected_query.as_deref(), Some("search"));
    assert_eq!(out.hits.len(), 1);
    assert_eq!(out.hits[0].url, "http://site.test/");
}

#[test]
fn known_tokens_are_never_rewritten() {
    let mut b = IndexBuilder::new();
    b.add_page("http://site.test/", "", "search engine", "".into(), TeaserSource::Truncated);
    let idx = b.finish();

    let out = QueryEngine::search(&idx, "engine");
    assert!(out.corrected_query.is_none());
    assert_eq!(out.hits.len(), 1);
}

#[test]
fn unmatchable_query_is_an_empty_outcome() {
    let idx = animal_index();
    let out = QueryEngine::search(&idx, "xylophone-factory-zzz");
    assert!(out.hits.is_empty());

    let out = QueryEngine::search(&idx, "");
    assert!(out.hits.is_empty());
    assert!(out.corrected_query.is_none());

    // stopwords only
    let out = QueryEngine::search(&idx, "the and of");
    assert!(out.hits.is_empty());
}

#[test]
fn lucky_matches_rank_one_of_search() {
    let idx = animal_index();
    let out = QueryEngine::search(&idx, "cat dog");
    let lucky = QueryEngine::lucky(&idx, "cat dog");
    assert_eq!(lucky.as_deref(), Some(out.hits[0].url.as_str()));

    assert_eq!(QueryEngine::lucky(&idx, "xylophone-factory-zzz"), None);
}

#[test]
fn empty_title_falls_back_to_url() {
    let mut b = IndexBuilder::new();
    b.add_page("http://site.test/bare", "", "lonely words", "".into(), TeaserSource::Truncated);
    let idx = b.finish();

    let out = QueryEngine::search(&idx, "lonely");
    assert_eq!(out.hits[0].title, "http://site.test/bare");
}
