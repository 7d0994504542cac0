use ferret_core::persist::{index_exists, load_index, save_index};
use ferret_core::{IndexBuilder, IndexError, TeaserSource};
use tempfile::tempdir;

fn sample_index() -> ferret_core::SearchIndex {
    let mut b = IndexBuilder::new();
    b.add_page(
        "http://site.test/",
        "Home",
        "welcome to the demo site",
        "welcome teaser".into(),
        TeaserSource::Generated,
    );
    b.add_page(
        "http://site.test/about",
        "About",
        "about this demo site and its pages",
        "about teaser...".into(),
        TeaserSource::Truncated,
    );
    b.finish()
}

#[test]
fn round_trip_is_equal() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("index");
    let index = sample_index();

    save_index(&dest, &index, false, "2024-01-01T00:00:00Z".into()).unwrap();
    let reloaded = load_index(&dest).unwrap();

    assert_eq!(reloaded, index);
}

#[test]
fn refuses_existing_destination_without_force() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("index");
    let index = sample_index();

    save_index(&dest, &index, false, "2024-01-01T00:00:00Z".into()).unwrap();
    assert!(index_exists(&dest));

    let err = save_index(&dest, &index, false, "2024-01-02T00:00:00Z".into()).unwrap_err();
    assert!(matches!(err, IndexError::DestinationExists(_)));
}

#[test]
fn force_overwrites_existing_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("index");

    save_index(&dest, &sample_index(), false, "2024-01-01T00:00:00Z".into()).unwrap();

    let mut b = IndexBuilder::new();
    b.add_page("http://other.test/", "Other", "entirely new content", "".into(), TeaserSource::Truncated);
    let replacement = b.finish();

    save_index(&dest, &replacement, true, "2024-01-02T00:00:00Z".into()).unwrap();
    let reloaded = load_index(&dest).unwrap();
    assert_eq!(reloaded, replacement);
    assert_eq!(reloaded.num_docs, 1);
}

#[test]
fn missing_destination_is_not_an_index() {
    let dir = tempdir().unwrap();
    assert!(!index_exists(dir.path().join("nowhere")));
    assert!(load_index(dir.path().join("nowhere")).is_err());
}
