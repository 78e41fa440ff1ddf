//! Tests for NetworkCrawler.

use std::time::Duration;

use url::Url;

use super::{RecordingLoader, supported};
use crate::error::DataError;
use crate::filter::FiltersManager;
use crate::io::DEFAULT_NETWORK_TIMEOUT;
use crate::provider::{DataProvider, NetworkCrawler};
use crate::tests::resource;

fn file_url(relative: &str) -> String {
    Url::from_file_path(resource(relative)).unwrap().to_string()
}

#[test]
fn invalid_url_is_rejected() {
    let err = NetworkCrawler::from_strs(["not a url"]).unwrap_err();
    assert!(matches!(err, DataError::InvalidUrl { ref url, .. } if url == "not a url"));
}

#[test]
fn id_lists_every_url() {
    let crawler = NetworkCrawler::from_strs([
        "https://example.org/a.dat",
        "https://example.org/b.dat",
    ])
    .unwrap();
    assert_eq!(
        crawler.id(),
        "https://example.org/a.dat,https://example.org/b.dat"
    );
    assert_eq!(crawler.urls().len(), 2);
    assert_eq!(crawler.timeout(), DEFAULT_NETWORK_TIMEOUT);

    let crawler = crawler.with_timeout(Duration::from_secs(3));
    assert_eq!(crawler.timeout(), Duration::from_secs(3));
}

#[test]
fn file_urls_are_filtered_and_loaded() {
    let crawler = NetworkCrawler::from_strs([
        file_url("regular-data/leap-seconds/tai-utc.dat"),
        file_url("compressed-data/UTC-TAI.history.Z"),
    ])
    .unwrap();

    let mut loader = RecordingLoader::default();
    let found = crawler
        .feed(
            &supported(r"UTC-TAI\.history"),
            &mut loader,
            &FiltersManager::with_default_filters(),
        )
        .unwrap();

    assert!(found);
    assert_eq!(loader.names(), vec!["UTC-TAI.history"]);
    assert_eq!(loader.loaded[0].1.lines().count(), 49);
}

#[test]
fn unsupported_names_are_never_opened() {
    let crawler = NetworkCrawler::from_strs([file_url("regular-data/missing.dat")]).unwrap();
    let mut loader = RecordingLoader::default();
    let found = crawler
        .feed(&supported(r"other\.dat"), &mut loader, &FiltersManager::new())
        .unwrap();
    assert!(!found);
}

#[test]
fn unreachable_resource_is_reported() {
    let crawler = NetworkCrawler::from_strs([file_url("regular-data/missing.dat")]).unwrap();
    let err = crawler
        .feed(
            &supported(r"missing\.dat"),
            &mut RecordingLoader::default(),
            &FiltersManager::new(),
        )
        .unwrap_err();
    assert!(matches!(err, DataError::UnreachableUrl { ref url, .. } if url.ends_with("missing.dat")));
}

#[test]
fn unsupported_scheme_fails_the_feed() {
    let crawler = NetworkCrawler::from_strs(["ftp://example.org/tai-utc.dat"]).unwrap();
    let err = crawler
        .feed(&supported(".*"), &mut RecordingLoader::default(), &FiltersManager::new())
        .unwrap_err();
    assert!(matches!(err, DataError::UnsupportedUrl(_)));
}

#[cfg(feature = "archives")]
#[test]
fn zip_urls_are_crawled() {
    let crawler = NetworkCrawler::from_strs([file_url("zipped-data/multizip.zip")]).unwrap();
    let mut loader = RecordingLoader::default();
    let found = crawler
        .feed(&supported(r"[cd]\.txt"), &mut loader, &FiltersManager::new())
        .unwrap();
    assert!(found);
    assert_eq!(loader.names(), vec!["c.txt", "d.txt"]);
}
