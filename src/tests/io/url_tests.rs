//! Tests for URL-backed data sources.

use std::io::Read;

use url::Url;

use crate::error::DataError;
use crate::io::DataSource;
use crate::tests::{resource, resource_bytes};

#[test]
fn file_url_reads_from_disk() {
    let path = resource("regular-data/leap-seconds/tai-utc.dat");
    let url = Url::from_file_path(&path).unwrap();

    let source = DataSource::from_url(&url).unwrap();
    assert_eq!(source.name(), "tai-utc.dat");

    let mut content = Vec::new();
    source
        .opener()
        .open_stream_once()
        .unwrap()
        .unwrap()
        .read_to_end(&mut content)
        .unwrap();
    assert_eq!(content, resource_bytes("regular-data/leap-seconds/tai-utc.dat"));
}

#[test]
fn unknown_scheme_is_rejected() {
    let url = Url::parse("ftp://example.org/tai-utc.dat").unwrap();
    let err = DataSource::from_url(&url).unwrap_err();
    assert!(matches!(err, DataError::UnsupportedUrl(ref u) if u == "ftp://example.org/tai-utc.dat"));
}

#[cfg(not(feature = "network"))]
#[test]
fn http_needs_the_network_feature() {
    let url = Url::parse("https://example.org/finals2000A.daily").unwrap();
    assert!(matches!(
        DataSource::from_url(&url),
        Err(DataError::UnsupportedUrl(_))
    ));
}

#[cfg(feature = "network")]
#[test]
fn http_source_is_named_after_last_segment() {
    let url = Url::parse("https://example.org/iers/finals2000A.daily").unwrap();
    let source = DataSource::from_url(&url).unwrap();
    assert_eq!(source.name(), "finals2000A.daily");
    assert!(source.opener().raw_data_is_binary());
}
