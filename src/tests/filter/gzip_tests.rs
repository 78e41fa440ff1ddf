//! Tests for the gzip filter.
#![cfg(feature = "gzip")]

use std::io::{Read, Write};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::filter::{DataFilter, GzipFilter};
use crate::io::DataSource;
use crate::tests::{resource, resource_bytes};

fn read_all(source: &DataSource) -> Vec<u8> {
    let mut out = Vec::new();
    source
        .opener()
        .open_stream_once()
        .unwrap()
        .unwrap()
        .read_to_end(&mut out)
        .unwrap();
    out
}

#[test]
fn decompresses_gz_files() {
    let source = DataSource::from_path(resource("compressed-data/tai-utc.dat.gz"));
    let filtered = GzipFilter.filter(&source).unwrap().expect("filter applies");

    assert_eq!(filtered.name(), "tai-utc.dat");
    assert_eq!(
        read_all(&filtered),
        resource_bytes("regular-data/leap-seconds/tai-utc.dat")
    );
}

#[test]
fn decompresses_in_memory_data() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"1972 JAN  1 =JD 2441317.5  TAI-UTC=  10.0\n").unwrap();
    let compressed = encoder.finish().unwrap();

    let source = DataSource::from_bytes("leap.dat.gz", compressed);
    let filtered = GzipFilter.filter(&source).unwrap().unwrap();
    assert_eq!(read_all(&filtered), b"1972 JAN  1 =JD 2441317.5  TAI-UTC=  10.0\n");
}

#[test]
fn ignores_other_names_and_text_sources() {
    let plain = DataSource::from_path(resource("regular-data/UTC-TAI.history"));
    assert!(GzipFilter.filter(&plain).unwrap().is_none());

    let text = DataSource::from_string("notes.gz", "plain");
    assert!(GzipFilter.filter(&text).unwrap().is_none());
}

#[test]
fn corrupted_data_fails_while_reading() {
    let source = DataSource::from_bytes("broken.gz", b"not gzip at all".to_vec());
    let filtered = GzipFilter.filter(&source).unwrap().unwrap();

    let mut stream = filtered.opener().open_stream_once().unwrap().unwrap();
    let mut out = Vec::new();
    assert!(stream.read_to_end(&mut out).is_err());
}
