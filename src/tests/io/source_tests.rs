//! Tests for DataSource and Opener.

use std::io::{BufRead, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::io::DataSource;
use crate::tests::{resource, resource_bytes};

fn read_stream(source: &DataSource) -> Vec<u8> {
    let mut stream = source
        .opener()
        .open_stream_once()
        .unwrap()
        .expect("stream available");
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).unwrap();
    buf
}

fn read_reader(source: &DataSource) -> Vec<String> {
    source
        .opener()
        .open_reader_once()
        .unwrap()
        .expect("reader available")
        .lines()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn path_source_is_named_after_final_segment() {
    let source = DataSource::from_path(resource("regular-data/leap-seconds/tai-utc.dat"));
    assert_eq!(source.name(), "tai-utc.dat");
    assert!(source.opener().raw_data_is_binary());
}

#[test]
fn stream_and_reader_give_same_content() {
    let source = DataSource::from_path(resource("regular-data/UTC-TAI.history"));

    let from_stream = String::from_utf8(read_stream(&source)).unwrap();
    let from_reader = read_reader(&source);

    assert_eq!(from_stream.lines().collect::<Vec<_>>(), from_reader);
    assert_eq!(from_reader.len(), 49);
}

#[test]
fn reader_source_can_be_opened_as_stream() {
    let text = "first line\nsecond line ∆t\n";
    let source = DataSource::from_string("notes.txt", text);

    assert!(!source.opener().raw_data_is_binary());
    assert_eq!(read_stream(&source), text.as_bytes());
    assert_eq!(read_reader(&source), vec!["first line", "second line ∆t"]);
}

#[test]
fn bytes_source_is_binary() {
    let data = resource_bytes("compressed-data/tai-utc.dat.gz");
    let source = DataSource::from_bytes("tai-utc.dat.gz", data.clone());

    assert!(source.opener().raw_data_is_binary());
    assert_eq!(read_stream(&source), data);
}

#[test]
fn every_open_yields_a_fresh_stream() {
    let opened = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&opened);
    let source = DataSource::from_stream("counted", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Box::new(&b"abc"[..]) as Box<dyn Read + Send>))
    });

    assert_eq!(read_stream(&source), b"abc");
    assert_eq!(read_stream(&source.clone()), b"abc");
    assert_eq!(read_reader(&source), vec!["abc"]);
    assert_eq!(opened.load(Ordering::SeqCst), 3);
}

#[test]
fn null_stream_opener_propagates_none() {
    let source = DataSource::from_stream("empty", || Ok(None));
    assert!(source.opener().open_stream_once().unwrap().is_none());
    assert!(source.opener().open_reader_once().unwrap().is_none());
}

#[test]
fn null_reader_opener_propagates_none() {
    let source = DataSource::from_reader("empty", || Ok(None));
    assert!(source.opener().open_stream_once().unwrap().is_none());
    assert!(source.opener().open_reader_once().unwrap().is_none());
}

#[test]
fn missing_file_fails_only_when_opened() {
    let source = DataSource::from_path(resource("regular-data/no-such-file"));
    assert_eq!(source.name(), "no-such-file");
    let err = source.opener().open_stream_once().err().expect("open fails");
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
