use sarge::ArgumentType;

use crate::cli::PathList;

#[test]
fn path_list_splits_on_commas() {
    let parsed = <PathList as ArgumentType>::from_value(Some("/data/iers, /data/eop.zip,,"))
        .expect("some")
        .expect("ok");
    assert_eq!(
        parsed,
        PathList(vec!["/data/iers".to_string(), "/data/eop.zip".to_string()])
    );
}

#[test]
fn path_list_defaults_to_empty() {
    let parsed = <PathList as ArgumentType>::from_value(None)
        .expect("some")
        .expect("ok");
    assert!(parsed.is_empty());
    assert_eq!(<PathList as ArgumentType>::default_value(), Some(PathList::default()));
}
