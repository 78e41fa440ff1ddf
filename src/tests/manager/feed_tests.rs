//! Tests for DataProvidersManager::feed.

use std::io::Read;

use super::{directory, failing};
use crate::error::{DataError, ErrorPolicy, LoaderError, Stage};
use crate::loader::{DataLoader, FnLoader, LoadControl};
use crate::manager::DataProvidersManager;

#[derive(Debug, Default)]
struct CountingLoader {
    names: Vec<String>,
    stop: bool,
}

impl DataLoader for CountingLoader {
    fn load_data(&mut self, input: &mut dyn Read, name: &str) -> Result<LoadControl, LoaderError> {
        std::io::copy(input, &mut std::io::sink())?;
        self.names.push(name.to_string());
        Ok(if self.stop {
            LoadControl::Stop
        } else {
            LoadControl::Continue
        })
    }
}

#[test]
fn feed_reports_whether_anything_was_loaded() {
    let mut manager = DataProvidersManager::with_default_filters();
    manager.add_provider(directory("regular-data"));

    let mut loader = CountingLoader::default();
    assert!(manager.feed(r"tai-utc\.dat", &mut loader).unwrap());
    assert!(!manager.feed(r"no-such\.file", &mut loader).unwrap());
    assert_eq!(loader.names, vec!["tai-utc.dat"]);
}

#[test]
fn feed_without_providers_loads_nothing() {
    let mut manager = DataProvidersManager::new();
    let mut loader = CountingLoader::default();
    assert!(!manager.feed(".*", &mut loader).unwrap());
}

#[test]
fn invalid_pattern_is_a_resolve_error() {
    let mut manager = DataProvidersManager::new();
    manager.add_provider(directory("regular-data"));

    let err = manager
        .feed("(unclosed", &mut CountingLoader::default())
        .unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.errors[0].stage, Stage::Resolve);
    assert!(matches!(
        err.first(),
        Some(DataError::InvalidPattern { pattern, .. }) if pattern == "(unclosed"
    ));
}

#[test]
fn every_provider_is_fed() {
    let mut manager = DataProvidersManager::with_default_filters();
    manager.add_provider(directory("compressed-data"));
    manager.add_provider(directory("regular-data"));

    let mut loader = CountingLoader::default();
    assert!(manager.feed(r"UTC-TAI\.history", &mut loader).unwrap());
    assert_eq!(loader.names, vec!["UTC-TAI.history", "UTC-TAI.history"]);
}

#[test]
fn stop_request_skips_remaining_providers() {
    let mut manager = DataProvidersManager::with_default_filters();
    manager.add_provider(directory("compressed-data"));
    manager.add_provider(failing());

    let mut loader = CountingLoader {
        stop: true,
        ..CountingLoader::default()
    };
    assert!(manager.feed(r"UTC-TAI\.history", &mut loader).unwrap());
    assert_eq!(loader.names.len(), 1);
}

#[test]
fn fast_fail_stops_at_first_failure() {
    let mut manager = DataProvidersManager::new();
    manager.add_provider(failing());
    manager.add_provider(directory("regular-data"));

    let mut loader = CountingLoader::default();
    let err = manager.feed(r"tai-utc\.dat", &mut loader).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.errors[0].provider, "failing");
    assert_eq!(err.errors[0].stage, Stage::Resolve);
    assert!(loader.names.is_empty());
}

#[test]
fn accumulate_feeds_everything_then_reports() {
    let mut manager = DataProvidersManager::new();
    manager.set_error_policy(ErrorPolicy::Accumulate);
    manager.add_provider(failing());
    manager.add_provider(directory("regular-data"));
    manager.add_provider(failing());

    let mut loader = CountingLoader::default();
    let err = manager.feed(r"tai-utc\.dat", &mut loader).unwrap_err();
    assert_eq!(err.len(), 2);
    assert!(err
        .errors
        .iter()
        .all(|e| matches!(e.error, DataError::MissingRoot(_))));
    assert_eq!(loader.names, vec!["tai-utc.dat"]);
}

#[test]
fn loaded_names_are_recorded() {
    let mut manager = DataProvidersManager::with_default_filters();
    manager.add_provider(directory("regular-data"));

    let mut loader = FnLoader(|input: &mut dyn Read, _name: &str| -> Result<(), LoaderError> {
        std::io::copy(input, &mut std::io::sink())?;
        Ok(())
    });
    manager
        .feed(r"tai-utc\.dat|finals2000A\.daily", &mut loader)
        .unwrap();

    let names: Vec<&str> = manager.loaded_data_names().iter().map(String::as_str).collect();
    assert_eq!(names, vec!["finals2000A.daily", "tai-utc.dat"]);

    manager.clear_loaded_data_names();
    assert!(manager.loaded_data_names().is_empty());
}

#[test]
fn failed_loads_are_not_recorded() {
    let mut manager = DataProvidersManager::new();
    manager.add_provider(directory("regular-data"));

    let mut loader = FnLoader(|_: &mut dyn Read, _: &str| -> Result<(), LoaderError> {
        Err("cannot parse".into())
    });
    let err = manager.feed(r"tai-utc\.dat", &mut loader).unwrap_err();
    assert_eq!(err.errors[0].stage, Stage::Load);
    assert_eq!(err.first().unwrap().to_string(), "cannot parse");
    assert!(manager.loaded_data_names().is_empty());
}
