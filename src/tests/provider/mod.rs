//! Provider tests.

mod network_tests;

use std::io::Read;

use regex::Regex;

use crate::error::LoaderError;
use crate::loader::{DataLoader, LoadControl};

/// Anchored pattern, the way the manager compiles it.
pub(super) fn supported(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("valid pattern")
}

/// Loader recording names and contents, optionally stopping after a count.
#[derive(Debug, Default)]
pub(super) struct RecordingLoader {
    pub(super) loaded: Vec<(String, String)>,
    pub(super) stop_after: Option<usize>,
    pub(super) refuse: bool,
}

impl RecordingLoader {
    pub(super) fn names(&self) -> Vec<&str> {
        self.loaded.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl DataLoader for RecordingLoader {
    fn still_accepts_data(&self) -> bool {
        !self.refuse
    }

    fn load_data(&mut self, input: &mut dyn Read, name: &str) -> Result<LoadControl, LoaderError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        self.loaded.push((name.to_string(), text));
        match self.stop_after {
            Some(limit) if self.loaded.len() >= limit => Ok(LoadControl::Stop),
            _ => Ok(LoadControl::Continue),
        }
    }
}
