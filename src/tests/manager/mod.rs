//! DataProvidersManager tests.

mod feed_tests;

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;

use crate::error::DataError;
use crate::filter::FiltersManager;
use crate::loader::DataLoader;
use crate::provider::{DataProvider, DirectoryCrawler};
use crate::tests::resource;

/// Provider failing every feed with a missing root.
#[derive(Debug)]
pub(super) struct FailingProvider {
    pub(super) root: PathBuf,
}

impl DataProvider for FailingProvider {
    fn id(&self) -> &str {
        "failing"
    }

    fn feed(
        &self,
        _supported: &Regex,
        _loader: &mut dyn DataLoader,
        _filters: &FiltersManager,
    ) -> Result<bool, DataError> {
        Err(DataError::MissingRoot(self.root.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(super) fn failing() -> Arc<dyn DataProvider> {
    Arc::new(FailingProvider {
        root: PathBuf::from("/nowhere"),
    })
}

pub(super) fn directory(relative: &str) -> Arc<dyn DataProvider> {
    Arc::new(DirectoryCrawler::new(resource(relative)).expect("resource directory"))
}
