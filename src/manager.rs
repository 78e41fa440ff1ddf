//! Registry of providers feeding loaders.

use std::any::Any;
use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;

use regex::Regex;

use crate::error::{DataError, ErrorPolicy, FeedError, LoaderError, ProviderError};
use crate::filter::FiltersManager;
use crate::loader::{DataLoader, LoadControl};
use crate::provider::DataProvider;

/// Ordered set of providers sharing one filter list.
///
/// The manager is an explicit context: create one, register providers (the
/// same provider may be registered several times), then [`feed`] loaders.
///
/// [`feed`]: DataProvidersManager::feed
#[derive(Debug, Default)]
pub struct DataProvidersManager {
    providers: Vec<Arc<dyn DataProvider>>,
    filters: FiltersManager,
    error_policy: ErrorPolicy,
    loaded: BTreeSet<String>,
}

impl DataProvidersManager {
    /// Create an empty manager without filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty manager with the default decompression filters.
    pub fn with_default_filters() -> Self {
        Self {
            filters: FiltersManager::with_default_filters(),
            ..Self::default()
        }
    }

    pub fn add_provider(&mut self, provider: Arc<dyn DataProvider>) {
        log::debug!("adding data provider {}", provider.id());
        self.providers.push(provider);
    }

    /// Remove the first registration of this exact provider instance.
    pub fn remove_provider(&mut self, provider: &Arc<dyn DataProvider>) -> Option<Arc<dyn DataProvider>> {
        let index = self
            .providers
            .iter()
            .position(|p| Arc::ptr_eq(p, provider))?;
        Some(self.providers.remove(index))
    }

    /// Remove the first provider of type `T`.
    pub fn remove_provider_of<T: Any>(&mut self) -> Option<Arc<dyn DataProvider>> {
        let index = self
            .providers
            .iter()
            .position(|p| p.as_any().is::<T>())?;
        Some(self.providers.remove(index))
    }

    pub fn clear_providers(&mut self) {
        self.providers.clear();
    }

    pub fn providers(&self) -> &[Arc<dyn DataProvider>] {
        &self.providers
    }

    /// Whether this exact provider instance is registered.
    pub fn is_supported(&self, provider: &Arc<dyn DataProvider>) -> bool {
        self.providers.iter().any(|p| Arc::ptr_eq(p, provider))
    }

    /// Whether some provider of type `T` is registered.
    pub fn has_provider_of<T: Any>(&self) -> bool {
        self.providers.iter().any(|p| p.as_any().is::<T>())
    }

    pub fn filters(&self) -> &FiltersManager {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FiltersManager {
        &mut self.filters
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    pub fn set_error_policy(&mut self, policy: ErrorPolicy) {
        self.error_policy = policy;
    }

    /// Names of every resource loaded through this manager.
    pub fn loaded_data_names(&self) -> &BTreeSet<String> {
        &self.loaded
    }

    pub fn clear_loaded_data_names(&mut self) {
        self.loaded.clear();
    }

    /// Feed `loader` with every resource whose filtered name matches `supported_names`.
    ///
    /// The pattern must match the whole bare name. Providers are visited in
    /// registration order while the loader still accepts data; the result is
    /// true when at least one resource was loaded. Resources loaded before a
    /// failure stay loaded.
    pub fn feed(
        &mut self,
        supported_names: &str,
        loader: &mut dyn DataLoader,
    ) -> Result<bool, FeedError> {
        let anchored = format!("^(?:{supported_names})$");
        let supported = Regex::new(&anchored).map_err(|source| {
            ProviderError::new(
                "manager",
                DataError::InvalidPattern {
                    pattern: supported_names.to_string(),
                    source,
                },
            )
        })?;

        let mut tracking = TrackingLoader {
            inner: loader,
            loaded: &mut self.loaded,
            stopped: false,
        };

        let mut loaded = false;
        let mut errors = Vec::new();
        for provider in &self.providers {
            if tracking.stopped || !tracking.inner.still_accepts_data() {
                break;
            }

            log::debug!("feeding from provider {}", provider.id());
            match provider.feed(&supported, &mut tracking, &self.filters) {
                Ok(found) => loaded |= found,
                Err(error) => {
                    let error = ProviderError::new(provider.id(), error);
                    if matches!(self.error_policy, ErrorPolicy::FastFail) {
                        return Err(FeedError::single(error));
                    }
                    log::warn!("{error}");
                    errors.push(error);
                }
            }
        }

        if errors.is_empty() {
            Ok(loaded)
        } else {
            Err(FeedError { errors })
        }
    }
}

/// Loader wrapper recording loaded names and stop requests.
struct TrackingLoader<'a> {
    inner: &'a mut dyn DataLoader,
    loaded: &'a mut BTreeSet<String>,
    stopped: bool,
}

impl DataLoader for TrackingLoader<'_> {
    fn still_accepts_data(&self) -> bool {
        !self.stopped && self.inner.still_accepts_data()
    }

    fn load_data(&mut self, input: &mut dyn Read, name: &str) -> Result<LoadControl, LoaderError> {
        let control = self.inner.load_data(input, name)?;
        self.loaded.insert(name.to_string());
        if control == LoadControl::Stop {
            self.stopped = true;
        }
        Ok(control)
    }
}
