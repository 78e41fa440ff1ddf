//! Contract between providers and the code consuming data.

use std::io::Read;

use crate::error::LoaderError;

/// What a loader wants after consuming a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadControl {
    /// Keep feeding matching resources
    #[default]
    Continue,
    /// Stop the current feed
    Stop,
}

/// Consumer of the resources found by providers.
///
/// Providers only call [`load_data`](DataLoader::load_data) for resources
/// whose filtered name matches the requested pattern, and check
/// [`still_accepts_data`](DataLoader::still_accepts_data) before each one.
pub trait DataLoader {
    /// Whether the loader wants more resources.
    fn still_accepts_data(&self) -> bool {
        true
    }

    /// Consume one resource.
    ///
    /// `name` is the filtered bare name of the resource. Errors are wrapped
    /// by the provider with the resource name while keeping the original
    /// error as the source.
    fn load_data(&mut self, input: &mut dyn Read, name: &str) -> Result<LoadControl, LoaderError>;
}

impl<L: DataLoader + ?Sized> DataLoader for &mut L {
    fn still_accepts_data(&self) -> bool {
        (**self).still_accepts_data()
    }

    fn load_data(&mut self, input: &mut dyn Read, name: &str) -> Result<LoadControl, LoaderError> {
        (**self).load_data(input, name)
    }
}

/// Loader backed by a closure, for callers that never stop early.
pub struct FnLoader<F>(pub F);

impl<F> DataLoader for FnLoader<F>
where
    F: FnMut(&mut dyn Read, &str) -> Result<(), LoaderError>,
{
    fn load_data(&mut self, input: &mut dyn Read, name: &str) -> Result<LoadControl, LoaderError> {
        (self.0)(input, name)?;
        Ok(LoadControl::Continue)
    }
}
