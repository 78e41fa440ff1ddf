//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::{DataError, FeedError, ProviderError, Stage};

/// A diagnostic wrapper for data loading errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct DataDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<DataError>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

fn help_for(stage: Stage) -> &'static str {
    match stage {
        Stage::Resolve => "Check the data search path, URLs and parser column configuration",
        Stage::Open => "Check that the data roots and archives are readable",
        Stage::Filter => "The compressed resource is damaged or not in the expected format",
        Stage::Load => "The loader rejected the resource content",
        Stage::Parse => "The resource does not follow the expected IERS layout",
    }
}

impl From<ProviderError> for DataDiagnostic {
    fn from(e: ProviderError) -> Self {
        DataDiagnostic {
            message: format!("[{}] on '{}'", e.stage, e.provider),
            help: Some(help_for(e.stage).into()),
            source: Some(e.error),
            severity: Severity::Error,
        }
    }
}

impl From<DataError> for DataDiagnostic {
    fn from(e: DataError) -> Self {
        let stage = e.stage();
        DataDiagnostic {
            message: format!("[{stage}] {e}"),
            help: Some(help_for(stage).into()),
            source: Some(e),
            severity: Severity::Error,
        }
    }
}

impl From<FeedError> for DataDiagnostic {
    fn from(feed: FeedError) -> Self {
        let first = feed.errors.into_iter().next();
        if let Some(e) = first {
            DataDiagnostic::from(e)
        } else {
            DataDiagnostic {
                message: "Unknown data loading error".into(),
                source: None,
                help: None,
                severity: Severity::Error,
            }
        }
    }
}

impl From<FeedError> for miette::Report {
    fn from(feed: FeedError) -> Self {
        miette::Report::new(DataDiagnostic::from(feed))
    }
}
