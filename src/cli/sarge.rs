use std::convert::Infallible;

use sarge::ArgumentType;

use crate::cli::PathList;

impl ArgumentType for PathList {
    type Error = Infallible;

    const REPEATABLE: bool = true;

    fn from_value(val: Option<&str>) -> sarge::ArgResult<Self> {
        let mut paths = Vec::new();
        if let Some(v) = val {
            for token in v.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                paths.push(token.to_string());
            }
        }
        Some(Ok(PathList(paths)))
    }

    fn default_value() -> Option<Self> {
        Some(PathList::default())
    }
}
