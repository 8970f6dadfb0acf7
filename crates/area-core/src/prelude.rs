//! Prelude for common imports used throughout all AREA crates

pub use crate::error::{ApiFailure, Error, Result};
pub use tracing::{debug, error, info, instrument, trace, warn};
