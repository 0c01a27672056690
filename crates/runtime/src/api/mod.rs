//! Public API surface consumed by transports.
mod errors;
mod results;

pub use errors::{Result, RuntimeError};
pub use results::SubmitResult;
