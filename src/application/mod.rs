// Application layer - session ownership, input validation and reports.
// The domain layer stays free of string parsing and logging.

mod reporting;
mod service;

pub use reporting::*;
pub use service::*;
