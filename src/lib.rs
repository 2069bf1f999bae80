pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;

pub use domain::*;
pub use error::LedgerError;
