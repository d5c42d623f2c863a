//! Command line interface.

pub mod build;
pub mod check;
pub mod run;
pub mod utils;
