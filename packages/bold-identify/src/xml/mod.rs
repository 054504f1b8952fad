//! XML utilities for navigating identification responses.

mod utils;

pub use utils::*;
