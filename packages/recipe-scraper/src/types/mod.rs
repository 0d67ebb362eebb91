//! Recipe and search data types.

pub mod recipe;
pub mod search;
