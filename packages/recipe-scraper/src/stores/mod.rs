//! Recipe store implementations.
//!
//! Available backends:
//! - `MemoryRecipeStore` - In-memory storage (always available)
//! - `SqliteRecipeStore` - SQLite file-based storage (requires `sqlite` feature)

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryRecipeStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRecipeStore;
