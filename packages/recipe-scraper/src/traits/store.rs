//! Recipe persistence contract.
//!
//! The engine only needs a duplicate check and an insert. `get_by_url` and
//! `count` exist for callers and tests.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::recipe::{ExtractedRecipe, ImportedRecipe, RecipeId};

/// Storage for accepted recipes, unique by source URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Whether a recipe with exactly this source URL is stored.
    async fn exists_by_url(&self, url: &str) -> StoreResult<bool>;

    /// Store a recipe and return its id.
    ///
    /// Fails with [`StoreError::Duplicate`](crate::error::StoreError::Duplicate)
    /// when the source URL is already present, even if a prior
    /// `exists_by_url` said otherwise.
    async fn insert(&self, recipe: &ExtractedRecipe) -> StoreResult<RecipeId>;

    /// Fetch a stored recipe by source URL.
    async fn get_by_url(&self, url: &str) -> StoreResult<Option<ImportedRecipe>>;

    /// Number of stored recipes.
    async fn count(&self) -> StoreResult<usize>;
}
