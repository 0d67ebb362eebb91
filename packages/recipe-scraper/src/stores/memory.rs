//! In-memory recipe store for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::RecipeStore;
use crate::types::recipe::{ExtractedRecipe, ImportedRecipe, RecipeId};

/// Recipes keyed by source URL.
///
/// Data is lost on drop. The write lock makes check-and-insert atomic, so
/// concurrent inserts of one URL yield exactly one success.
pub struct MemoryRecipeStore {
    recipes: RwLock<HashMap<String, ImportedRecipe>>,
    next_id: AtomicI64,
}

impl Default for MemoryRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self {
            recipes: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// All stored recipes, ordered by id.
    pub fn all(&self) -> Vec<ImportedRecipe> {
        let mut recipes: Vec<ImportedRecipe> = self
            .recipes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        recipes.sort_by_key(|r| r.id);
        recipes
    }

    /// Remove everything.
    pub fn clear(&self) {
        self.recipes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn exists_by_url(&self, url: &str) -> StoreResult<bool> {
        Ok(self
            .recipes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(url))
    }

    async fn insert(&self, recipe: &ExtractedRecipe) -> StoreResult<RecipeId> {
        let mut recipes = self.recipes.write().unwrap_or_else(|e| e.into_inner());
        if recipes.contains_key(&recipe.source_url) {
            return Err(StoreError::Duplicate {
                url: recipe.source_url.clone(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        recipes.insert(
            recipe.source_url.clone(),
            ImportedRecipe {
                id,
                recipe: recipe.clone(),
            },
        );
        Ok(id)
    }

    async fn get_by_url(&self, url: &str) -> StoreResult<Option<ImportedRecipe>> {
        Ok(self
            .recipes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(url)
            .cloned())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.recipes.read().unwrap_or_else(|e| e.into_inner()).len())
    }
}
