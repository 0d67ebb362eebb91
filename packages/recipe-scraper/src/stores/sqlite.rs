//! SQLite recipe store.
//!
//! A file-based backend for local runs and single-host deployments.
//! Ingredient and step lists are stored as JSON arrays; `source_url`
//! carries a `UNIQUE` constraint.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::RecipeStore;
use crate::types::recipe::{ExtractedRecipe, ImportedRecipe, RecipeId};

fn backend<E>(e: E) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::Backend(Box::new(e))
}

/// SQLite-based recipe store.
pub struct SqliteRecipeStore {
    pool: SqlitePool,
}

impl SqliteRecipeStore {
    /// Connect and run migrations.
    ///
    /// # Example URLs
    /// - `sqlite:./recipes.db?mode=rwc` - Create if not exists
    /// - `sqlite::memory:` - Ephemeral, see [`in_memory`](Self::in_memory)
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(backend)?;

        Self::with_pool(pool).await
    }

    /// In-memory store. A single connection, since every SQLite memory
    /// connection is its own database.
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(backend)?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                source_url TEXT NOT NULL UNIQUE,
                source_site TEXT NOT NULL,
                description TEXT,
                image_url TEXT,
                ingredients TEXT NOT NULL DEFAULT '[]',
                steps TEXT NOT NULL DEFAULT '[]',
                prep_time TEXT,
                cook_time TEXT,
                servings TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_recipes_source_site ON recipes(source_site);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i64,
    title: String,
    source_url: String,
    source_site: String,
    description: Option<String>,
    image_url: Option<String>,
    ingredients: String,
    steps: String,
    prep_time: Option<String>,
    cook_time: Option<String>,
    servings: Option<String>,
}

impl RecipeRow {
    fn into_imported(self) -> StoreResult<ImportedRecipe> {
        let ingredients: Vec<String> = serde_json::from_str(&self.ingredients).map_err(backend)?;
        let steps: Vec<String> = serde_json::from_str(&self.steps).map_err(backend)?;

        Ok(ImportedRecipe {
            id: self.id,
            recipe: ExtractedRecipe {
                title: self.title,
                source_url: self.source_url,
                source_site: self.source_site,
                description: self.description,
                image_url: self.image_url,
                ingredients,
                steps,
                prep_time: self.prep_time,
                cook_time: self.cook_time,
                servings: self.servings,
            },
        })
    }
}

#[async_trait]
impl RecipeStore for SqliteRecipeStore {
    async fn exists_by_url(&self, url: &str) -> StoreResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE source_url = ?")
            .bind(url)
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;

        Ok(count > 0)
    }

    async fn insert(&self, recipe: &ExtractedRecipe) -> StoreResult<RecipeId> {
        let ingredients = serde_json::to_string(&recipe.ingredients).map_err(backend)?;
        let steps = serde_json::to_string(&recipe.steps).map_err(backend)?;

        let result = sqlx::query(
            r#"
            INSERT INTO recipes (
                title, source_url, source_site, description, image_url,
                ingredients, steps, prep_time, cook_time, servings, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&recipe.title)
        .bind(&recipe.source_url)
        .bind(&recipe.source_site)
        .bind(&recipe.description)
        .bind(&recipe.image_url)
        .bind(ingredients)
        .bind(steps)
        .bind(&recipe.prep_time)
        .bind(&recipe.cook_time)
        .bind(&recipe.servings)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Duplicate {
                    url: recipe.source_url.clone(),
                })
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn get_by_url(&self, url: &str) -> StoreResult<Option<ImportedRecipe>> {
        let row: Option<RecipeRow> = sqlx::query_as(
            r#"
            SELECT id, title, source_url, source_site, description, image_url,
                   ingredients, steps, prep_time, cook_time, servings
            FROM recipes
            WHERE source_url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(RecipeRow::into_imported).transpose()
    }

    async fn count(&self) -> StoreResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;

        Ok(count.max(0) as usize)
    }
}
