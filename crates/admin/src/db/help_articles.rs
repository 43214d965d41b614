//! Help article repository.

use sqlx::PgPool;

use velora_core::ordering;
use velora_core::table::{Order, Table};
use velora_core::{HelpArticle, HelpArticleId, ListQuery, ValidHelpArticle};

use super::RepositoryError;

const HELP_ARTICLES: Table = Table::new("help_articles");

const DUPLICATE_SLUG: &str = "An article with this slug already exists";

/// Repository for help article database operations.
pub struct HelpArticleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HelpArticleRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Articles matching `query`, by category then display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<HelpArticle>, RepositoryError> {
        let articles: Vec<HelpArticle> = HELP_ARTICLES
            .select("*")
            .order("category", Order::Asc)
            .order("display_order", Order::Asc)
            .fetch_all(self.pool)
            .await?;
        Ok(query.apply(articles))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no article has this id.
    pub async fn get(&self, id: HelpArticleId) -> Result<HelpArticle, RepositoryError> {
        HELP_ARTICLES
            .select("*")
            .eq("id", id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    pub async fn create(&self, article: &ValidHelpArticle) -> Result<HelpArticle, RepositoryError> {
        let count = HELP_ARTICLES
            .select("id")
            .eq("category", article.category.as_str())
            .count(self.pool)
            .await?;
        HELP_ARTICLES
            .insert()
            .set("title", article.title.as_str())
            .set("slug", article.slug.as_str())
            .set("content", article.content.as_str())
            .set("category", article.category.as_str())
            .set("subcategory", article.subcategory.as_deref())
            .set("is_published", article.is_published)
            .set("display_order", ordering::next_display_order(count))
            .returning("*")
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::unique(e, DUPLICATE_SLUG))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no article has this id, or
    /// `RepositoryError::Conflict` if the slug is already taken.
    pub async fn update(
        &self,
        id: HelpArticleId,
        article: &ValidHelpArticle,
    ) -> Result<HelpArticle, RepositoryError> {
        HELP_ARTICLES
            .update()
            .set("title", article.title.as_str())
            .set("slug", article.slug.as_str())
            .set("content", article.content.as_str())
            .set("category", article.category.as_str())
            .set("subcategory", article.subcategory.as_deref())
            .set("is_published", article.is_published)
            .set_now("updated_at")
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::unique(e, DUPLICATE_SLUG))?
            .ok_or(RepositoryError::NotFound)
    }

    /// Flip `is_published`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no article has this id.
    pub async fn toggle_published(
        &self,
        id: HelpArticleId,
    ) -> Result<HelpArticle, RepositoryError> {
        HELP_ARTICLES
            .update()
            .toggle("is_published")
            .set_now("updated_at")
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no article has this id.
    pub async fn delete(&self, id: HelpArticleId) -> Result<(), RepositoryError> {
        let deleted = HELP_ARTICLES
            .delete()
            .eq("id", id)
            .execute(self.pool)
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
