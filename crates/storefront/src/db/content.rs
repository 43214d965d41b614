//! Published content: FAQs, help articles and testimonials.

use sqlx::PgPool;

use velora_core::table::{Order, Table};
use velora_core::{Faq, HelpArticle, Testimonial};

use super::RepositoryError;

const FAQS: Table = Table::new("faqs");
const HELP_ARTICLES: Table = Table::new("help_articles");
const TESTIMONIALS: Table = Table::new("testimonials");

/// Read access to admin-managed content, limited to what shoppers may see.
pub struct ContentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active FAQs by display order, optionally in one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn faqs(&self, category: Option<&str>) -> Result<Vec<Faq>, RepositoryError> {
        let mut select = FAQS.select("*").eq("is_active", true);
        if let Some(category) = category {
            select = select.eq("category", category);
        }
        let faqs = select
            .order("display_order", Order::Asc)
            .order("created_at", Order::Asc)
            .fetch_all(self.pool)
            .await?;
        Ok(faqs)
    }

    /// Published help articles, optionally in one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn help_articles(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<HelpArticle>, RepositoryError> {
        let mut select = HELP_ARTICLES.select("*").eq("is_published", true);
        if let Some(category) = category {
            select = select.eq("category", category);
        }
        let articles = select
            .order("display_order", Order::Asc)
            .order("title", Order::Asc)
            .fetch_all(self.pool)
            .await?;
        Ok(articles)
    }

    /// A published article by slug, counting the view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no published article has this
    /// slug.
    pub async fn view_help_article(&self, slug: &str) -> Result<HelpArticle, RepositoryError> {
        HELP_ARTICLES
            .update()
            .increment("views_count", 1)
            .eq("slug", slug)
            .eq("is_published", true)
            .returning("*")
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Approved testimonials; `featured_only` narrows to featured ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn testimonials(
        &self,
        featured_only: bool,
    ) -> Result<Vec<Testimonial>, RepositoryError> {
        let mut select = TESTIMONIALS.select("*").eq("is_approved", true);
        if featured_only {
            select = select.eq("is_featured", true);
        }
        let testimonials = select
            .order("display_order", Order::Asc)
            .order("created_at", Order::Desc)
            .fetch_all(self.pool)
            .await?;
        Ok(testimonials)
    }
}
