//! Testimonial repository.

use sqlx::PgPool;

use velora_core::table::{Order, Table};
use velora_core::{ListQuery, Testimonial, TestimonialId, TestimonialInput};

use super::RepositoryError;

const TESTIMONIALS: Table = Table::new("testimonials");

/// Repository for testimonial database operations.
pub struct TestimonialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TestimonialRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Testimonials matching `query`, by display order then newest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Testimonial>, RepositoryError> {
        let testimonials: Vec<Testimonial> = TESTIMONIALS
            .select("*")
            .order("display_order", Order::Asc)
            .order("created_at", Order::Desc)
            .fetch_all(self.pool)
            .await?;
        Ok(query.apply(testimonials))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &TestimonialInput) -> Result<Testimonial, RepositoryError> {
        let testimonial = TESTIMONIALS
            .insert()
            .set("customer_name", input.customer_name.as_str())
            .set("customer_email", input.customer_email.as_deref())
            .set("customer_image_url", input.customer_image_url.as_deref())
            .set("rating", input.rating)
            .set("testimonial_text", input.testimonial_text.as_str())
            .set("product_purchased", input.product_purchased.as_deref())
            .set("is_approved", input.is_approved)
            .set("is_featured", input.is_featured)
            .set("display_order", input.display_order)
            .returning("*")
            .fetch_one(self.pool)
            .await?;
        Ok(testimonial)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no testimonial has this id.
    pub async fn update(
        &self,
        id: TestimonialId,
        input: &TestimonialInput,
    ) -> Result<Testimonial, RepositoryError> {
        TESTIMONIALS
            .update()
            .set("customer_name", input.customer_name.as_str())
            .set("customer_email", input.customer_email.as_deref())
            .set("customer_image_url", input.customer_image_url.as_deref())
            .set("rating", input.rating)
            .set("testimonial_text", input.testimonial_text.as_str())
            .set("product_purchased", input.product_purchased.as_deref())
            .set("is_approved", input.is_approved)
            .set("is_featured", input.is_featured)
            .set("display_order", input.display_order)
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Flip a boolean column (`is_approved` or `is_featured`).
    async fn toggle(
        &self,
        id: TestimonialId,
        column: &'static str,
    ) -> Result<Testimonial, RepositoryError> {
        TESTIMONIALS
            .update()
            .toggle(column)
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no testimonial has this id.
    pub async fn toggle_approved(&self, id: TestimonialId) -> Result<Testimonial, RepositoryError> {
        self.toggle(id, "is_approved").await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no testimonial has this id.
    pub async fn toggle_featured(&self, id: TestimonialId) -> Result<Testimonial, RepositoryError> {
        self.toggle(id, "is_featured").await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no testimonial has this id.
    pub async fn delete(&self, id: TestimonialId) -> Result<(), RepositoryError> {
        let deleted = TESTIMONIALS
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
