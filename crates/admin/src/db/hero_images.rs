//! Hero carousel image repository.

use sqlx::PgPool;

use velora_core::ordering;
use velora_core::table::{Order, Table};
use velora_core::{HeroImage, HeroImageId, HeroImageInput};

use super::RepositoryError;

const HERO_IMAGES: Table = Table::new("hero_carousel_images");

/// Repository for hero carousel images.
pub struct HeroImageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HeroImageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All images by display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<HeroImage>, RepositoryError> {
        let images = HERO_IMAGES
            .select("*")
            .order("display_order", Order::Asc)
            .order("created_at", Order::Asc)
            .fetch_all(self.pool)
            .await?;
        Ok(images)
    }

    /// Append an active image after the current last one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add(&self, input: &HeroImageInput) -> Result<HeroImage, RepositoryError> {
        let existing = self.list().await?;
        let display_order = ordering::next_after_max(existing.iter().map(|i| i.display_order));
        let image = HERO_IMAGES
            .insert()
            .set("image_url", input.image_url.as_str())
            .set("display_order", display_order)
            .set("is_active", true)
            .returning("*")
            .fetch_one(self.pool)
            .await?;
        Ok(image)
    }

    /// Flip `is_active`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no image has this id.
    pub async fn toggle_active(&self, id: HeroImageId) -> Result<HeroImage, RepositoryError> {
        HERO_IMAGES
            .update()
            .toggle("is_active")
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Move the image at position `from` to `to` and renumber every image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if either position is out of range.
    pub async fn reorder(&self, from: usize, to: usize) -> Result<Vec<HeroImage>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let images: Vec<HeroImage> = HERO_IMAGES
            .select("*")
            .order("display_order", Order::Asc)
            .order("created_at", Order::Asc)
            .fetch_all(&mut *tx)
            .await?;
        let ids: Vec<HeroImageId> = images.iter().map(|i| i.id).collect();
        let renumbered = ordering::reorder(&ids, from, to).ok_or(RepositoryError::NotFound)?;

        for (id, display_order) in renumbered {
            HERO_IMAGES
                .update()
                .set("display_order", display_order)
                .eq("id", id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        self.list().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no image has this id.
    pub async fn delete(&self, id: HeroImageId) -> Result<(), RepositoryError> {
        let deleted = HERO_IMAGES
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
