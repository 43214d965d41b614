//! FAQ repository.

use sqlx::PgPool;

use velora_core::ordering::{self, MoveDirection};
use velora_core::table::{Order, Table};
use velora_core::{Faq, FaqId, FaqInput, ListQuery};

use super::RepositoryError;

const FAQS: Table = Table::new("faqs");

#[derive(sqlx::FromRow)]
struct FaqOrderRow {
    id: FaqId,
}

/// Repository for FAQ database operations.
pub struct FaqRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FaqRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// FAQs matching `query`, by display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Faq>, RepositoryError> {
        let faqs: Vec<Faq> = FAQS
            .select("*")
            .order("display_order", Order::Asc)
            .order("created_at", Order::Asc)
            .fetch_all(self.pool)
            .await?;
        Ok(query.apply(faqs))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no FAQ has this id.
    pub async fn get(&self, id: FaqId) -> Result<Faq, RepositoryError> {
        FAQS.select("*")
            .eq("id", id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Insert at the end of the list (`display_order` = current count).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, faq: &FaqInput) -> Result<Faq, RepositoryError> {
        let count = FAQS.select("id").count(self.pool).await?;
        let faq = FAQS
            .insert()
            .set("question", faq.question.as_str())
            .set("answer", faq.answer.as_str())
            .set("category", faq.category())
            .set("is_active", faq.is_active)
            .set("display_order", ordering::next_display_order(count))
            .returning("*")
            .fetch_one(self.pool)
            .await?;
        Ok(faq)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no FAQ has this id.
    pub async fn update(&self, id: FaqId, faq: &FaqInput) -> Result<Faq, RepositoryError> {
        FAQS.update()
            .set("question", faq.question.as_str())
            .set("answer", faq.answer.as_str())
            .set("category", faq.category())
            .set("is_active", faq.is_active)
            .set_now("updated_at")
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Flip `is_active`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no FAQ has this id.
    pub async fn toggle_active(&self, id: FaqId) -> Result<Faq, RepositoryError> {
        FAQS.update()
            .toggle("is_active")
            .set_now("updated_at")
            .eq("id", id)
            .returning("*")
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Swap a FAQ one place up or down and renumber the list `0..n`.
    ///
    /// Moving past either end is a no-op. Returns whether anything moved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no FAQ has this id.
    pub async fn move_step(
        &self,
        id: FaqId,
        direction: MoveDirection,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let rows: Vec<FaqOrderRow> = FAQS
            .select("id")
            .order("display_order", Order::Asc)
            .order("created_at", Order::Asc)
            .fetch_all(&mut *tx)
            .await?;
        let ids: Vec<FaqId> = rows.into_iter().map(|r| r.id).collect();

        let from = ordering::position_of(&ids, &id).ok_or(RepositoryError::NotFound)?;
        let Some(to) = ordering::step(from, direction, ids.len()) else {
            return Ok(false);
        };
        let Some(renumbered) = ordering::reorder(&ids, from, to) else {
            return Ok(false);
        };

        for (faq_id, display_order) in renumbered {
            FAQS.update()
                .set("display_order", display_order)
                .eq("id", faq_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no FAQ has this id.
    pub async fn delete(&self, id: FaqId) -> Result<(), RepositoryError> {
        let deleted = FAQS.delete().eq("id", id).execute(self.pool).await?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
