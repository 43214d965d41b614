//! List filtering shared by the admin screens.
//!
//! Each admin list loads its table, then narrows the rows with a
//! [`ListQuery`]: a case-insensitive search over a few text fields, an
//! optional category, and a status label such as `active` or `draft`.
//! `"all"` or an empty value disables a filter.

use serde::Deserialize;

use crate::models::{Coupon, Faq, HelpArticle, HeroImage, SystemLog, Testimonial};

/// A row that can be narrowed by a [`ListQuery`].
pub trait Listable {
    /// Text fields the search box matches against.
    fn search_fields(&self) -> impl Iterator<Item = &str>;

    fn category(&self) -> Option<&str> {
        None
    }

    /// Status label compared against `ListQuery::status`.
    fn status(&self) -> &str;
}

/// Query-string filters for an admin list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "level")]
    pub status: Option<String>,
}

fn active_value(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl ListQuery {
    #[must_use]
    pub fn search(term: &str) -> Self {
        Self {
            search: Some(term.to_owned()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_owned());
        self
    }

    /// Whether a single row passes every active filter.
    #[must_use]
    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        if let Some(term) = active_value(self.search.as_deref()) {
            let term = term.to_lowercase();
            if !item
                .search_fields()
                .any(|field| field.to_lowercase().contains(&term))
            {
                return false;
            }
        }
        if let Some(category) = active_value(self.category.as_deref())
            && !item
                .category()
                .is_some_and(|c| c.eq_ignore_ascii_case(category))
        {
            return false;
        }
        if let Some(status) = active_value(self.status.as_deref())
            && !item.status().eq_ignore_ascii_case(status)
        {
            return false;
        }
        true
    }

    /// Keep the rows that match, preserving order.
    #[must_use]
    pub fn apply<T: Listable>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

const fn active_label(is_active: bool) -> &'static str {
    if is_active { "active" } else { "inactive" }
}

impl Listable for Coupon {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.code.as_str(), self.description.as_deref().unwrap_or_default()].into_iter()
    }

    fn status(&self) -> &str {
        active_label(self.is_active)
    }
}

impl Listable for Faq {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.question.as_str(), self.answer.as_str()].into_iter()
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn status(&self) -> &str {
        active_label(self.is_active)
    }
}

impl Listable for HelpArticle {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.title.as_str(), self.content.as_str()].into_iter()
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn status(&self) -> &str {
        if self.is_published { "published" } else { "draft" }
    }
}

impl Listable for Testimonial {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.customer_name.as_str(), self.testimonial_text.as_str()].into_iter()
    }

    fn status(&self) -> &str {
        if self.is_approved { "approved" } else { "pending" }
    }
}

impl Listable for HeroImage {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.image_url.as_str())
    }

    fn status(&self) -> &str {
        active_label(self.is_active)
    }
}

impl Listable for SystemLog {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.message.as_str(), self.category.as_str()].into_iter()
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn status(&self) -> &str {
        self.level.as_str()
    }
}
