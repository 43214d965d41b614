//! Admin-managed storefront content: FAQs, help articles, testimonials and
//! hero carousel images.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ValidationError, default_true, optional_text, require_text};
use crate::types::{FaqId, HelpArticleId, HeroImageId, TestimonialId};

/// Categories offered for FAQs.
pub const FAQ_CATEGORIES: &[&str] = &[
    "general", "shipping", "returns", "payments", "products", "accounts",
];

/// Category used when an input leaves it blank.
pub const DEFAULT_CATEGORY: &str = "general";

// --- FAQs ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Faq {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaqInput {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl FaqInput {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the question or answer is blank or
    /// the category is not one of [`FAQ_CATEGORIES`].
    pub fn validate(self) -> Result<Self, ValidationError> {
        let question = require_text(&self.question, "question", "Please enter a question")?;
        let answer = require_text(&self.answer, "answer", "Please enter an answer")?;
        let category = optional_text(self.category.as_deref())
            .map_or_else(|| DEFAULT_CATEGORY.to_owned(), |c| c.to_lowercase());
        if !FAQ_CATEGORIES.contains(&category.as_str()) {
            return Err(ValidationError::new(
                "category",
                format!("Unknown FAQ category: {category}"),
            ));
        }
        Ok(Self {
            question,
            answer,
            category: Some(category),
            is_active: self.is_active,
        })
    }

    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}

// --- Help articles ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct HelpArticle {
    pub id: HelpArticleId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub display_order: i32,
    pub is_published: bool,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HelpArticleInput {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

/// A help article input ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidHelpArticle {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub is_published: bool,
}

impl HelpArticleInput {
    /// Derives the slug from the title when none is given.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title or content is blank, or the
    /// slug has no usable characters.
    pub fn validate(self) -> Result<ValidHelpArticle, ValidationError> {
        let title = require_text(&self.title, "title", "Please enter a title")?;
        let content = require_text(&self.content, "content", "Please enter article content")?;
        let slug_source = optional_text(self.slug.as_deref()).unwrap_or_else(|| title.clone());
        let slug = generate_slug(&slug_source);
        if slug.is_empty() {
            return Err(ValidationError::new(
                "slug",
                "Slug must contain letters or numbers",
            ));
        }
        Ok(ValidHelpArticle {
            title,
            slug,
            content,
            category: optional_text(self.category.as_deref())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            subcategory: optional_text(self.subcategory.as_deref()),
            is_published: self.is_published,
        })
    }
}

/// URL slug: lowercase, runs of anything outside `[a-z0-9]` become one `-`,
/// no leading or trailing `-`.
///
/// ```rust
/// # use velora_core::generate_slug;
/// assert_eq!(generate_slug("How do I track my order?"), "how-do-i-track-my-order");
/// assert_eq!(generate_slug("  --Returns & Refunds-- "), "returns-refunds");
/// ```
#[must_use]
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

// --- Testimonials ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Testimonial {
    pub id: TestimonialId,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_image_url: Option<String>,
    pub rating: i32,
    pub testimonial_text: String,
    pub product_purchased: Option<String>,
    pub is_approved: bool,
    pub is_featured: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestimonialInput {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_image_url: Option<String>,
    pub rating: Option<i32>,
    pub testimonial_text: String,
    pub product_purchased: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
}

/// Rating given when the input leaves it out.
pub const DEFAULT_RATING: i32 = 5;

impl TestimonialInput {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or text is blank or the
    /// rating is outside 1..=5.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let customer_name = require_text(
            &self.customer_name,
            "customer_name",
            "Please enter the customer name",
        )?;
        let testimonial_text = require_text(
            &self.testimonial_text,
            "testimonial_text",
            "Please enter the testimonial text",
        )?;
        let rating = self.rating.unwrap_or(DEFAULT_RATING);
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::new(
                "rating",
                "Rating must be between 1 and 5",
            ));
        }
        Ok(Self {
            customer_name,
            customer_email: optional_text(self.customer_email.as_deref()),
            customer_image_url: optional_text(self.customer_image_url.as_deref()),
            rating: Some(rating),
            testimonial_text,
            product_purchased: optional_text(self.product_purchased.as_deref()),
            is_approved: self.is_approved,
            is_featured: self.is_featured,
            display_order: self.display_order,
        })
    }
}

// --- Hero carousel ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct HeroImage {
    pub id: HeroImageId,
    pub image_url: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeroImageInput {
    pub image_url: String,
}

impl HeroImageInput {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the URL is blank or not http(s).
    pub fn validate(self) -> Result<Self, ValidationError> {
        let image_url = require_text(&self.image_url, "image_url", "Please enter an image URL")?;
        if !(image_url.starts_with("https://") || image_url.starts_with("http://")) {
            return Err(ValidationError::new(
                "image_url",
                "Image URL must start with http:// or https://",
            ));
        }
        Ok(Self { image_url })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Shipping Policy"), "shipping-policy");
        assert_eq!(generate_slug("COD & UPI payments"), "cod-upi-payments");
        assert_eq!(generate_slug("Größe"), "gr-e");
        assert_eq!(generate_slug("???"), "");
    }

    #[test]
    fn test_faq_input() {
        let faq = FaqInput {
            question: " Do you ship to Nepal? ".to_owned(),
            answer: "Yes.".to_owned(),
            category: Some("Shipping".to_owned()),
            is_active: true,
        }
        .validate()
        .unwrap();
        assert_eq!(faq.question, "Do you ship to Nepal?");
        assert_eq!(faq.category(), "shipping");

        let err = FaqInput {
            question: "Q".to_owned(),
            answer: "  ".to_owned(),
            category: None,
            is_active: true,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "answer");

        let err = FaqInput {
            question: "Q".to_owned(),
            answer: "A".to_owned(),
            category: Some("gossip".to_owned()),
            is_active: true,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "category");
    }

    #[test]
    fn test_help_article_slug_from_title() {
        let article = HelpArticleInput {
            title: "Cancelling an Order".to_owned(),
            slug: None,
            content: "Go to My Orders.".to_owned(),
            category: None,
            subcategory: Some(" ".to_owned()),
            is_published: false,
        }
        .validate()
        .unwrap();
        assert_eq!(article.slug, "cancelling-an-order");
        assert_eq!(article.category, DEFAULT_CATEGORY);
        assert_eq!(article.subcategory, None);
        assert!(!article.is_published);
    }

    #[test]
    fn test_testimonial_rating_bounds() {
        let base = TestimonialInput {
            customer_name: "Ravi".to_owned(),
            customer_email: None,
            customer_image_url: None,
            rating: None,
            testimonial_text: "Lovely fabric.".to_owned(),
            product_purchased: None,
            is_approved: false,
            is_featured: false,
            display_order: 0,
        };
        assert_eq!(base.clone().validate().unwrap().rating, Some(DEFAULT_RATING));

        let mut bad = base;
        bad.rating = Some(6);
        assert_eq!(bad.validate().unwrap_err().field(), "rating");
    }

    #[test]
    fn test_hero_image_url() {
        assert!(HeroImageInput { image_url: " ".to_owned() }.validate().is_err());
        assert!(HeroImageInput { image_url: "ftp://x".to_owned() }.validate().is_err());
        assert!(
            HeroImageInput { image_url: "https://cdn.example.in/a.jpg".to_owned() }
                .validate()
                .is_ok()
        );
    }
}
