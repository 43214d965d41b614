//! Published content and the theme.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use velora_core::{Faq, HelpArticle, Testimonial, ThemeColors};

use crate::db::{ContentRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// `?category=` filter; blank or `all` means every category.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl CategoryQuery {
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TestimonialQuery {
    #[serde(default)]
    pub featured: bool,
}

/// `GET /api/faqs?category`
#[instrument(skip(state))]
pub async fn faqs(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Faq>>> {
    let faqs = ContentRepository::new(state.pool())
        .faqs(query.category())
        .await?;
    Ok(Json(faqs))
}

/// `GET /api/help?category`
#[instrument(skip(state))]
pub async fn help_articles(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<HelpArticle>>> {
    let articles = ContentRepository::new(state.pool())
        .help_articles(query.category())
        .await?;
    Ok(Json(articles))
}

/// `GET /api/help/{slug}`; counts a view.
#[instrument(skip(state))]
pub async fn help_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<HelpArticle>> {
    let article = ContentRepository::new(state.pool())
        .view_help_article(&slug)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => AppError::NotFound("Help article".to_owned()),
            other => other.into(),
        })?;
    Ok(Json(article))
}

/// `GET /api/testimonials?featured`
#[instrument(skip(state))]
pub async fn testimonials(
    State(state): State<AppState>,
    Query(query): Query<TestimonialQuery>,
) -> Result<Json<Vec<Testimonial>>> {
    let testimonials = ContentRepository::new(state.pool())
        .testimonials(query.featured)
        .await?;
    Ok(Json(testimonials))
}

/// Theme colours and the matching `:root` stylesheet.
#[derive(Debug, Serialize)]
pub struct Theme {
    pub colors: ThemeColors,
    pub css: String,
}

impl From<ThemeColors> for Theme {
    fn from(colors: ThemeColors) -> Self {
        let css = format!(":root {{\n{}\n}}", colors.css_variables());
        Self { colors, css }
    }
}

/// `GET /api/theme`
#[instrument(skip(state))]
pub async fn theme(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let settings = state.settings().get(state.pool()).await?;
    let theme = Theme::from(ThemeColors::from_settings(&settings));
    Ok((
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Json(theme),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter() {
        let query = |c: Option<&str>| CategoryQuery {
            category: c.map(str::to_owned),
        };
        assert_eq!(query(None).category(), None);
        assert_eq!(query(Some("  ")).category(), None);
        assert_eq!(query(Some("All")).category(), None);
        assert_eq!(query(Some(" shipping ")).category(), Some("shipping"));
    }

    #[test]
    fn test_theme_stylesheet() {
        let theme = Theme::from(ThemeColors::default());
        assert!(theme.css.starts_with(":root {\n--primary-bg-color: #0A8DB0;"));
        assert!(theme.css.ends_with("--header-bg-color: #ffffff;\n}"));
    }
}
