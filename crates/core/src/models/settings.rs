//! Key/value site settings.
//!
//! Settings live in `site_settings(key, value JSONB)` so the admin panel can
//! edit them without a deploy. Values may be stored as JSON strings, numbers
//! or booleans; the typed getters accept any of those shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::DEFAULT_CURRENCY_SYMBOL;

/// Store name used when `site_name` is unset.
pub const DEFAULT_SITE_NAME: &str = "Velora Tradings";

/// Setting keys.
pub mod keys {
    pub const SITE_NAME: &str = "site_name";
    pub const CURRENCY_SYMBOL: &str = "currency_symbol";
    pub const SMTP_HOST: &str = "smtp_host";
    pub const SMTP_PORT: &str = "smtp_port";
    pub const SMTP_USER: &str = "smtp_user";
    pub const SMTP_PASSWORD: &str = "smtp_password";
    pub const SMTP_FROM_EMAIL: &str = "smtp_from_email";
    pub const SMTP_FROM_NAME: &str = "smtp_from_name";
    pub const SMTP_SECURE: &str = "smtp_secure";

    /// Keys whose values are never returned by the settings API.
    pub const SECRET: &[&str] = &[SMTP_PASSWORD];
}

/// One `site_settings` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct SiteSetting {
    pub key: String,
    pub value: serde_json::Value,
}

/// All settings as a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteSettings(HashMap<String, serde_json::Value>);

impl FromIterator<SiteSetting> for SiteSettings {
    fn from_iter<I: IntoIterator<Item = SiteSetting>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| (s.key, s.value)).collect())
    }
}

impl FromIterator<(String, serde_json::Value)> for SiteSettings {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl SiteSettings {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Text value of a setting. Numbers and booleans are rendered as text;
    /// blank strings and nulls count as unset.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            serde_json::Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_owned())
            }
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Port-like numeric setting, from a JSON number or a numeric string.
    #[must_use]
    pub fn get_u16(&self, key: &str) -> Option<u16> {
        match self.0.get(key)? {
            serde_json::Value::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean setting. Only `true` or the string `"true"` count as set.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    #[must_use]
    pub fn site_name(&self) -> String {
        self.get_str(keys::SITE_NAME)
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_owned())
    }

    #[must_use]
    pub fn currency_symbol(&self) -> String {
        self.get_str(keys::CURRENCY_SYMBOL)
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_owned())
    }

    #[must_use]
    pub fn theme(&self) -> ThemeColors {
        ThemeColors::from_settings(self)
    }

    /// Copy with secret values replaced by `"********"`.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(k, v)| {
                    let value = if keys::SECRET.contains(&k.as_str()) {
                        serde_json::Value::String("********".to_owned())
                    } else {
                        v.clone()
                    };
                    (k.clone(), value)
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Storefront colour scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary_bg_color: String,
    pub primary_text_color: String,
    pub secondary_bg_color: String,
    pub accent_color: String,
    pub button_primary_color: String,
    pub button_hover_color: String,
    pub border_color: String,
    pub footer_bg_color: String,
    pub header_bg_color: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary_bg_color: "#0A8DB0".to_owned(),
            primary_text_color: "#ffffff".to_owned(),
            secondary_bg_color: "#f3f4f6".to_owned(),
            accent_color: "#D4AF37".to_owned(),
            button_primary_color: "#0A8DB0".to_owned(),
            button_hover_color: "#0891b2".to_owned(),
            border_color: "#e5e7eb".to_owned(),
            footer_bg_color: "#1e293b".to_owned(),
            header_bg_color: "#ffffff".to_owned(),
        }
    }
}

impl ThemeColors {
    /// Defaults overridden by any colour keys present in settings.
    #[must_use]
    pub fn from_settings(settings: &SiteSettings) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, default: &str| {
            settings
                .get_str(key)
                .unwrap_or_else(|| default.to_owned())
        };
        Self {
            primary_bg_color: pick("primary_bg_color", &defaults.primary_bg_color),
            primary_text_color: pick("primary_text_color", &defaults.primary_text_color),
            secondary_bg_color: pick("secondary_bg_color", &defaults.secondary_bg_color),
            accent_color: pick("accent_color", &defaults.accent_color),
            button_primary_color: pick("button_primary_color", &defaults.button_primary_color),
            button_hover_color: pick("button_hover_color", &defaults.button_hover_color),
            border_color: pick("border_color", &defaults.border_color),
            footer_bg_color: pick("footer_bg_color", &defaults.footer_bg_color),
            header_bg_color: pick("header_bg_color", &defaults.header_bg_color),
        }
    }

    fn pairs(&self) -> [(&'static str, &str); 9] {
        [
            ("primary-bg-color", self.primary_bg_color.as_str()),
            ("primary-text-color", self.primary_text_color.as_str()),
            ("secondary-bg-color", self.secondary_bg_color.as_str()),
            ("accent-color", self.accent_color.as_str()),
            ("button-primary-color", self.button_primary_color.as_str()),
            ("button-hover-color", self.button_hover_color.as_str()),
            ("border-color", self.border_color.as_str()),
            ("footer-bg-color", self.footer_bg_color.as_str()),
            ("header-bg-color", self.header_bg_color.as_str()),
        ]
    }

    /// CSS custom properties, e.g. `--primary-bg-color: #0A8DB0;`.
    #[must_use]
    pub fn css_variables(&self) -> String {
        self.pairs()
            .iter()
            .map(|(name, value)| format!("--{name}: {value};"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn settings(pairs: &[(&str, serde_json::Value)]) -> SiteSettings {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn test_typed_getters() {
        let s = settings(&[
            ("smtp_port", json!("465")),
            ("smtp_secure", json!("TRUE")),
            ("site_name", json!("  ")),
            ("smtp_host", json!(42)),
        ]);
        assert_eq!(s.get_u16("smtp_port"), Some(465));
        assert!(s.get_bool("smtp_secure"));
        assert!(!s.get_bool("missing"));
        assert_eq!(s.site_name(), DEFAULT_SITE_NAME);
        assert_eq!(s.get_str("smtp_host").as_deref(), Some("42"));
        assert_eq!(s.currency_symbol(), "₹");
    }

    #[test]
    fn test_port_out_of_range() {
        let s = settings(&[("smtp_port", json!(70_000))]);
        assert_eq!(s.get_u16("smtp_port"), None);
    }

    #[test]
    fn test_theme_defaults_and_overrides() {
        let theme = settings(&[("accent_color", json!("#000000"))]).theme();
        assert_eq!(theme.accent_color, "#000000");
        assert_eq!(theme.primary_bg_color, "#0A8DB0");
        assert!(theme.css_variables().contains("--accent-color: #000000;"));
    }

    #[test]
    fn test_redacted_hides_password() {
        let s = settings(&[
            ("smtp_password", json!("hunter2")),
            ("smtp_user", json!("mailer")),
        ])
        .redacted();
        assert_eq!(s.get_str("smtp_password").as_deref(), Some("********"));
        assert_eq!(s.get_str("smtp_user").as_deref(), Some("mailer"));
    }
}
