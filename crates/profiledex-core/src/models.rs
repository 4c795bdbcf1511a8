use std::fmt;

use crate::error::{CatalogError, Result};

/// Separator between trait items in the flat text form.
pub const TRAIT_SEPARATOR: &str = ";";

/// Backend-assigned record identifier. Local stores hand out integers,
/// remote document stores hand out opaque strings (Notion page UUIDs).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProfileId {
    Number(i64),
    Text(String),
}

impl ProfileId {
    /// Parses an id as it appears in a URL path or CLI argument. All-digit
    /// input becomes a numeric id so it compares equal to stored integers.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::Validation("profile id must not be empty".to_string()));
        }
        Ok(trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Number))
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ProfileId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ProfileId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Bust, waist and hips, in the unit named by [`ProfileData::is_metric`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub bust: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
}

impl Measurements {
    #[must_use]
    pub fn new(bust: Option<f64>, waist: Option<f64>, hips: Option<f64>) -> Self {
        Self {
            bust: finite(bust),
            waist: finite(waist),
            hips: finite(hips),
        }
    }

    /// `b-w-h`, only when all three are known.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        match (self.bust, self.waist, self.hips) {
            (Some(bust), Some(waist), Some(hips)) => Some(format!(
                "{}-{}-{}",
                format_number(bust),
                format_number(waist),
                format_number(hips)
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialPlatform {
    Instagram,
    Twitter,
    TikTok,
    Threads,
}

impl SocialPlatform {
    pub const ALL: [Self; 4] = [Self::Instagram, Self::Twitter, Self::TikTok, Self::Threads];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::TikTok => "tiktok",
            Self::Threads => "threads",
        }
    }

    fn profile_url(self, handle: &str) -> String {
        match self {
            Self::Instagram => format!("https://instagram.com/{handle}"),
            Self::Twitter => format!("https://x.com/{handle}"),
            Self::TikTok => format!("https://tiktok.com/@{handle}"),
            Self::Threads => format!("https://threads.net/@{handle}"),
        }
    }
}

/// Each link is kept exactly as entered: a full URL or a bare handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks {
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub tiktok: Option<String>,
    pub threads: Option<String>,
}

impl SocialLinks {
    #[must_use]
    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        match platform {
            SocialPlatform::Instagram => self.instagram.as_deref(),
            SocialPlatform::Twitter => self.twitter.as_deref(),
            SocialPlatform::TikTok => self.tiktok.as_deref(),
            SocialPlatform::Threads => self.threads.as_deref(),
        }
    }

    #[must_use]
    pub fn has_any(&self) -> bool {
        SocialPlatform::ALL
            .into_iter()
            .any(|platform| self.get(platform).is_some())
    }

    /// Link target for a platform; bare handles are expanded to the
    /// platform's profile URL.
    #[must_use]
    pub fn resolve(&self, platform: SocialPlatform) -> Option<String> {
        let raw = self.get(platform)?.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Some(raw.to_string());
        }
        let handle = raw.trim_start_matches('@');
        if handle.is_empty() {
            return None;
        }
        Some(platform.profile_url(handle))
    }
}

/// Everything a profile carries except its id. Creates and updates submit a
/// full `ProfileData`; there is no partial patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileData {
    pub name: String,
    pub photo_url: Option<String>,
    pub bra_size: Option<String>,
    pub measurements: Measurements,
    pub underbust: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub hair_color: Option<String>,
    pub is_metric: Option<bool>,
    pub traits: Vec<String>,
    pub is_fictional: Option<bool>,
    pub social: SocialLinks,
    pub work: Option<String>,
    pub wiki_url: Option<String>,
    pub babepedia: Option<String>,
    pub notes: Option<String>,
}

impl ProfileData {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "profile name must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self
            .traits
            .iter()
            .find(|item| item.contains(TRAIT_SEPARATOR))
        {
            return Err(CatalogError::Validation(format!(
                "trait must not contain '{TRAIT_SEPARATOR}': {bad}"
            )));
        }
        Ok(())
    }

    /// Traits in their flat `a;b;c` form.
    #[must_use]
    pub fn traits_text(&self) -> Option<String> {
        if self.traits.is_empty() {
            return None;
        }
        Some(join_traits(&self.traits))
    }

    #[must_use]
    pub const fn unit_label(&self) -> &'static str {
        match self.is_metric {
            Some(true) => "cm",
            _ => "in",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub data: ProfileData,
}

impl Profile {
    #[must_use]
    pub fn new(id: impl Into<ProfileId>, data: ProfileData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }
}

/// Splits the flat trait text, trimming items and dropping empty ones.
#[must_use]
pub fn parse_traits(raw: &str) -> Vec<String> {
    raw.split(TRAIT_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[must_use]
pub fn join_traits(items: &[String]) -> String {
    items.join(TRAIT_SEPARATOR)
}

pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|number| number.is_finite())
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_id_parse_prefers_numbers() {
        assert_eq!(ProfileId::parse("42").expect("id"), ProfileId::Number(42));
        assert_eq!(
            ProfileId::parse(" 1d9b1628-346f-8071 ").expect("id"),
            ProfileId::Text("1d9b1628-346f-8071".to_string())
        );
        assert!(ProfileId::parse("  ").is_err());
    }

    #[test]
    fn measurements_drop_non_finite_values() {
        let measurements = Measurements::new(Some(f64::NAN), Some(24.0), Some(f64::INFINITY));
        assert_eq!(measurements.bust, None);
        assert_eq!(measurements.waist, Some(24.0));
        assert_eq!(measurements.hips, None);
    }

    #[test]
    fn measurement_display_requires_all_three() {
        assert_eq!(
            Measurements::new(Some(34.0), Some(24.5), Some(35.0)).display(),
            Some("34-24.5-35".to_string())
        );
        assert_eq!(Measurements::new(Some(34.0), None, Some(35.0)).display(), None);
    }

    #[test]
    fn social_resolve_expands_handles_and_keeps_urls() {
        let links = SocialLinks {
            instagram: Some("@ai.hoshino".to_string()),
            twitter: Some("https://twitter.com/ai".to_string()),
            tiktok: Some("ai".to_string()),
            threads: None,
        };
        assert_eq!(
            links.resolve(SocialPlatform::Instagram).as_deref(),
            Some("https://instagram.com/ai.hoshino")
        );
        assert_eq!(
            links.resolve(SocialPlatform::Twitter).as_deref(),
            Some("https://twitter.com/ai")
        );
        assert_eq!(
            links.resolve(SocialPlatform::TikTok).as_deref(),
            Some("https://tiktok.com/@ai")
        );
        assert_eq!(links.resolve(SocialPlatform::Threads), None);
        assert!(links.has_any());
        assert!(!SocialLinks::default().has_any());
    }

    #[test]
    fn validate_rejects_blank_name_and_separator_in_trait() {
        assert!(ProfileData::named("   ").validate().is_err());

        let mut data = ProfileData::named("Ai");
        data.traits = vec!["idol".to_string(), "a;b".to_string()];
        assert!(data.validate().is_err());

        data.traits = vec!["idol".to_string()];
        assert!(data.validate().is_ok());
    }

    #[test]
    fn traits_split_and_join() {
        assert_eq!(
            parse_traits(" idol ;; singer;"),
            vec!["idol".to_string(), "singer".to_string()]
        );
        assert_eq!(
            join_traits(&["idol".to_string(), "singer".to_string()]),
            "idol;singer"
        );
        assert_eq!(ProfileData::named("x").traits_text(), None);
    }
}
