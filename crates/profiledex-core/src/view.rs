use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::models::Profile;
use crate::search::fuzzy_search;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    BraSize,
    Bust,
    Waist,
    Hips,
    Height,
    Weight,
    Traits,
}

impl SortField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::BraSize => "braSize",
            Self::Bust => "bust",
            Self::Waist => "waist",
            Self::Hips => "hips",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::Traits => "traits",
        }
    }
}

impl FromStr for SortField {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "name" => Ok(Self::Name),
            "braSize" | "bra_size" => Ok(Self::BraSize),
            "bust" | "measurement_1" => Ok(Self::Bust),
            "waist" | "measurement_2" => Ok(Self::Waist),
            "hips" | "measurement_3" => Ok(Self::Hips),
            "height" => Ok(Self::Height),
            "weight" => Ok(Self::Weight),
            "traits" => Ok(Self::Traits),
            other => Err(CatalogError::Validation(format!(
                "unknown sort field: {other} (expected name|braSize|bust|waist|hips|height|weight|traits)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(CatalogError::Validation(format!(
                "unknown sort direction: {other} (expected asc|desc)"
            ))),
        }
    }
}

/// Filter criteria; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub fictional: Option<bool>,
    pub trait_contains: Option<String>,
    pub hair_color: Option<String>,
}

impl FilterOptions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fictional.is_none() && self.trait_contains.is_none() && self.hair_color.is_none()
    }

    #[must_use]
    pub fn accepts(&self, profile: &Profile) -> bool {
        let data = &profile.data;
        if self.fictional.is_some() && data.is_fictional != self.fictional {
            return false;
        }
        if let Some(needle) = self.trait_contains.as_deref() {
            let traits = data.traits_text().unwrap_or_default();
            if !traits.contains(needle) {
                return false;
            }
        }
        if self.hair_color.is_some() && data.hair_color != self.hair_color {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: Option<String>,
    pub filter: FilterOptions,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

/// Search, then filter, then stable-sort.
#[must_use]
pub fn apply_view<'a>(profiles: &'a [Profile], query: &ViewQuery) -> Vec<&'a Profile> {
    let mut view = match query.search.as_deref() {
        Some(text) => fuzzy_search(profiles, text),
        None => profiles.iter().collect(),
    };
    view.retain(|profile| query.filter.accepts(profile));
    sort_profiles(&mut view, query.sort_field, query.direction);
    view
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortKey<'a> {
    Text(&'a str),
    Number(f64),
}

fn sort_key(profile: &Profile, field: SortField) -> Option<SortKey<'_>> {
    let data = &profile.data;
    match field {
        SortField::Name => Some(SortKey::Text(&data.name)),
        SortField::BraSize => data.bra_size.as_deref().map(SortKey::Text),
        SortField::Bust => data.measurements.bust.map(SortKey::Number),
        SortField::Waist => data.measurements.waist.map(SortKey::Number),
        SortField::Hips => data.measurements.hips.map(SortKey::Number),
        SortField::Height => data.height.map(SortKey::Number),
        SortField::Weight => data.weight.map(SortKey::Number),
        SortField::Traits => None,
    }
}

/// Stable sort. Profiles without a value for `field` go last in both
/// directions; only the comparison of present values is reversed.
pub fn sort_profiles(profiles: &mut [&Profile], field: SortField, direction: SortDirection) {
    if field == SortField::Traits {
        // traits are compared on their joined text, which has to be owned
        let mut keyed = profiles
            .iter()
            .map(|profile| (profile.data.traits_text(), *profile))
            .collect::<Vec<_>>();
        keyed.sort_by(|(left, _), (right, _)| {
            compare_present(
                left.as_deref().map(SortKey::Text),
                right.as_deref().map(SortKey::Text),
                direction,
            )
        });
        for (slot, (_, profile)) in profiles.iter_mut().zip(keyed) {
            *slot = profile;
        }
        return;
    }
    profiles.sort_by(|left, right| {
        compare_present(sort_key(left, field), sort_key(right, field), direction)
    });
}

fn compare_present(
    left: Option<SortKey<'_>>,
    right: Option<SortKey<'_>>,
    direction: SortDirection,
) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => {
            let natural = compare_keys(left, right);
            match direction {
                SortDirection::Asc => natural,
                SortDirection::Desc => natural.reverse(),
            }
        }
    }
}

fn compare_keys(left: SortKey<'_>, right: SortKey<'_>) -> Ordering {
    match (left, right) {
        (SortKey::Text(left), SortKey::Text(right)) => collate(left, right),
        (SortKey::Number(left), SortKey::Number(right)) => {
            left.partial_cmp(&right).unwrap_or(Ordering::Equal)
        }
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    }
}

/// Locale-style ordering: case-folded comparison first, then the raw text so
/// that `"ai"` and `"Ai"` still have a deterministic order.
#[must_use]
pub fn collate(left: &str, right: &str) -> Ordering {
    let folded = left
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase));
    folded.then_with(|| {
        left.chars()
            .map(|ch| ch.is_uppercase())
            .cmp(right.chars().map(|ch| ch.is_uppercase()))
    })
    .then_with(|| left.cmp(right))
}

/// Distinct trait items across the collection, sorted.
#[must_use]
pub fn available_traits(profiles: &[Profile]) -> Vec<String> {
    let mut items = profiles
        .iter()
        .flat_map(|profile| profile.data.traits.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    items.sort_by(|left, right| collate(left, right));
    items
}

/// Distinct hair colors across the collection, sorted.
#[must_use]
pub fn available_hair_colors(profiles: &[Profile]) -> Vec<String> {
    let mut colors = profiles
        .iter()
        .filter_map(|profile| profile.data.hair_color.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    colors.sort_by(|left, right| collate(left, right));
    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileData;

    fn with_height(id: i64, height: Option<f64>) -> Profile {
        let mut data = ProfileData::named(format!("p{id}"));
        data.height = height;
        Profile::new(id, data)
    }

    fn heights(view: &[&Profile]) -> Vec<Option<f64>> {
        view.iter().map(|profile| profile.data.height).collect()
    }

    fn ids(view: &[&Profile]) -> Vec<String> {
        view.iter().map(|profile| profile.id.to_string()).collect()
    }

    #[test]
    fn absent_values_sort_last_in_both_directions() {
        let profiles = vec![
            with_height(1, None),
            with_height(2, Some(5.5)),
            with_height(3, Some(5.9)),
        ];
        let mut query = ViewQuery {
            sort_field: SortField::Height,
            ..ViewQuery::default()
        };
        assert_eq!(
            heights(&apply_view(&profiles, &query)),
            vec![Some(5.5), Some(5.9), None]
        );

        query.direction = SortDirection::Desc;
        assert_eq!(
            heights(&apply_view(&profiles, &query)),
            vec![Some(5.9), Some(5.5), None]
        );
    }

    #[test]
    fn fictional_filter_matches_exact_flag_only() {
        let mut fictional = ProfileData::named("Ai");
        fictional.is_fictional = Some(true);
        let mut real = ProfileData::named("Rina");
        real.is_fictional = Some(false);
        let profiles = vec![
            Profile::new(1, fictional),
            Profile::new(2, real),
            Profile::new(3, ProfileData::named("Unknown")),
        ];

        let mut query = ViewQuery::default();
        query.filter.fictional = Some(true);
        assert_eq!(ids(&apply_view(&profiles, &query)), vec!["1"]);

        query.filter.fictional = Some(false);
        assert_eq!(ids(&apply_view(&profiles, &query)), vec!["2"]);

        query.filter.fictional = None;
        assert_eq!(ids(&apply_view(&profiles, &query)), vec!["1", "2", "3"]);
    }

    #[test]
    fn filters_combine_with_and() {
        let mut first = ProfileData::named("Kana");
        first.traits = vec!["singer".to_string(), "actor".to_string()];
        first.hair_color = Some("Red".to_string());
        let mut second = ProfileData::named("Ruby");
        second.traits = vec!["singer".to_string()];
        second.hair_color = Some("Blonde".to_string());
        let profiles = vec![Profile::new(1, first), Profile::new(2, second)];

        let query = ViewQuery {
            filter: FilterOptions {
                trait_contains: Some("sing".to_string()),
                hair_color: Some("Red".to_string()),
                fictional: None,
            },
            ..ViewQuery::default()
        };
        assert_eq!(ids(&apply_view(&profiles, &query)), vec!["1"]);

        let exact_only = ViewQuery {
            filter: FilterOptions {
                hair_color: Some("red".to_string()),
                ..FilterOptions::default()
            },
            ..ViewQuery::default()
        };
        assert!(apply_view(&profiles, &exact_only).is_empty());
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let profiles = vec![
            with_height(1, Some(5.0)),
            with_height(2, Some(4.0)),
            with_height(3, Some(5.0)),
            with_height(4, None),
            with_height(5, None),
        ];
        let query = ViewQuery {
            sort_field: SortField::Height,
            direction: SortDirection::Desc,
            ..ViewQuery::default()
        };
        assert_eq!(
            ids(&apply_view(&profiles, &query)),
            vec!["1", "3", "2", "4", "5"]
        );
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let profiles = vec![
            Profile::new(1, ProfileData::named("ruby")),
            Profile::new(2, ProfileData::named("Akane")),
            Profile::new(3, ProfileData::named("mem")),
        ];
        let view = apply_view(&profiles, &ViewQuery::default());
        assert_eq!(ids(&view), vec!["2", "3", "1"]);
    }

    #[test]
    fn traits_sort_uses_joined_text() {
        let mut a = ProfileData::named("a");
        a.traits = vec!["singer".to_string()];
        let mut b = ProfileData::named("b");
        b.traits = vec!["actor".to_string(), "writer".to_string()];
        let profiles = vec![
            Profile::new(1, ProfileData::named("none")),
            Profile::new(2, a),
            Profile::new(3, b),
        ];
        let query = ViewQuery {
            sort_field: SortField::Traits,
            ..ViewQuery::default()
        };
        assert_eq!(ids(&apply_view(&profiles, &query)), vec!["3", "2", "1"]);
    }

    #[test]
    fn search_runs_before_filters() {
        let mut ai = ProfileData::named("Ai Hoshino");
        ai.is_fictional = Some(true);
        let mut akira = ProfileData::named("Akira Inoue");
        akira.is_fictional = Some(false);
        let profiles = vec![
            Profile::new(1, ai),
            Profile::new(2, akira),
            Profile::new(3, ProfileData::named("Mem")),
        ];
        let query = ViewQuery {
            search: Some("ai".to_string()),
            filter: FilterOptions {
                fictional: Some(false),
                ..FilterOptions::default()
            },
            ..ViewQuery::default()
        };
        assert_eq!(ids(&apply_view(&profiles, &query)), vec!["2"]);
    }

    #[test]
    fn sort_field_parses_aliases() {
        assert_eq!("bra_size".parse::<SortField>().expect("parse"), SortField::BraSize);
        assert_eq!("measurement_1".parse::<SortField>().expect("parse"), SortField::Bust);
        assert!("shoe".parse::<SortField>().is_err());
        assert_eq!("DESC".parse::<SortDirection>().expect("parse"), SortDirection::Desc);
    }

    #[test]
    fn facets_are_distinct_and_sorted() {
        let mut first = ProfileData::named("a");
        first.traits = vec!["singer".to_string(), "Actor".to_string()];
        first.hair_color = Some("Red".to_string());
        let mut second = ProfileData::named("b");
        second.traits = vec!["singer".to_string()];
        second.hair_color = Some("blonde".to_string());
        let profiles = vec![Profile::new(1, first), Profile::new(2, second)];

        assert_eq!(available_traits(&profiles), vec!["Actor", "singer"]);
        assert_eq!(available_hair_colors(&profiles), vec!["blonde", "Red"]);
    }
}
