use serde::{Deserialize, Serialize};
use serde_json::Value;

use profiledex_core::store::ListSource;
use profiledex_core::{CatalogError, FilterOptions, Result, SortDirection, SortField, ViewQuery};

/// Query string of `GET /api/view`. Blank parameters impose no constraint.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub q: Option<String>,
    pub fictional: Option<String>,
    #[serde(rename = "trait")]
    pub trait_contains: Option<String>,
    pub hair_color: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl ViewParams {
    pub fn into_query(self) -> Result<ViewQuery> {
        let fictional_raw = non_blank(self.fictional).map(|raw| raw.trim().to_ascii_lowercase());
        let fictional = match fictional_raw.as_deref() {
            None | Some("all") => None,
            Some("true" | "1" | "yes") => Some(true),
            Some("false" | "0" | "no") => Some(false),
            Some(other) => {
                return Err(CatalogError::Validation(format!(
                    "invalid fictional filter: {other} (expected true|false|all)"
                )));
            }
        };
        Ok(ViewQuery {
            search: non_blank(self.q),
            filter: FilterOptions {
                fictional,
                trait_contains: non_blank(self.trait_contains),
                hair_color: non_blank(self.hair_color),
            },
            sort_field: non_blank(self.sort)
                .map(|raw| raw.parse::<SortField>())
                .transpose()?
                .unwrap_or_default(),
            direction: non_blank(self.direction)
                .map(|raw| raw.parse::<SortDirection>())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub source: ListSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub total: usize,
    pub count: usize,
    pub sort: &'static str,
    pub direction: &'static str,
    pub profiles: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct FacetsResponse {
    pub source: ListSource,
    pub traits: Vec<String>,
    pub hair_colors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: Value,
    pub deleted: bool,
    pub persisted: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_params_produce_default_view() {
        let query = ViewParams {
            q: Some("  ".to_string()),
            fictional: Some(String::new()),
            ..ViewParams::default()
        }
        .into_query()
        .expect("query");
        assert_eq!(query, ViewQuery::default());
    }

    #[test]
    fn params_map_to_filters_and_sort() {
        let query = ViewParams {
            q: Some("ai".to_string()),
            fictional: Some("1".to_string()),
            trait_contains: Some("idol".to_string()),
            hair_color: Some("Purple".to_string()),
            sort: Some("bra_size".to_string()),
            direction: Some("desc".to_string()),
        }
        .into_query()
        .expect("query");
        assert_eq!(query.search.as_deref(), Some("ai"));
        assert_eq!(query.filter.fictional, Some(true));
        assert_eq!(query.filter.trait_contains.as_deref(), Some("idol"));
        assert_eq!(query.sort_field, SortField::BraSize);
        assert_eq!(query.direction, SortDirection::Desc);
    }

    #[test]
    fn invalid_params_are_validation_errors() {
        let bad_sort = ViewParams {
            sort: Some("age".to_string()),
            ..ViewParams::default()
        };
        assert!(matches!(
            bad_sort.into_query(),
            Err(CatalogError::Validation(_))
        ));
        let bad_flag = ViewParams {
            fictional: Some("maybe".to_string()),
            ..ViewParams::default()
        };
        assert!(matches!(
            bad_flag.into_query(),
            Err(CatalogError::Validation(_))
        ));
    }
}
