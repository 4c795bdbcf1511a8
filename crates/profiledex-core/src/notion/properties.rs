//! Mapping between Notion page properties and profiles.
//!
//! Reading goes through the flat wire shape so Notion pages pick up the same
//! alias handling as every other source. Writing emits every property so an
//! update replaces the whole record, clearing fields that were removed.

use serde_json::{Map, Value, json};

use crate::error::{CatalogError, Result};
use crate::models::{Profile, ProfileData};
use crate::wire::decode_profile;

/// Notion caps a single rich-text object at this many characters.
const RICH_TEXT_CHUNK: usize = 2000;

pub const PROP_NAME: &str = "Name";
pub const PROP_BRA_SIZE: &str = "Bra Size";
pub const PROP_BUST: &str = "Bust";
pub const PROP_WAIST: &str = "Waist";
pub const PROP_HIPS: &str = "Hips";
pub const PROP_UNDERBUST: &str = "Underbust";
pub const PROP_HEIGHT: &str = "Height";
pub const PROP_WEIGHT: &str = "Weight";
pub const PROP_HAIR_COLOR: &str = "Hair Color";
pub const PROP_IS_METRIC: &str = "Is Metric";
pub const PROP_TRAITS: &str = "Traits";
pub const PROP_FICTIONAL: &str = "Fictional";
pub const PROP_INSTAGRAM: &str = "Instagram";
pub const PROP_TWITTER: &str = "Twitter";
pub const PROP_TIKTOK: &str = "TikTok";
pub const PROP_THREADS: &str = "Threads";
pub const PROP_PHOTO_URL: &str = "Photo URL";
pub const PROP_WORK: &str = "Work";
pub const PROP_WIKI_URL: &str = "Wiki URL";
pub const PROP_BABEPEDIA: &str = "Babepedia";
pub const PROP_NOTES: &str = "Notes";

/// Notion property name -> wire field name.
const READ_MAP: &[(&str, &str)] = &[
    (PROP_NAME, "name"),
    (PROP_BRA_SIZE, "braSize"),
    (PROP_BUST, "bust"),
    (PROP_WAIST, "waist"),
    (PROP_HIPS, "hips"),
    (PROP_UNDERBUST, "underbust"),
    (PROP_HEIGHT, "height"),
    (PROP_WEIGHT, "weight"),
    (PROP_HAIR_COLOR, "hairColor"),
    (PROP_IS_METRIC, "isMetric"),
    (PROP_TRAITS, "traits"),
    (PROP_FICTIONAL, "isFictional"),
    (PROP_INSTAGRAM, "instagram"),
    (PROP_TWITTER, "twitter"),
    (PROP_TIKTOK, "tiktok"),
    (PROP_THREADS, "threads"),
    (PROP_PHOTO_URL, "photo_url"),
    (PROP_WORK, "work"),
    (PROP_WIKI_URL, "wikiURL"),
    (PROP_BABEPEDIA, "babepedia"),
    (PROP_NOTES, "notes"),
];

/// Reduces one typed Notion property to a scalar: text for title, rich
/// text, url and select; a number; `;`-joined names for multi-select; 1/0
/// for checkboxes. Unknown or empty properties read as `None`.
#[must_use]
pub fn property_value(property: &Value) -> Option<Value> {
    let kind = property.get("type").and_then(Value::as_str)?;
    match kind {
        "title" | "rich_text" => {
            let text = plain_text(property.get(kind)?)?;
            (!text.is_empty()).then(|| Value::String(text))
        }
        "url" | "email" | "phone_number" => property
            .get(kind)
            .and_then(Value::as_str)
            .map(|text| Value::String(text.to_string())),
        "number" => property.get("number").filter(|value| value.is_number()).cloned(),
        "select" => property
            .pointer("/select/name")
            .and_then(Value::as_str)
            .map(|name| Value::String(name.to_string())),
        "multi_select" => {
            let names = property
                .get("multi_select")?
                .as_array()?
                .iter()
                .filter_map(|option| option.get("name").and_then(Value::as_str))
                .collect::<Vec<_>>();
            Some(Value::String(names.join(";")))
        }
        "checkbox" => property
            .get("checkbox")
            .and_then(Value::as_bool)
            .map(|checked| Value::from(u8::from(checked))),
        _ => None,
    }
}

fn plain_text(segments: &Value) -> Option<String> {
    let segments = segments.as_array()?;
    Some(
        segments
            .iter()
            .filter_map(|segment| {
                segment
                    .get("plain_text")
                    .or_else(|| segment.pointer("/text/content"))
                    .and_then(Value::as_str)
            })
            .collect::<String>(),
    )
}

/// Converts a Notion page object into a profile keyed by the page id.
pub fn page_to_profile(page: &Value) -> Result<Profile> {
    let id = page
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| CatalogError::Validation("notion page has no id".to_string()))?;
    let properties = page
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| CatalogError::Validation(format!("notion page {id} has no properties")))?;

    let mut flat = Map::new();
    flat.insert("id".to_string(), Value::String(id.to_string()));
    for (property, field) in READ_MAP {
        if let Some(value) = properties.get(*property).and_then(property_value) {
            flat.insert((*field).to_string(), value);
        }
    }
    decode_profile(&Value::Object(flat))
}

#[must_use]
pub fn is_archived(page: &Value) -> bool {
    page.get("archived").and_then(Value::as_bool).unwrap_or(false)
        || page.get("in_trash").and_then(Value::as_bool).unwrap_or(false)
}

/// Builds the full `properties` object for a create or update.
pub fn profile_properties(data: &ProfileData) -> Result<Value> {
    data.validate()?;
    if let Some(bad) = data.traits.iter().find(|item| item.contains(',')) {
        return Err(CatalogError::Validation(format!(
            "notion multi-select options cannot contain ',': {bad}"
        )));
    }

    let social = &data.social;
    let mut props = Map::new();
    props.insert(PROP_NAME.to_string(), json!({ "title": rich_text(Some(&data.name)) }));
    props.insert(PROP_BRA_SIZE.to_string(), text_prop(data.bra_size.as_deref()));
    props.insert(PROP_BUST.to_string(), number_prop(data.measurements.bust));
    props.insert(PROP_WAIST.to_string(), number_prop(data.measurements.waist));
    props.insert(PROP_HIPS.to_string(), number_prop(data.measurements.hips));
    props.insert(PROP_UNDERBUST.to_string(), number_prop(data.underbust));
    props.insert(PROP_HEIGHT.to_string(), number_prop(data.height));
    props.insert(PROP_WEIGHT.to_string(), number_prop(data.weight));
    props.insert(PROP_HAIR_COLOR.to_string(), text_prop(data.hair_color.as_deref()));
    props.insert(
        PROP_TRAITS.to_string(),
        json!({
            "multi_select": data
                .traits
                .iter()
                .map(|name| json!({ "name": name }))
                .collect::<Vec<_>>()
        }),
    );
    props.insert(PROP_INSTAGRAM.to_string(), url_prop(social.instagram.as_deref()));
    props.insert(PROP_TWITTER.to_string(), url_prop(social.twitter.as_deref()));
    props.insert(PROP_TIKTOK.to_string(), url_prop(social.tiktok.as_deref()));
    props.insert(PROP_THREADS.to_string(), url_prop(social.threads.as_deref()));
    props.insert(PROP_PHOTO_URL.to_string(), url_prop(data.photo_url.as_deref()));
    props.insert(PROP_WORK.to_string(), text_prop(data.work.as_deref()));
    props.insert(PROP_WIKI_URL.to_string(), url_prop(data.wiki_url.as_deref()));
    props.insert(PROP_BABEPEDIA.to_string(), url_prop(data.babepedia.as_deref()));
    props.insert(PROP_NOTES.to_string(), text_prop(data.notes.as_deref()));
    // a checkbox has no "unknown" state, so an absent flag leaves Notion's value alone
    if let Some(fictional) = data.is_fictional {
        props.insert(PROP_FICTIONAL.to_string(), json!({ "checkbox": fictional }));
    }
    if let Some(metric) = data.is_metric {
        props.insert(PROP_IS_METRIC.to_string(), json!({ "checkbox": metric }));
    }
    Ok(Value::Object(props))
}

fn rich_text(text: Option<&str>) -> Value {
    let Some(text) = text.filter(|text| !text.is_empty()) else {
        return json!([]);
    };
    let chars = text.chars().collect::<Vec<_>>();
    Value::Array(
        chars
            .chunks(RICH_TEXT_CHUNK)
            .map(|chunk| json!({ "text": { "content": chunk.iter().collect::<String>() } }))
            .collect(),
    )
}

fn text_prop(text: Option<&str>) -> Value {
    json!({ "rich_text": rich_text(text) })
}

fn url_prop(url: Option<&str>) -> Value {
    json!({ "url": url.filter(|url| !url.trim().is_empty()) })
}

fn number_prop(number: Option<f64>) -> Value {
    json!({ "number": number })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Measurements, ProfileId};

    fn sample_page() -> Value {
        json!({
            "object": "page",
            "id": "1d9b1628-346f-8071-96e9-d5375dda4eab",
            "archived": false,
            "properties": {
                "Name": { "type": "title", "title": [
                    { "plain_text": "Ai " }, { "plain_text": "Hoshino" }
                ]},
                "Bra Size": { "type": "rich_text", "rich_text": [{ "plain_text": "32C" }] },
                "Bust": { "type": "number", "number": 34 },
                "Waist": { "type": "number", "number": 24.5 },
                "Hips": { "type": "number", "number": null },
                "Hair Color": { "type": "select", "select": { "name": "Purple" } },
                "Traits": { "type": "multi_select", "multi_select": [
                    { "name": "idol" }, { "name": "actress" }
                ]},
                "Fictional": { "type": "checkbox", "checkbox": true },
                "Is Metric": { "type": "checkbox", "checkbox": false },
                "Instagram": { "type": "url", "url": "https://instagram.com/ai" },
                "Notes": { "type": "rich_text", "rich_text": [] },
                "Photo URL": { "type": "url", "url": null }
            }
        })
    }

    #[test]
    fn page_maps_to_canonical_profile() {
        let profile = page_to_profile(&sample_page()).expect("map page");
        let data = &profile.data;
        assert_eq!(
            profile.id,
            ProfileId::Text("1d9b1628-346f-8071-96e9-d5375dda4eab".to_string())
        );
        assert_eq!(data.name, "Ai Hoshino");
        assert_eq!(data.bra_size.as_deref(), Some("32C"));
        assert_eq!(
            data.measurements,
            Measurements::new(Some(34.0), Some(24.5), None)
        );
        assert_eq!(data.hair_color.as_deref(), Some("Purple"));
        assert_eq!(data.traits, vec!["idol".to_string(), "actress".to_string()]);
        assert_eq!(data.is_fictional, Some(true));
        assert_eq!(data.is_metric, Some(false));
        assert_eq!(
            data.social.instagram.as_deref(),
            Some("https://instagram.com/ai")
        );
        assert_eq!(data.notes, None);
        assert_eq!(data.photo_url, None);
    }

    #[test]
    fn traits_round_trip_through_multi_select() {
        let mut data = ProfileData::named("Ruby");
        data.traits = vec!["idol".to_string(), "reincarnated".to_string()];
        let props = profile_properties(&data).expect("properties");

        let page = json!({
            "id": "abc",
            "properties": {
                "Name": { "type": "title", "title": [{ "plain_text": "Ruby" }] },
                "Traits": {
                    "type": "multi_select",
                    "multi_select": props["Traits"]["multi_select"].clone()
                }
            }
        });
        let profile = page_to_profile(&page).expect("map page");
        assert_eq!(profile.data.traits, data.traits);
        assert_eq!(profile.data.traits_text().as_deref(), Some("idol;reincarnated"));
    }

    #[test]
    fn properties_clear_removed_fields() {
        let props = profile_properties(&ProfileData::named("Mem")).expect("properties");
        assert_eq!(props["Name"]["title"][0]["text"]["content"], "Mem");
        assert_eq!(props["Bust"]["number"], Value::Null);
        assert_eq!(props["Instagram"]["url"], Value::Null);
        assert_eq!(props["Notes"]["rich_text"], json!([]));
        assert_eq!(props["Traits"]["multi_select"], json!([]));
        assert!(props.get("Fictional").is_none());
    }

    #[test]
    fn long_text_is_chunked() {
        let mut data = ProfileData::named("Long");
        data.notes = Some("x".repeat(RICH_TEXT_CHUNK + 5));
        let props = profile_properties(&data).expect("properties");
        let chunks = props["Notes"]["rich_text"].as_array().expect("array");
        assert_eq!(chunks.len(), 2);
        assert_eq!(
            chunks[1]["text"]["content"].as_str().map(str::len),
            Some(5)
        );
    }

    #[test]
    fn invalid_trait_values_are_rejected() {
        let mut data = ProfileData::named("Bad");
        data.traits = vec!["a,b".to_string()];
        assert!(matches!(
            profile_properties(&data),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn archived_flag_detection() {
        assert!(!is_archived(&sample_page()));
        assert!(is_archived(&json!({ "archived": true })));
        assert!(is_archived(&json!({ "in_trash": true })));
    }
}
