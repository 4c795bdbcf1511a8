//! Flat JSON record shape shared by every backend and client.
//!
//! Historical clients disagree on field names (`bra_size` vs `braSize`,
//! `measurement_1` vs `bust`, `instagram` vs `instagram_url`, ...). Decoding
//! accepts either name; encoding always writes both so older readers keep
//! working. Nothing outside this module sees the aliases.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::{CatalogError, Result};
use crate::models::{
    Measurements, Profile, ProfileData, ProfileId, SocialLinks, SocialPlatform, finite, join_traits,
    parse_traits,
};

#[derive(Debug, Serialize)]
struct WireProfile<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<&'a str>,
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
    #[serde(rename = "braSize", skip_serializing_if = "Option::is_none")]
    bra_size_camel: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bra_size: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    measurement_1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    measurement_2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    measurement_3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bust: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    waist: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hips: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    underbust: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    #[serde(rename = "hairColor", skip_serializing_if = "Option::is_none")]
    hair_color: Option<&'a str>,
    #[serde(rename = "isMetric", skip_serializing_if = "Option::is_none")]
    is_metric: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    traits: Option<String>,
    #[serde(rename = "isFictional", skip_serializing_if = "Option::is_none")]
    is_fictional: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instagram: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instagram_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    twitter: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    twitter_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tiktok: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tiktok_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    threads: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    work: Option<&'a str>,
    #[serde(rename = "wikiURL", skip_serializing_if = "Option::is_none")]
    wiki_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    babepedia: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

impl<'a> WireProfile<'a> {
    fn from_data(id: Option<&ProfileId>, data: &'a ProfileData) -> Self {
        let photo = data.photo_url.as_deref();
        let bra_size = data.bra_size.as_deref();
        let Measurements { bust, waist, hips } = data.measurements;
        let social = &data.social;
        Self {
            id: id.map(encode_id),
            name: &data.name,
            photo_url: photo,
            image_url: photo,
            bra_size_camel: bra_size,
            bra_size,
            measurement_1: bust,
            measurement_2: waist,
            measurement_3: hips,
            bust,
            waist,
            hips,
            underbust: data.underbust,
            height: data.height,
            weight: data.weight,
            hair_color: data.hair_color.as_deref(),
            is_metric: data.is_metric.map(u8::from),
            traits: data.traits_text(),
            is_fictional: data.is_fictional.map(u8::from),
            instagram: social.instagram.as_deref(),
            instagram_url: social.instagram.as_deref(),
            twitter: social.twitter.as_deref(),
            twitter_url: social.twitter.as_deref(),
            tiktok: social.tiktok.as_deref(),
            tiktok_url: social.tiktok.as_deref(),
            threads: social.threads.as_deref(),
            work: data.work.as_deref(),
            wiki_url: data.wiki_url.as_deref(),
            babepedia: data.babepedia.as_deref(),
            notes: data.notes.as_deref(),
        }
    }
}

#[must_use]
pub fn encode_id(id: &ProfileId) -> Value {
    match id {
        ProfileId::Number(value) => Value::from(*value),
        ProfileId::Text(value) => Value::from(value.as_str()),
    }
}

pub fn decode_id(raw: &Value) -> Option<ProfileId> {
    match raw {
        Value::Number(number) => number.as_i64().map(ProfileId::Number),
        Value::String(text) if !text.trim().is_empty() => ProfileId::parse(text).ok(),
        _ => None,
    }
}

#[must_use]
pub fn encode_profile(profile: &Profile) -> Value {
    to_value(&WireProfile::from_data(Some(&profile.id), &profile.data))
}

/// The wire record plus a `display` block for rendering: the measurement
/// line with its unit and the resolved social link targets. Decoders ignore
/// the extra block.
#[must_use]
pub fn encode_card(profile: &Profile) -> Value {
    let data = &profile.data;
    let unit = data.unit_label();
    let links = SocialPlatform::ALL
        .into_iter()
        .filter_map(|platform| {
            let target = data.social.resolve(platform)?;
            Some((platform.as_str().to_string(), Value::String(target)))
        })
        .collect::<Map<String, Value>>();
    let mut record = encode_profile(profile);
    if let Value::Object(fields) = &mut record {
        fields.insert(
            "display".to_string(),
            json!({
                "unit": unit,
                "measurements": data.measurements.display().map(|line| format!("{line} {unit}")),
                "links": links,
            }),
        );
    }
    record
}

#[must_use]
pub fn encode_data(data: &ProfileData) -> Value {
    to_value(&WireProfile::from_data(None, data))
}

fn to_value(wire: &WireProfile<'_>) -> Value {
    // Every field is a plain string, number or integer flag; serialization
    // into a `Value` cannot fail.
    serde_json::to_value(wire).unwrap_or(Value::Null)
}

/// Reads a record that must carry an id.
pub fn decode_profile(raw: &Value) -> Result<Profile> {
    let object = as_object(raw)?;
    let id = object
        .get("id")
        .and_then(decode_id)
        .ok_or_else(|| CatalogError::Validation("profile record has no usable id".to_string()))?;
    Ok(Profile {
        id,
        data: decode_fields(object),
    })
}

/// Reads the field set of a create/update request; any id is ignored.
pub fn decode_data(raw: &Value) -> Result<ProfileData> {
    Ok(decode_fields(as_object(raw)?))
}

/// Decodes a JSON array of records, skipping entries that cannot be read.
/// Returns the decoded profiles and the number of skipped entries.
#[must_use]
pub fn decode_profiles_tolerant(raw: &Value) -> (Vec<Profile>, usize) {
    let Some(items) = raw.as_array() else {
        return (Vec::new(), 0);
    };
    let mut skipped = 0usize;
    let profiles = items
        .iter()
        .filter_map(|item| match decode_profile(item) {
            Ok(profile) => Some(profile),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();
    (profiles, skipped)
}

/// Rewrites a raw record into the dual-alias shape. Applying it to its own
/// output returns the same value.
pub fn normalize(raw: &Value) -> Result<Value> {
    let object = as_object(raw)?;
    let id = object.get("id").and_then(decode_id);
    let data = decode_fields(object);
    Ok(to_value(&WireProfile::from_data(id.as_ref(), &data)))
}

fn as_object(raw: &Value) -> Result<&Map<String, Value>> {
    raw.as_object()
        .ok_or_else(|| CatalogError::Validation("profile record must be a JSON object".to_string()))
}

fn decode_fields(object: &Map<String, Value>) -> ProfileData {
    ProfileData {
        name: text(object, &["name"]).unwrap_or_default(),
        photo_url: text(object, &["imageURL", "photo_url"]),
        bra_size: text(object, &["braSize", "bra_size"]),
        measurements: Measurements::new(
            number(object, &["measurement_1", "bust"]),
            number(object, &["measurement_2", "waist"]),
            number(object, &["measurement_3", "hips"]),
        ),
        underbust: number(object, &["underbust"]),
        height: number(object, &["height"]),
        weight: number(object, &["weight"]),
        hair_color: text(object, &["hairColor", "hair_color"]),
        is_metric: flag(object, &["isMetric", "is_metric"]),
        traits: traits(object.get("traits")),
        is_fictional: flag(object, &["isFictional", "is_fictional"]),
        social: SocialLinks {
            instagram: text(object, &["instagram", "instagram_url"]),
            twitter: text(object, &["twitter", "twitter_url"]),
            tiktok: text(object, &["tiktok", "tiktok_url"]),
            threads: text(object, &["threads", "threads_url"]),
        },
        work: text(object, &["work"]),
        wiki_url: text(object, &["wikiURL", "wiki_url"]),
        babepedia: text(object, &["babepedia"]),
        notes: text(object, &["notes"]),
    }
}

fn text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::String(value) if !value.trim().is_empty() => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    })
}

fn number(object: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| {
        let parsed = match object.get(*key)? {
            Value::Number(value) => value.as_f64(),
            Value::String(value) => value.trim().parse::<f64>().ok(),
            _ => None,
        };
        finite(parsed)
    })
}

fn flag(object: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::Bool(value) => Some(*value),
        Value::Number(value) => value.as_f64().map(|number| number != 0.0),
        Value::String(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn traits(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::String(value)) => parse_traits(value),
        Some(Value::Array(items)) => {
            let names = items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            parse_traits(&join_traits(&names))
        }
        _ => Vec::new(),
    }
}
