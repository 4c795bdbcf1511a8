use profiledex_core::models::parse_traits;
use profiledex_core::{Measurements, ProfileData};

use crate::cli::ProfileInputArgs;

/// Overlays the flags that were given onto `data`. An empty string clears a
/// text field.
pub(super) fn apply_flags(data: &mut ProfileData, args: ProfileInputArgs) {
    let ProfileInputArgs {
        json: _,
        name,
        photo_url,
        bra_size,
        bust,
        waist,
        hips,
        underbust,
        height,
        weight,
        hair_color,
        metric,
        traits,
        fictional,
        instagram,
        twitter,
        tiktok,
        threads,
        work,
        wiki_url,
        babepedia,
        notes,
    } = args;

    if let Some(name) = name {
        data.name = name.trim().to_string();
    }
    let current = data.measurements;
    data.measurements = Measurements::new(
        bust.or(current.bust),
        waist.or(current.waist),
        hips.or(current.hips),
    );
    set_number(&mut data.underbust, underbust);
    set_number(&mut data.height, height);
    set_number(&mut data.weight, weight);
    if let Some(metric) = metric {
        data.is_metric = Some(metric);
    }
    if let Some(fictional) = fictional {
        data.is_fictional = Some(fictional);
    }
    if let Some(traits) = traits {
        data.traits = parse_traits(&traits);
    }
    set_text(&mut data.photo_url, photo_url);
    set_text(&mut data.bra_size, bra_size);
    set_text(&mut data.hair_color, hair_color);
    set_text(&mut data.social.instagram, instagram);
    set_text(&mut data.social.twitter, twitter);
    set_text(&mut data.social.tiktok, tiktok);
    set_text(&mut data.social.threads, threads);
    set_text(&mut data.work, work);
    set_text(&mut data.wiki_url, wiki_url);
    set_text(&mut data.babepedia, babepedia);
    set_text(&mut data.notes, notes);
}

fn set_text(slot: &mut Option<String>, value: Option<String>) {
    let Some(value) = value else {
        return;
    };
    let value = value.trim();
    *slot = (!value.is_empty()).then(|| value.to_string());
}

fn set_number(slot: &mut Option<f64>, value: Option<f64>) {
    if let Some(value) = value.filter(|value| value.is_finite()) {
        *slot = Some(value);
    }
}
