use crate::models::Profile;

/// Returns the profiles matching `query`, in their original order.
///
/// A blank query returns every profile. Otherwise a profile matches when its
/// name, traits, work, hair color or bra size contains the query
/// (case-insensitive), or when the query is an ordered subsequence of the
/// name. There is no ranking.
#[must_use]
pub fn fuzzy_search<'a>(profiles: &'a [Profile], query: &str) -> Vec<&'a Profile> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return profiles.iter().collect();
    }
    profiles
        .iter()
        .filter(|profile| matches_normalized(profile, &needle))
        .collect()
}

#[must_use]
pub fn matches_query(profile: &Profile, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty() || matches_normalized(profile, &needle)
}

fn matches_normalized(profile: &Profile, needle: &str) -> bool {
    let data = &profile.data;
    let name = data.name.to_lowercase();
    if name.contains(needle) {
        return true;
    }

    let traits = data.traits_text();
    let fields = [
        traits.as_deref(),
        data.work.as_deref(),
        data.hair_color.as_deref(),
        data.bra_size.as_deref(),
    ];
    if fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    {
        return true;
    }

    is_subsequence(needle, &name)
}

/// First-greedy scan: walk `haystack` once, advancing through `needle` on
/// every equal character.
#[must_use]
pub fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut pending = needle.chars().peekable();
    for ch in haystack.chars() {
        match pending.peek() {
            Some(expected) if *expected == ch => {
                pending.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    pending.peek().is_none()
}
