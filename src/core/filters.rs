use crate::models::{Profile, ProfileFilter, SortOrder};
use std::cmp::Ordering;

/// Case-insensitive substring match of `pattern` against the profile subject
#[inline]
pub fn matches_subject(profile: &Profile, pattern: &str) -> bool {
    profile
        .subject
        .to_lowercase()
        .contains(&pattern.to_lowercase())
}

/// Escape `%`, `_` and `\` so a pattern matches literally inside a LIKE clause
pub fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Compare two profiles by xp level in the given direction
#[inline]
pub fn compare_xp(a: &Profile, b: &Profile, order: SortOrder) -> Ordering {
    let ord = a
        .xp_level
        .partial_cmp(&b.xp_level)
        .unwrap_or(Ordering::Equal);

    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

/// Apply a listing filter to profiles given in creation order
///
/// The sort is stable, so profiles with equal xp keep their creation order.
pub fn apply_filter<'a, I>(profiles: I, filter: &ProfileFilter) -> Vec<Profile>
where
    I: IntoIterator<Item = &'a Profile>,
{
    let mut selected: Vec<Profile> = match filter.effective_subject() {
        Some(pattern) => profiles
            .into_iter()
            .filter(|p| matches_subject(p, pattern))
            .cloned()
            .collect(),
        None => profiles.into_iter().cloned().collect(),
    };

    if let Some(order) = filter.sort_by_xp_level {
        selected.sort_by(|a, b| compare_xp(a, b, order));
    }

    selected
}
