use crate::models::Profile;
use std::cmp::Ordering;

/// Popularity order: rating descending, then creation time ascending, then id
#[inline]
pub fn compare_popularity(a: &Profile, b: &Profile) -> Ordering {
    b.rating
        .partial_cmp(&a.rating)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Top `limit` profiles by popularity
///
/// Same order as the Postgres store's `ORDER BY rating DESC, created_at ASC, id ASC`.
pub fn top_by_rating<'a, I>(profiles: I, limit: usize) -> Vec<Profile>
where
    I: IntoIterator<Item = &'a Profile>,
{
    if limit == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<&Profile> = profiles.into_iter().collect();
    ranked.sort_by(|a, b| compare_popularity(a, b));
    ranked.into_iter().take(limit).cloned().collect()
}
