//! Nearest-name search used for "generator not found" hints.

/// Shortest candidate considered for substring matches.
const MIN_SUBSTRING_LEN: usize = 3;

/// Return up to `limit` candidates close to `name`, best first.
///
/// A candidate qualifies when its edit distance to `name` is within a
/// length-scaled threshold, or when one name contains the other. Ties are
/// broken by name so the result is stable for a fixed candidate set.
pub fn nearest_names<'a, I>(name: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = name.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }
    let threshold = (needle.chars().count() / 3).max(2);

    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let distance = levenshtein(&needle, candidate);
            let contains = candidate.len() >= MIN_SUBSTRING_LEN
                && (candidate.contains(needle.as_str()) || needle.contains(candidate));
            (distance <= threshold || contains).then_some((distance, candidate))
        })
        .collect();

    scored.sort_unstable();
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// Levenshtein distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != *b_char);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
