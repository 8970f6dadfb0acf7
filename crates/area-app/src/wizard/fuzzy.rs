//! Type-to-filter matching for the service list.

/// Indices of `items` matching `query`, best match first.
///
/// An empty query keeps every item in its original order.
pub fn fuzzy_filter<S: AsRef<str>>(query: &str, items: &[S]) -> Vec<usize> {
    let query: Vec<char> = query.trim().to_lowercase().chars().collect();
    if query.is_empty() {
        return (0..items.len()).collect();
    }

    let mut scored: Vec<(usize, i32)> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| score(&query, item.as_ref()).map(|s| (index, s)))
        .collect();

    // Higher score first, original order on ties
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(index, _)| index).collect()
}

/// Subsequence score: `None` when `query` is not a subsequence of `target`.
fn score(query: &[char], target: &str) -> Option<i32> {
    let target: Vec<char> = target.to_lowercase().chars().collect();
    let mut matched = 0;
    let mut total = 0;
    let mut previous: Option<usize> = None;

    for (i, &c) in target.iter().enumerate() {
        if matched == query.len() {
            break;
        }
        if c != query[matched] {
            continue;
        }
        total += 10;
        if previous.is_some_and(|p| p + 1 == i) {
            total += 15;
        }
        if i == 0 || matches!(target[i - 1], '_' | '-' | ' ' | ':') {
            total += 10;
        }
        previous = Some(i);
        matched += 1;
    }

    if matched < query.len() {
        return None;
    }
    Some(total - target.len() as i32 / 5)
}
