// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Did-you-mean suggestions for misspelled names.

/// Compute edit distance (Levenshtein) between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, a_ch) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_ch) in b.iter().enumerate() {
            let cost = if a_ch == b_ch { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Find the best match for `name` among `candidates`.
///
/// Returns `Some("did you mean `closest`?")` if a close match is found.
pub fn did_you_mean<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let max_distance = match name.len() {
        0..=2 => 1,
        3..=5 => 2,
        _ => 3,
    };

    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        if candidate == name || name.len().abs_diff(candidate.len()) > max_distance {
            continue;
        }

        let dist = edit_distance(name, candidate);
        if dist <= max_distance && best.map_or(true, |(_, d)| dist < d) {
            best = Some((candidate, dist));
        }
    }

    best.map(|(c, _)| format!("did you mean `{}`?", c))
}
