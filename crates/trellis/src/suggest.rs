//! "Did you mean" suggestions for unresolved names.

/// Levenshtein edit distance between `a` and `b`, counted in characters.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Similarity of `a` and `b` between 0 (nothing in common) and 1 (equal).
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// The candidate most similar to `name`, if its similarity reaches
/// `threshold`.
///
/// Ties go to the earlier candidate. `name` itself is never suggested.
pub fn suggest<'a, I>(name: &str, candidates: I, threshold: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        if candidate == name {
            continue;
        }
        let score = similarity(name, candidate);
        if score < threshold {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("formatPrise", "formatPrice"), 1);
        assert_eq!(edit_distance("abc", ""), 3);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("same", "same"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_suggest_closest_above_threshold() {
        let names = ["formatDate", "formatPrice", "Header"];

        assert_eq!(suggest("formatPrise", names, 0.6), Some("formatPrice"));
        assert_eq!(suggest("Footer", names, 0.9), None);
    }

    #[test]
    fn test_suggest_prefers_earlier_on_tie() {
        assert_eq!(suggest("cat", ["bat", "hat"], 0.5), Some("bat"));
    }

    #[test]
    fn test_suggest_skips_exact_name() {
        assert_eq!(suggest("Header", ["Header"], 0.0), None);
    }
}
