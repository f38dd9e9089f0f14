use std::collections::HashMap;
use std::hash::Hash;

pub fn tally<T, I>(values: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut slots: HashMap<T, usize> = HashMap::new();
    let mut tallies: Vec<(T, usize)> = Vec::new();
    for value in values {
        match slots.get(&value) {
            Some(&idx) => tallies[idx].1 += 1,
            None => {
                slots.insert(value.clone(), tallies.len());
                tallies.push((value, 1));
            }
        }
    }
    tallies
}

/// Most frequent value. Ties go to the value encountered first.
pub fn mode<T, I>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut best: Option<(T, usize)> = None;
    for (value, count) in tally(values) {
        let better = match &best {
            Some((_, best_count)) => count > *best_count,
            None => true,
        };
        if better {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Median that always returns an observed value: for an even count the lower
/// of the two middle values.
pub fn lower_median(values: &[u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.get((sorted.len() - 1) / 2).copied()
}

#[cfg(test)]
mod tests {
    use super::{lower_median, mode, tally};

    #[test]
    fn mode_picks_most_frequent() {
        assert_eq!(mode(["A", "A", "B"]), Some("A"));
        assert_eq!(mode(["B", "A", "A"]), Some("A"));
    }

    #[test]
    fn mode_ties_go_to_first_seen() {
        assert_eq!(mode(["B", "A", "A", "B"]), Some("B"));
        assert_eq!(mode(["C", "A", "B"]), Some("C"));
        assert_eq!(mode(Vec::<&str>::new()), None);
    }

    #[test]
    fn lower_median_for_even_counts() {
        assert_eq!(lower_median(&[1, 2, 3, 4]), Some(2));
        assert_eq!(lower_median(&[4, 3, 2, 1]), Some(2));
        assert_eq!(lower_median(&[9, 1, 5]), Some(5));
        assert_eq!(lower_median(&[7]), Some(7));
        assert_eq!(lower_median(&[]), None);
    }

    #[test]
    fn tally_preserves_first_seen_order() {
        let counts = tally(["x", "y", "x", "z", "x"]);
        assert_eq!(counts, vec![("x", 3), ("y", 1), ("z", 1)]);
    }
}
