//! Index pair enumeration ported from Python's `itertools`.

/// All pairs `(i, j)` with `i < j` over `0..n`, like `itertools.combinations(range(n), 2)`.
pub fn combinations2(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// All ordered pairs `(i, j)` with `i != j` over `0..n`, like `itertools.permutations(range(n), 2)`.
pub fn permutations2(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1));
    for i in 0..n {
        for j in 0..n {
            if i != j {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinations2() {
        assert_eq!(combinations2(3), vec![(0, 1), (0, 2), (1, 2)]);
        assert!(combinations2(1).is_empty());
        assert!(combinations2(0).is_empty());
        assert_eq!(combinations2(19).len(), 171);
    }

    #[test]
    fn test_permutations2() {
        assert_eq!(
            permutations2(3),
            vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)]
        );
        assert!(permutations2(1).is_empty());
    }
}
