//! Cyclic sequences up to rotation and reflection.
//!
//! A polygon boundary `[a, b, c, d]` describes the same cell as any of its
//! rotations (`[c, d, a, b]`) or reflections (`[d, c, b, a]`). Every such orbit
//! has exactly one representative, the lexicographically smallest member,
//! which is used as lookup key.

/// Drops an explicit closing element (`[a, b, c, a]` becomes `[a, b, c]`).
pub fn open_cycle<N: PartialEq>(mut seq: Vec<N>) -> Vec<N> {
  if seq.len() > 1 && seq.first() == seq.last() {
    seq.pop();
  }
  seq
}

/// The successive pairs of the closed traversal, including `(last, first)`.
pub fn cycle_pairs<N>(seq: &[N]) -> impl Iterator<Item = (&N, &N)> {
  seq.iter().zip(seq.iter().cycle().skip(1))
}

fn rotated<N: Clone>(seq: &[N], shift: usize) -> Vec<N> {
  seq[shift..].iter().chain(&seq[..shift]).cloned().collect()
}

/// The representative of the rotation/reflection orbit of `seq`.
pub fn canonical_cycle<N: Ord + Clone>(seq: &[N]) -> Vec<N> {
  let reversed: Vec<N> = seq.iter().rev().cloned().collect();
  [seq, reversed.as_slice()]
    .into_iter()
    .flat_map(|s| (0..s.len()).map(move |shift| rotated(s, shift)))
    .min()
    .unwrap_or_default()
}

pub fn is_cycle_equivalent<N: Ord + Clone>(a: &[N], b: &[N]) -> bool {
  a.len() == b.len() && canonical_cycle(a) == canonical_cycle(b)
}

/// Whether some element occurs twice.
pub fn has_repeats<N: Ord>(seq: &[N]) -> bool {
  let mut seen = std::collections::BTreeSet::new();
  !seq.iter().all(|n| seen.insert(n))
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn orbit_representative() {
    let canon = canonical_cycle(&[3, 4, 1, 2]);
    assert_eq!(canon, vec![1, 2, 3, 4]);
    assert_eq!(canonical_cycle(&[4, 3, 2, 1]), canon);
    assert_eq!(canonical_cycle(&[2, 1, 4, 3]), canon);
    assert_ne!(canonical_cycle(&[1, 3, 2, 4]), canon);
  }

  #[test]
  fn equivalence() {
    assert!(is_cycle_equivalent(&[1, 2, 3, 4], &[2, 3, 4, 1]));
    assert!(is_cycle_equivalent(&[1, 2, 3, 4], &[4, 3, 2, 1]));
    assert!(!is_cycle_equivalent(&[1, 2, 3, 4], &[1, 2, 7, 3]));
    assert!(!is_cycle_equivalent(&[1, 2, 3], &[1, 2, 3, 1, 2, 3]));
  }

  #[test]
  fn closing_element_and_pairs() {
    let seq = open_cycle(vec![1, 2, 3, 1]);
    assert_eq!(seq, vec![1, 2, 3]);
    let pairs: Vec<_> = cycle_pairs(&seq).map(|(a, b)| (*a, *b)).collect();
    assert_eq!(pairs, vec![(1, 2), (2, 3), (3, 1)]);
    assert!(has_repeats(&[2, 3, 4, 5, 2, 3, 4, 5]));
    assert!(!has_repeats(&[1, 2, 3]));
  }
}
