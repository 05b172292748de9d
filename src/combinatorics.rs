//! Combinatorial helpers shared by simplices and cells.

pub mod cycle;
mod sign;

pub use sign::*;

use crate::Rank;

pub fn binomial(n: usize, k: usize) -> usize {
  num_integer::binomial(n, k)
}

/// Number of `sub_rank`-faces of a `rank`-simplex.
pub fn nsubsimplices(rank: Rank, sub_rank: Rank) -> usize {
  binomial(rank + 1, sub_rank + 1)
}
