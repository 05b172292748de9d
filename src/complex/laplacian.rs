use super::{
  incidence::{boundary_operator, IndexedMatrix},
  Complex,
};
use crate::{
  error::{ComplexError, Result},
  sparse::SparseMatrix,
  Rank,
};

fn check_weights(weights: &na::DVector<f64>, expected: usize) -> Result<()> {
  if weights.len() != expected {
    return Err(ComplexError::WeightMismatch {
      expected,
      got: weights.len(),
    });
  }
  Ok(())
}

/// $L^up_k = B_(k+1) W B_(k+1)^T$, weights indexed by the `rank + 1` entities.
///
/// Vanishes at the top rank.
pub fn up_laplacian<C: Complex + ?Sized>(
  complex: &C,
  rank: Rank,
  weights: Option<&na::DVector<f64>>,
) -> Result<SparseMatrix> {
  complex.check_rank(rank)?;
  let boundary = boundary_operator(complex, rank + 1, true)?.matrix;
  let weighted = match weights {
    Some(w) => {
      check_weights(w, boundary.ncols())?;
      boundary.mul_right_by_diagonal(w)
    }
    None => boundary.clone(),
  };
  Ok(weighted.matmul(&boundary.transpose()))
}

/// $L^down_k = B_k^T W B_k$, weights indexed by the `rank - 1` entities.
///
/// Vanishes at rank zero.
pub fn down_laplacian<C: Complex + ?Sized>(
  complex: &C,
  rank: Rank,
  weights: Option<&na::DVector<f64>>,
) -> Result<SparseMatrix> {
  complex.check_rank(rank)?;
  let boundary = boundary_operator(complex, rank, true)?.matrix;
  let weighted = match weights {
    Some(w) => {
      check_weights(w, boundary.nrows())?;
      boundary.mul_left_by_diagonal(w)
    }
    None => boundary.clone(),
  };
  Ok(boundary.transpose().matmul(&weighted))
}

/// Sum of the up and down Laplacians, each with its own optional weights.
pub fn hodge_laplacian<C: Complex + ?Sized>(
  complex: &C,
  rank: Rank,
  up_weights: Option<&na::DVector<f64>>,
  down_weights: Option<&na::DVector<f64>>,
) -> Result<SparseMatrix> {
  let up = up_laplacian(complex, rank, up_weights)?;
  let down = down_laplacian(complex, rank, down_weights)?;
  Ok(up.add(&down))
}

/// The Hodge Laplacian with the `rank` keys labelling rows and columns.
pub fn hodge_laplacian_indexed<C: Complex + ?Sized>(
  complex: &C,
  rank: Rank,
) -> Result<IndexedMatrix<C::Key, C::Key>> {
  let matrix = hodge_laplacian(complex, rank, None, None)?;
  let keys = complex.rank_index(rank);
  Ok(IndexedMatrix {
    rows: keys.clone(),
    cols: keys,
    matrix,
  })
}
