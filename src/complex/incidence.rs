use super::Complex;
use crate::{
  error::{ComplexError, Result},
  sparse::SparseMatrix,
  Rank,
};

use indexmap::IndexMap;

/// A matrix together with the keys labelling its rows and columns.
#[derive(Debug, Clone)]
pub struct IndexedMatrix<R, C> {
  pub rows: IndexMap<R, usize>,
  pub cols: IndexMap<C, usize>,
  pub matrix: SparseMatrix,
}

/// $diff_k: C_k -> C_(k-1)$
///
/// Rows are the `rank - 1` entities, columns the `rank` entities, both in
/// insertion order. Signed entries follow the boundary orientation, unsigned
/// entries count how often a face is traversed.
pub fn incidence_matrix<C: Complex + ?Sized>(
  complex: &C,
  rank: Rank,
  signed: bool,
) -> Result<IndexedMatrix<C::Key, C::Key>> {
  complex.check_rank(rank)?;
  boundary_operator(complex, rank, signed)
}

/// Like [`incidence_matrix`] but for any rank; ranks without entities yield
/// matrices without columns.
pub(crate) fn boundary_operator<C: Complex + ?Sized>(
  complex: &C,
  rank: Rank,
  signed: bool,
) -> Result<IndexedMatrix<C::Key, C::Key>> {
  let cols = complex.rank_index(rank);
  if rank == 0 {
    let matrix = SparseMatrix::zeros(0, cols.len());
    return Ok(IndexedMatrix {
      rows: IndexMap::new(),
      cols,
      matrix,
    });
  }

  let rows = complex.rank_index(rank - 1);
  let mut matrix = SparseMatrix::zeros(rows.len(), cols.len());
  for (sup, &icol) in &cols {
    for (sub, sign) in complex.boundary_terms(sup) {
      let irow = *rows
        .get(&sub)
        .ok_or_else(|| ComplexError::key_missing(&sub, rank - 1))?;
      let value = if signed { sign.as_f64() } else { 1.0 };
      matrix.push(irow, icol, value);
    }
  }
  Ok(IndexedMatrix {
    rows,
    cols,
    matrix: matrix.compress(),
  })
}

/// 0/1 matrix relating `lower`-rank entities to the `upper`-rank entities
/// having them as faces.
pub fn incidence_between<C: Complex + ?Sized>(
  complex: &C,
  lower: Rank,
  upper: Rank,
) -> Result<IndexedMatrix<C::Key, C::Key>> {
  complex.check_rank(upper)?;
  if lower > upper {
    return Err(ComplexError::InvalidRank {
      rank: lower,
      max: upper,
    });
  }
  let rows = complex.rank_index(lower);
  let cols = complex.rank_index(upper);
  let matrix = face_relation(complex, &rows, &cols, lower)?;
  Ok(IndexedMatrix { rows, cols, matrix })
}

/// Entry `(i, j)` is one iff row key `i` is a `rank`-face of column key `j`
/// (or equal to it).
pub(crate) fn face_relation<C: Complex + ?Sized>(
  complex: &C,
  rows: &IndexMap<C::Key, usize>,
  cols: &IndexMap<C::Key, usize>,
  rank: Rank,
) -> Result<SparseMatrix> {
  let mut matrix = SparseMatrix::zeros(rows.len(), cols.len());
  for (sup, &icol) in cols {
    for sub in complex.store().faces_of_rank(sup, rank)? {
      if let Some(&irow) = rows.get(&sub) {
        matrix.push(irow, icol, 1.0);
      }
    }
  }
  Ok(matrix)
}
