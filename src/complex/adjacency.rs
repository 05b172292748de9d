use super::{
  incidence::{boundary_operator, face_relation, IndexedMatrix},
  Complex,
};
use crate::{error::Result, sparse::SparseMatrix, Rank};

/// Drops the diagonal and, given a threshold `s`, replaces counts by
/// indicators of `count >= s`.
fn counts_to_adjacency(counts: SparseMatrix, s: Option<usize>) -> SparseMatrix {
  let (nrows, ncols, triplets) = counts.compress().into_parts();
  let triplets = triplets
    .into_iter()
    .filter(|&(r, c, _)| r != c)
    .filter_map(|(r, c, v)| match s {
      Some(s) => (v >= s as f64).then_some((r, c, 1.0)),
      None => Some((r, c, v)),
    })
    .collect();
  SparseMatrix::new(nrows, ncols, triplets)
}

/// Two `rank` entities are adjacent iff they are faces of a common
/// `rank + 1` entity.
pub fn adjacency_matrix<C: Complex + ?Sized>(complex: &C, rank: Rank) -> Result<SparseMatrix> {
  complex.check_rank(rank)?;
  let boundary = boundary_operator(complex, rank + 1, false)?.matrix;
  let counts = boundary.matmul(&boundary.transpose());
  Ok(counts_to_adjacency(counts, Some(1)))
}

/// Two `rank` entities are coadjacent iff they share a `rank - 1` face.
pub fn coadjacency_matrix<C: Complex + ?Sized>(complex: &C, rank: Rank) -> Result<SparseMatrix> {
  complex.check_rank(rank)?;
  let boundary = boundary_operator(complex, rank, false)?.matrix;
  let counts = boundary.transpose().matmul(&boundary);
  Ok(counts_to_adjacency(counts, Some(1)))
}

/// Counts for every pair of `rank` entities the `via` entities they share:
/// common faces if `via < rank`, common cofaces if `via > rank`.
pub fn adjacency_via<C: Complex + ?Sized>(
  complex: &C,
  rank: Rank,
  via: Rank,
  s: Option<usize>,
) -> Result<IndexedMatrix<C::Key, C::Key>> {
  complex.check_rank(rank)?;
  complex.check_rank(via)?;
  let keys = complex.rank_index(rank);
  let vias = complex.rank_index(via);
  let counts = if via < rank {
    let relation = face_relation(complex, &vias, &keys, via)?;
    relation.transpose().matmul(&relation)
  } else if via > rank {
    let relation = face_relation(complex, &keys, &vias, rank)?;
    relation.matmul(&relation.transpose())
  } else {
    SparseMatrix::zeros(keys.len(), keys.len())
  };
  Ok(IndexedMatrix {
    rows: keys.clone(),
    cols: keys,
    matrix: counts_to_adjacency(counts, s),
  })
}

/// Nodes against every entity of rank at least one.
pub fn node_to_all_cell_incidence<C: Complex + ?Sized>(
  complex: &C,
) -> IndexedMatrix<C::Key, C::Key> {
  let rows = complex.rank_index(0);
  let cols = complex.cell_index();
  // every column key is stored, so the face lookup cannot fail
  let matrix = face_relation(complex, &rows, &cols, 0)
    .unwrap_or_else(|_| SparseMatrix::zeros(rows.len(), cols.len()));
  IndexedMatrix { rows, cols, matrix }
}

/// Number of cells shared by two nodes.
pub fn node_to_all_cell_adjacency<C: Complex + ?Sized>(
  complex: &C,
  s: Option<usize>,
) -> IndexedMatrix<C::Key, C::Key> {
  let IndexedMatrix { rows, matrix, .. } = node_to_all_cell_incidence(complex);
  let counts = matrix.matmul(&matrix.transpose());
  IndexedMatrix {
    cols: rows.clone(),
    rows,
    matrix: counts_to_adjacency(counts, s),
  }
}

/// Number of nodes shared by two cells.
pub fn all_cell_to_node_coadjacency<C: Complex + ?Sized>(
  complex: &C,
  s: Option<usize>,
) -> IndexedMatrix<C::Key, C::Key> {
  let IndexedMatrix { cols, matrix, .. } = node_to_all_cell_incidence(complex);
  let counts = matrix.transpose().matmul(&matrix);
  IndexedMatrix {
    rows: cols.clone(),
    cols,
    matrix: counts_to_adjacency(counts, s),
  }
}
