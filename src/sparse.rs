/// Sparse matrix in triplet form.
///
/// Duplicate entries are allowed and are summed on conversion.
#[derive(Default, Debug, Clone)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self::new(nrows, ncols, Vec::new())
  }
  pub fn new(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, f64)>) -> Self {
    Self {
      nrows,
      ncols,
      triplets,
    }
  }
  pub fn identity(n: usize) -> Self {
    Self::new(n, n, (0..n).map(|i| (i, i, 1.0)).collect())
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn shape(&self) -> (usize, usize) {
    (self.nrows, self.ncols)
  }
  pub fn triplets(&self) -> &[(usize, usize, f64)] {
    &self.triplets
  }
  pub fn into_parts(self) -> (usize, usize, Vec<(usize, usize, f64)>) {
    (self.nrows, self.ncols, self.triplets)
  }

  pub fn push(&mut self, r: usize, c: usize, v: f64) {
    assert!(r < self.nrows && c < self.ncols);
    if v != 0.0 {
      self.triplets.push((r, c, v));
    }
  }

  /// Sums duplicates and drops explicit zeros.
  pub fn compress(&self) -> Self {
    Self::from_nalgebra_csr(&self.to_nalgebra_csr())
  }

  /// Number of structurally nonzero entries after summing duplicates.
  pub fn nnz(&self) -> usize {
    self.compress().triplets.len()
  }

  pub fn transpose(&self) -> Self {
    let triplets = self.triplets.iter().map(|&(r, c, v)| (c, r, v)).collect();
    Self::new(self.ncols, self.nrows, triplets)
  }

  pub fn mul_left_by_diagonal(&self, diagonal: &na::DVector<f64>) -> Self {
    assert_eq!(diagonal.len(), self.nrows);
    let triplets = self
      .triplets
      .iter()
      .map(|&(r, c, v)| (r, c, v * diagonal[r]))
      .collect();
    Self::new(self.nrows, self.ncols, triplets)
  }

  pub fn mul_right_by_diagonal(&self, diagonal: &na::DVector<f64>) -> Self {
    assert_eq!(diagonal.len(), self.ncols);
    let triplets = self
      .triplets
      .iter()
      .map(|&(r, c, v)| (r, c, v * diagonal[c]))
      .collect();
    Self::new(self.nrows, self.ncols, triplets)
  }

  pub fn matmul(&self, other: &Self) -> Self {
    assert_eq!(self.ncols, other.nrows, "incompatible matrix shapes");
    let product = &self.to_nalgebra_csr() * &other.to_nalgebra_csr();
    Self::from_nalgebra_csr(&product)
  }

  pub fn add(&self, other: &Self) -> Self {
    assert_eq!(self.shape(), other.shape(), "incompatible matrix shapes");
    let mut triplets = self.triplets.clone();
    triplets.extend_from_slice(&other.triplets);
    Self::new(self.nrows, self.ncols, triplets).compress()
  }

  /// Entry at `(r, c)` with duplicates summed.
  pub fn get(&self, r: usize, c: usize) -> f64 {
    self
      .triplets
      .iter()
      .filter(|t| t.0 == r && t.1 == c)
      .map(|t| t.2)
      .sum()
  }

  pub fn from_nalgebra_csr(matrix: &nas::CsrMatrix<f64>) -> Self {
    let triplets = matrix
      .triplet_iter()
      .filter(|&(_, _, &v)| v != 0.0)
      .map(|(r, c, &v)| (r, c, v))
      .collect();
    Self::new(matrix.nrows(), matrix.ncols(), triplets)
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let mut coo = nas::CooMatrix::new(self.nrows, self.ncols);
    for &(r, c, v) in &self.triplets {
      coo.push(r, c, v);
    }
    coo
  }

  pub fn to_nalgebra_csr(&self) -> nas::CsrMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }
}

#[cfg(test)]
mod test {
  use super::SparseMatrix;

  #[test]
  fn product_and_sum() {
    let a = SparseMatrix::new(2, 3, vec![(0, 0, 1.0), (0, 2, -1.0), (1, 1, 2.0)]);
    let ata = a.transpose().matmul(&a);
    assert_eq!(ata.shape(), (3, 3));
    assert_eq!(ata.get(0, 2), -1.0);
    assert_eq!(ata.get(1, 1), 4.0);

    let sum = ata.add(&SparseMatrix::identity(3));
    assert_eq!(sum.get(0, 0), 2.0);
  }

  #[test]
  fn duplicates_are_summed() {
    let m = SparseMatrix::new(1, 1, vec![(0, 0, 1.0), (0, 0, -1.0)]);
    assert_eq!(m.nnz(), 0);
    assert_eq!(m.to_nalgebra_dense()[(0, 0)], 0.0);
  }

  #[test]
  fn empty_products() {
    let a = SparseMatrix::zeros(3, 0);
    let p = a.matmul(&a.transpose());
    assert_eq!(p.shape(), (3, 3));
    assert_eq!(p.nnz(), 0);
  }
}
