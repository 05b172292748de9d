//! Operators shared by every kind of complex.
//!
//! A concrete complex only describes its store, its admissible ranks and the
//! oriented boundary of each entity. Incidence matrices, Laplacians,
//! adjacency structures and connectivity queries are all derived from that.

pub mod adjacency;
pub mod connectivity;
pub mod incidence;
pub mod laplacian;

pub use connectivity::{Components, Distance};
pub use incidence::IndexedMatrix;

use crate::{
  attribute::AttrValue,
  combinatorics::Sign,
  error::{ComplexError, Result},
  sparse::SparseMatrix,
  store::{Store, StoreKey},
  Node, Rank,
};

use indexmap::{IndexMap, IndexSet};

pub trait Complex {
  type Node: Node;
  type Key: StoreKey;

  fn store(&self) -> &Store<Self::Key>;

  /// Highest rank operators may be requested for.
  fn rank_bound(&self) -> Rank;

  /// The codimension-one faces of `key` with their induced orientation.
  /// A face traversed several times is listed several times.
  fn boundary_terms(&self, key: &Self::Key) -> Vec<(Self::Key, Sign)>;

  fn node_key(&self, node: &Self::Node) -> Self::Key;

  /// The distinct nodes of an entity.
  fn nodes_of(&self, key: &Self::Key) -> Vec<Self::Node>;

  /// The subcomplex of all entities whose nodes lie in `nodes`.
  fn restrict_to_nodes(&self, nodes: &[Self::Node]) -> Result<Self>
  where
    Self: Sized;

  /// The subcomplex generated by `keys` and their faces.
  fn restrict_to_cells(&self, keys: &[Self::Key]) -> Result<Self>
  where
    Self: Sized;

  /// Highest stored rank, zero for an empty complex.
  fn dim(&self) -> Rank {
    self.store().max_rank().unwrap_or(0)
  }
  fn shape(&self) -> Vec<usize> {
    self.store().shape()
  }
  fn nentities(&self, rank: Rank) -> usize {
    self.store().len(rank)
  }
  fn contains_key(&self, key: &Self::Key) -> bool {
    self.store().contains(key)
  }

  fn check_rank(&self, rank: Rank) -> Result<()> {
    let max = self.rank_bound();
    if rank > max {
      return Err(ComplexError::InvalidRank { rank, max });
    }
    Ok(())
  }

  /// Keys of `rank` mapped to their position in insertion order.
  fn rank_index(&self, rank: Rank) -> IndexMap<Self::Key, usize> {
    index_of(self.store().keys(rank).cloned())
  }

  /// Keys of every rank-≥1 entity, ranks ascending.
  fn cell_index(&self) -> IndexMap<Self::Key, usize> {
    let max = self.store().max_rank().unwrap_or(0);
    index_of((1..=max).flat_map(|r| self.store().keys(r).cloned()))
  }

  fn is_maximal(&self, key: &Self::Key) -> Result<bool> {
    self.store().is_maximal(key)
  }
  fn membership(&self, key: &Self::Key) -> Result<&IndexSet<Self::Key>> {
    self.store().membership(key)
  }
  fn attribute(&self, key: &Self::Key, name: &str) -> Result<&AttrValue> {
    self.store().attribute(key, name)
  }

  /// The numeric level stored under `name`, for every entity carrying it,
  /// in rank order.
  fn filtration(&self, name: &str) -> Result<IndexMap<Self::Key, f64>> {
    self
      .store()
      .iter()
      .filter_map(|(key, record)| {
        let value = record.attributes().get(name)?;
        Some(match value.as_f64() {
          Some(level) => Ok((key.clone(), level)),
          None => Err(ComplexError::non_numeric(key, name)),
        })
      })
      .collect()
  }

  fn euler_characteristic(&self) -> i64 {
    self
      .shape()
      .iter()
      .enumerate()
      .map(|(r, &n)| if r % 2 == 0 { n as i64 } else { -(n as i64) })
      .sum()
  }

  fn incidence_matrix(&self, rank: Rank, signed: bool) -> Result<SparseMatrix> {
    self
      .incidence_matrix_indexed(rank, signed)
      .map(|indexed| indexed.matrix)
  }
  fn incidence_matrix_indexed(
    &self,
    rank: Rank,
    signed: bool,
  ) -> Result<IndexedMatrix<Self::Key, Self::Key>> {
    incidence::incidence_matrix(self, rank, signed)
  }
  fn incidence_between(
    &self,
    lower: Rank,
    upper: Rank,
  ) -> Result<IndexedMatrix<Self::Key, Self::Key>> {
    incidence::incidence_between(self, lower, upper)
  }

  fn up_laplacian(&self, rank: Rank) -> Result<SparseMatrix> {
    laplacian::up_laplacian(self, rank, None)
  }
  fn down_laplacian(&self, rank: Rank) -> Result<SparseMatrix> {
    laplacian::down_laplacian(self, rank, None)
  }
  fn hodge_laplacian(&self, rank: Rank) -> Result<SparseMatrix> {
    laplacian::hodge_laplacian(self, rank, None, None)
  }
  fn hodge_laplacian_indexed(&self, rank: Rank) -> Result<IndexedMatrix<Self::Key, Self::Key>> {
    laplacian::hodge_laplacian_indexed(self, rank)
  }
  /// Up weights are indexed by the `rank + 1` entities, down weights by the
  /// `rank - 1` entities.
  fn hodge_laplacian_weighted(
    &self,
    rank: Rank,
    up_weights: Option<&na::DVector<f64>>,
    down_weights: Option<&na::DVector<f64>>,
  ) -> Result<SparseMatrix> {
    laplacian::hodge_laplacian(self, rank, up_weights, down_weights)
  }
  fn up_laplacian_weighted(&self, rank: Rank, weights: &na::DVector<f64>) -> Result<SparseMatrix> {
    laplacian::up_laplacian(self, rank, Some(weights))
  }
  fn down_laplacian_weighted(
    &self,
    rank: Rank,
    weights: &na::DVector<f64>,
  ) -> Result<SparseMatrix> {
    laplacian::down_laplacian(self, rank, Some(weights))
  }

  fn adjacency_matrix(&self, rank: Rank) -> Result<SparseMatrix> {
    adjacency::adjacency_matrix(self, rank)
  }
  fn coadjacency_matrix(&self, rank: Rank) -> Result<SparseMatrix> {
    adjacency::coadjacency_matrix(self, rank)
  }
  fn adjacency_via(
    &self,
    rank: Rank,
    via: Rank,
    s: Option<usize>,
  ) -> Result<IndexedMatrix<Self::Key, Self::Key>> {
    adjacency::adjacency_via(self, rank, via, s)
  }
  fn node_to_all_cell_incidence(&self) -> IndexedMatrix<Self::Key, Self::Key> {
    adjacency::node_to_all_cell_incidence(self)
  }
  fn node_to_all_cell_adjacency(&self, s: Option<usize>) -> IndexedMatrix<Self::Key, Self::Key> {
    adjacency::node_to_all_cell_adjacency(self, s)
  }
  fn all_cell_to_node_coadjacency(
    &self,
    s: Option<usize>,
  ) -> IndexedMatrix<Self::Key, Self::Key> {
    adjacency::all_cell_to_node_coadjacency(self, s)
  }

  fn s_connected_components(
    &self,
    s: usize,
    cells: bool,
    return_singletons: bool,
  ) -> Components<Self::Key> {
    connectivity::s_connected_components(self, s, cells, return_singletons)
  }
  fn connected_components(&self, cells: bool, return_singletons: bool) -> Components<Self::Key> {
    self.s_connected_components(1, cells, return_singletons)
  }
  fn is_connected(&self, s: usize, cells: bool) -> bool {
    self.s_connected_components(s, cells, true).len() <= 1
  }
  fn s_component_subcomplexes(
    &self,
    s: usize,
    cells: bool,
    return_singletons: bool,
  ) -> Result<Vec<Self>>
  where
    Self: Sized,
  {
    connectivity::s_component_subcomplexes(self, s, cells, return_singletons)
  }

  fn distance(&self, source: &Self::Node, target: &Self::Node, s: usize) -> Result<Distance> {
    connectivity::distance(self, source, target, s)
  }
  fn cell_distance(&self, source: &Self::Key, target: &Self::Key, s: usize) -> Result<Distance> {
    connectivity::cell_distance(self, source, target, s)
  }
  fn diameter(&self, s: usize) -> Result<usize> {
    connectivity::diameter(self, s, false)
  }
  fn cell_diameter(&self, s: usize) -> Result<usize> {
    connectivity::diameter(self, s, true)
  }
  fn node_diameters(&self, s: usize) -> (Vec<usize>, Components<Self::Key>) {
    connectivity::component_diameters(self, s, false)
  }
  fn cell_diameters(&self, s: usize) -> (Vec<usize>, Components<Self::Key>) {
    connectivity::component_diameters(self, s, true)
  }
}

pub(crate) fn index_of<K: StoreKey>(keys: impl IntoIterator<Item = K>) -> IndexMap<K, usize> {
  keys.into_iter().enumerate().map(|(i, k)| (k, i)).collect()
}
