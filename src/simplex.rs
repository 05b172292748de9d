use crate::{
  attribute::Attributes,
  combinatorics::{nsubsimplices, Sign},
  error::{ComplexError, Result},
  store::StoreKey,
  Node, Rank,
};

use itertools::Itertools as _;

/// Sorted, duplicate-free vertex set identifying a simplex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimplexKey<N>(Vec<N>);

impl<N: Node> SimplexKey<N> {
  pub fn new(vertices: impl IntoIterator<Item = N>) -> Result<Self> {
    let mut vertices: Vec<N> = vertices.into_iter().collect();
    if vertices.is_empty() {
      return Err(ComplexError::EmptyEntity);
    }
    vertices.sort();
    if vertices.windows(2).any(|w| w[0] == w[1]) {
      return Err(ComplexError::DuplicateElement(format!("{vertices:?}")));
    }
    Ok(Self(vertices))
  }
  pub fn vertex(v: N) -> Self {
    Self(vec![v])
  }
  fn from_sorted(vertices: Vec<N>) -> Self {
    Self(vertices)
  }

  pub fn vertices(&self) -> &[N] {
    &self.0
  }
  pub fn into_vertices(self) -> Vec<N> {
    self.0
  }
  pub fn nvertices(&self) -> usize {
    self.0.len()
  }

  pub fn contains(&self, v: &N) -> bool {
    self.0.binary_search(v).is_ok()
  }
  pub fn is_face_of(&self, other: &Self) -> bool {
    self.nvertices() <= other.nvertices() && self.0.iter().all(|v| other.contains(v))
  }

  /// The `sub_rank`-faces in lexicographic order.
  pub fn subsimps(&self, sub_rank: Rank) -> impl Iterator<Item = Self> + '_ {
    self
      .0
      .iter()
      .cloned()
      .combinations(sub_rank + 1)
      .map(Self::from_sorted)
  }

  /// All non-empty proper faces, graded by rank.
  pub fn faces(&self) -> Vec<Self> {
    (0..self.rank()).flat_map(|r| self.subsimps(r)).collect()
  }

  /// The facets together with their induced orientation.
  ///
  /// The facet omitting the `i`-th vertex carries the sign `(-1)^i`.
  pub fn boundary(&self) -> Vec<(Self, Sign)> {
    if self.nvertices() < 2 {
      return Vec::new();
    }
    (0..self.nvertices())
      .map(|i| {
        let mut vertices = self.0.clone();
        vertices.remove(i);
        (Self::from_sorted(vertices), Sign::from_parity(i))
      })
      .collect()
  }

  pub fn nfaces(&self, sub_rank: Rank) -> usize {
    nsubsimplices(self.rank(), sub_rank)
  }
}

impl<N: Node> StoreKey for SimplexKey<N> {
  fn rank(&self) -> Rank {
    self.0.len() - 1
  }
}

/// A simplex with attributes attached at creation.
///
/// Identity is given by the vertex set alone.
#[derive(Debug, Clone)]
pub struct Simplex<N> {
  key: SimplexKey<N>,
  attributes: Attributes,
}

impl<N: Node> Simplex<N> {
  pub fn new(elements: impl IntoIterator<Item = N>) -> Result<Self> {
    Self::with_attributes(elements, Attributes::new())
  }
  pub fn with_attributes(
    elements: impl IntoIterator<Item = N>,
    attributes: Attributes,
  ) -> Result<Self> {
    let key = SimplexKey::new(elements)?;
    Ok(Self { key, attributes })
  }

  pub fn key(&self) -> &SimplexKey<N> {
    &self.key
  }
  pub fn rank(&self) -> Rank {
    self.key.rank()
  }
  pub fn vertices(&self) -> &[N] {
    self.key.vertices()
  }
  pub fn attributes(&self) -> &Attributes {
    &self.attributes
  }
  pub fn attributes_mut(&mut self) -> &mut Attributes {
    &mut self.attributes
  }
  pub fn into_parts(self) -> (SimplexKey<N>, Attributes) {
    (self.key, self.attributes)
  }

  pub fn contains(&self, v: &N) -> bool {
    self.key.contains(v)
  }
  /// Whether `face` spans a face of this simplex (order irrelevant).
  pub fn contains_face(&self, face: &[N]) -> bool {
    SimplexKey::new(face.iter().cloned()).is_ok_and(|f| f.is_face_of(&self.key))
  }
  pub fn faces(&self) -> Vec<SimplexKey<N>> {
    self.key.faces()
  }
  pub fn boundary(&self) -> Vec<(SimplexKey<N>, Sign)> {
    self.key.boundary()
  }
}

impl<N: Node> PartialEq for Simplex<N> {
  fn eq(&self, other: &Self) -> bool {
    self.key == other.key
  }
}
impl<N: Node> Eq for Simplex<N> {}
impl<N: Node> std::hash::Hash for Simplex<N> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.key.hash(state);
  }
}
