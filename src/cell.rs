use crate::{
  attribute::Attributes,
  combinatorics::{
    cycle::{canonical_cycle, cycle_pairs, has_repeats, is_cycle_equivalent, open_cycle},
    Sign,
  },
  error::{ComplexError, Result},
  store::StoreKey,
  Node, Rank,
};

use itertools::Itertools as _;

/// Key of an entity stored in a cell complex.
///
/// Edges compare as unordered pairs. Two cell keys are equal iff their
/// traversals lie in the same rotation/reflection class and their indices
/// agree.
#[derive(Debug, Clone)]
pub enum CellKey<N> {
  Node(N),
  /// Endpoints in ascending order.
  Edge(N, N),
  /// A polygon given by the traversal it was first inserted with.
  /// `index` tells apart equivalent cells of a non-regular complex.
  Cell { boundary: Vec<N>, index: usize },
}

impl<N: Node> CellKey<N> {
  pub fn node(n: N) -> Self {
    Self::Node(n)
  }
  pub fn edge(a: N, b: N) -> Result<Self> {
    match a.cmp(&b) {
      std::cmp::Ordering::Less => Ok(Self::Edge(a, b)),
      std::cmp::Ordering::Greater => Ok(Self::Edge(b, a)),
      std::cmp::Ordering::Equal => Err(ComplexError::SelfLoop(format!("{a:?}"))),
    }
  }

  /// The traversal of the entity, single node for a node.
  pub fn elements(&self) -> Vec<N> {
    match self {
      Self::Node(n) => vec![n.clone()],
      Self::Edge(a, b) => vec![a.clone(), b.clone()],
      Self::Cell { boundary, .. } => boundary.clone(),
    }
  }

  pub fn contains(&self, n: &N) -> bool {
    match self {
      Self::Node(m) => m == n,
      Self::Edge(a, b) => a == n || b == n,
      Self::Cell { boundary, .. } => boundary.contains(n),
    }
  }
}

impl<N: Node> PartialEq for CellKey<N> {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Node(a), Self::Node(b)) => a == b,
      (Self::Edge(a0, a1), Self::Edge(b0, b1)) => {
        (a0 == b0 && a1 == b1) || (a0 == b1 && a1 == b0)
      }
      (
        Self::Cell {
          boundary: a,
          index: i,
        },
        Self::Cell {
          boundary: b,
          index: j,
        },
      ) => i == j && is_cycle_equivalent(a, b),
      _ => false,
    }
  }
}
impl<N: Node> Eq for CellKey<N> {}

impl<N: Node> std::hash::Hash for CellKey<N> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    std::mem::discriminant(self).hash(state);
    match self {
      Self::Node(n) => n.hash(state),
      Self::Edge(a, b) => {
        a.min(b).hash(state);
        a.max(b).hash(state);
      }
      Self::Cell { boundary, index } => {
        canonical_cycle(boundary).hash(state);
        index.hash(state);
      }
    }
  }
}

impl<N: Node> StoreKey for CellKey<N> {
  fn rank(&self) -> Rank {
    match self {
      Self::Node(_) => 0,
      Self::Edge(..) => 1,
      Self::Cell { .. } => 2,
    }
  }
}

/// A 2-cell: a closed traversal of nodes, identified up to rotation and reflection.
#[derive(Debug, Clone)]
pub struct Cell<N> {
  elements: Vec<N>,
  regular: bool,
  attributes: Attributes,
}

impl<N: Node> Cell<N> {
  /// A regular cell rejects repeated nodes. An explicit closing node is dropped.
  pub fn new(elements: impl IntoIterator<Item = N>, regular: bool) -> Result<Self> {
    Self::with_attributes(elements, regular, Attributes::new())
  }

  pub fn with_attributes(
    elements: impl IntoIterator<Item = N>,
    regular: bool,
    attributes: Attributes,
  ) -> Result<Self> {
    let elements = open_cycle(elements.into_iter().collect());
    if elements.is_empty() {
      return Err(ComplexError::EmptyEntity);
    }
    if regular && has_repeats(&elements) {
      return Err(ComplexError::DuplicateElement(format!("{elements:?}")));
    }
    if elements.iter().unique().count() < 2 {
      return Err(ComplexError::CycleViolation(format!("{elements:?}")));
    }
    Ok(Self {
      elements,
      regular,
      attributes,
    })
  }

  pub fn elements(&self) -> &[N] {
    &self.elements
  }
  pub fn len(&self) -> usize {
    self.elements.len()
  }
  pub fn is_empty(&self) -> bool {
    self.elements.is_empty()
  }
  pub fn attributes(&self) -> &Attributes {
    &self.attributes
  }
  pub fn attributes_mut(&mut self) -> &mut Attributes {
    &mut self.attributes
  }
  pub fn into_parts(self) -> (Vec<N>, Attributes) {
    (self.elements, self.attributes)
  }

  /// Whether the cell was built under the regular rules.
  pub fn requires_regular(&self) -> bool {
    self.regular
  }
  /// A cell is regular iff its traversal visits every node once.
  pub fn is_regular(&self) -> bool {
    !has_repeats(&self.elements)
  }

  pub fn contains(&self, n: &N) -> bool {
    self.elements.contains(n)
  }
  /// Whether `face` is a node or a boundary edge of this cell.
  pub fn contains_face(&self, face: &[N]) -> bool {
    match face {
      [n] => self.contains(n),
      [a, b] => self
        .boundary()
        .any(|(u, v)| (u == a && v == b) || (u == b && v == a)),
      _ => false,
    }
  }

  /// The oriented boundary pairs `(u, v)`, closing pair included.
  pub fn boundary(&self) -> impl Iterator<Item = (&N, &N)> {
    cycle_pairs(&self.elements)
  }

  /// Every traversed edge with the orientation of the traversal relative to
  /// the edge's own orientation. Edges traversed twice appear twice.
  pub fn signed_edges(&self) -> Result<Vec<(CellKey<N>, Sign)>> {
    self
      .boundary()
      .map(|(u, v)| Ok((CellKey::edge(u.clone(), v.clone())?, Sign::from_order(u, v))))
      .collect()
  }

  /// The distinct nodes in traversal order.
  pub fn nodes(&self) -> Vec<N> {
    self.elements.iter().unique().cloned().collect()
  }
  /// The distinct boundary edges in traversal order.
  pub fn edges(&self) -> Result<Vec<CellKey<N>>> {
    let edges = self
      .signed_edges()?
      .into_iter()
      .map(|(e, _)| e)
      .unique()
      .collect();
    Ok(edges)
  }

  pub fn canonical(&self) -> Vec<N> {
    canonical_cycle(&self.elements)
  }
  pub fn is_equivalent(&self, other: &Self) -> bool {
    is_cycle_equivalent(&self.elements, &other.elements)
  }
}

impl<N: Node> PartialEq for Cell<N> {
  fn eq(&self, other: &Self) -> bool {
    self.is_equivalent(other)
  }
}
impl<N: Node> Eq for Cell<N> {}
impl<N: Node> std::hash::Hash for Cell<N> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.canonical().hash(state);
  }
}
