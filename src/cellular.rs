//! Regular and non-regular cell complexes of rank at most two.
//!
//! Nodes, edges and polygonal 2-cells are kept in a [`Store`]. Inserting a
//! cell inserts its missing nodes and boundary edges first. A regular complex
//! keeps one cell per rotation/reflection class and merges the attributes of
//! re-inserted equivalents, a non-regular complex keeps every insertion and
//! tells equivalent cells apart by a per-class index.

use crate::{
  attribute::{AttrValue, Attributes},
  cell::{Cell, CellKey},
  combinatorics::{
    cycle::{canonical_cycle, cycle_pairs, has_repeats, open_cycle},
    Sign,
  },
  complex::Complex,
  error::{ComplexError, Result},
  store::{Store, StoreKey},
  Node, Rank,
};

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools as _;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct CellComplex<N: Node> {
  store: Store<CellKey<N>>,
  regular: bool,
  name: String,
  /// Canonical orbit representative to the stored cells of that class.
  classes: IndexMap<Vec<N>, Vec<CellKey<N>>>,
}

impl<N: Node> Default for CellComplex<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<N: Node> CellComplex<N> {
  /// An empty regular complex.
  pub fn new() -> Self {
    Self::with_regularity(true)
  }
  /// An empty complex accepting equivalent cells and cells with repeated nodes.
  pub fn non_regular() -> Self {
    Self::with_regularity(false)
  }
  fn with_regularity(regular: bool) -> Self {
    Self {
      store: Store::new(),
      regular,
      name: String::new(),
      classes: IndexMap::new(),
    }
  }
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// A regular complex from element groups. Without an explicit rank, the
  /// rank of every group follows from its size.
  pub fn from_cells<I, E>(groups: I, rank: Option<Rank>) -> Result<Self>
  where
    I: IntoIterator<Item = E>,
    E: IntoIterator<Item = N>,
  {
    let mut complex = Self::new();
    for group in groups {
      let group: Vec<N> = group.into_iter().collect();
      let rank = match rank {
        Some(rank) => rank,
        None => infer_rank(&group)?,
      };
      complex.add_cell(group, rank)?;
    }
    Ok(complex)
  }

  /// Seeds ranks zero and one from a plain graph.
  pub fn from_graph(
    nodes: impl IntoIterator<Item = N>,
    edges: impl IntoIterator<Item = (N, N)>,
  ) -> Result<Self> {
    let mut complex = Self::new();
    for n in nodes {
      complex.add_node(n)?;
    }
    for (a, b) in edges {
      complex.add_edge(a, b)?;
    }
    Ok(complex)
  }

  pub fn name(&self) -> &str {
    &self.name
  }
  /// Whether the complex enforces regularity on insertion.
  pub fn requires_regular(&self) -> bool {
    self.regular
  }

  pub fn add_node(&mut self, n: N) -> Result<CellKey<N>> {
    self.add_node_with(n, Attributes::new())
  }
  pub fn add_node_with(&mut self, n: N, attributes: Attributes) -> Result<CellKey<N>> {
    let key = CellKey::Node(n);
    if self.store.insert(key.clone(), attributes, Vec::new())? {
      debug!(?key, "inserted node");
    }
    Ok(key)
  }

  pub fn add_edge(&mut self, a: N, b: N) -> Result<CellKey<N>> {
    self.add_edge_with(a, b, Attributes::new())
  }
  pub fn add_edge_with(&mut self, a: N, b: N, attributes: Attributes) -> Result<CellKey<N>> {
    let key = CellKey::edge(a, b)?;
    self.insert_edge(key.clone(), attributes)?;
    Ok(key)
  }

  fn insert_edge(&mut self, key: CellKey<N>, attributes: Attributes) -> Result<()> {
    let CellKey::Edge(a, b) = &key else {
      return Err(ComplexError::InvalidEdge(key.elements().len()));
    };
    let faces = vec![CellKey::Node(a.clone()), CellKey::Node(b.clone())];
    for face in &faces {
      self.store.insert(face.clone(), Attributes::new(), Vec::new())?;
    }
    if self.store.insert(key.clone(), attributes, faces)? {
      debug!(?key, "inserted edge");
    }
    Ok(())
  }

  pub fn add_cell(&mut self, elements: impl IntoIterator<Item = N>, rank: Rank) -> Result<CellKey<N>> {
    self.add_cell_with(elements, rank, Attributes::new())
  }

  /// Inserts an entity of the given rank, creating its missing faces.
  pub fn add_cell_with(
    &mut self,
    elements: impl IntoIterator<Item = N>,
    rank: Rank,
    attributes: Attributes,
  ) -> Result<CellKey<N>> {
    let elements: Vec<N> = elements.into_iter().collect();
    match rank {
      0 => match <[N; 1]>::try_from(elements) {
        Ok([n]) => self.add_node_with(n, attributes),
        Err(elements) => Err(ComplexError::UnsupportedInput(format!(
          "a node is given by exactly one element, got {}",
          elements.len()
        ))),
      },
      1 => match <[N; 2]>::try_from(elements) {
        Ok([a, b]) => self.add_edge_with(a, b, attributes),
        Err(elements) => Err(ComplexError::InvalidEdge(elements.len())),
      },
      2 => {
        if !self.is_insertable_cycle(elements.iter().cloned()) {
          return Err(ComplexError::CycleViolation(format!("{elements:?}")));
        }
        let cell = Cell::with_attributes(elements, self.regular, attributes)?;
        self.add_cell_entity(cell)
      }
      _ => Err(ComplexError::UnsupportedRank(rank)),
    }
  }

  pub fn add_cells_from<I, E>(&mut self, groups: I, rank: Rank) -> Result<Vec<CellKey<N>>>
  where
    I: IntoIterator<Item = E>,
    E: IntoIterator<Item = N>,
  {
    groups
      .into_iter()
      .map(|group| self.add_cell(group, rank))
      .collect()
  }

  /// Inserts a 2-cell with its nodes and boundary edges.
  ///
  /// In a regular complex an equivalent stored cell absorbs the attributes
  /// instead and its key is returned.
  pub fn add_cell_entity(&mut self, cell: Cell<N>) -> Result<CellKey<N>> {
    if !self.is_insertable_cycle(cell.elements().iter().cloned()) {
      return Err(ComplexError::CycleViolation(format!("{:?}", cell.elements())));
    }
    let canonical = cell.canonical();
    let class = self.classes.get(&canonical);

    if self.regular {
      if let Some(existing) = class.and_then(|keys| keys.first()).cloned() {
        warn!(?existing, elements = ?cell.elements(), "merging equivalent cell");
        let (_, attributes) = cell.into_parts();
        self.store.attributes_mut(&existing)?.merge(attributes);
        return Ok(existing);
      }
    }

    let index = class
      .and_then(|keys| keys.iter().filter_map(cell_index).max())
      .map_or(0, |max| max + 1);
    let nodes = cell.nodes();
    let edges = cell.edges()?;
    let (boundary, attributes) = cell.into_parts();
    let key = CellKey::Cell { boundary, index };

    for n in &nodes {
      self
        .store
        .insert(CellKey::Node(n.clone()), Attributes::new(), Vec::new())?;
    }
    for edge in &edges {
      self.insert_edge(edge.clone(), Attributes::new())?;
    }
    let faces = nodes.into_iter().map(CellKey::Node).chain(edges).collect();
    self.store.insert(key.clone(), attributes, faces)?;
    self
      .classes
      .entry(canonical)
      .or_default()
      .push(key.clone());
    debug!(?key, "inserted cell");
    Ok(key)
  }

  /// Whether `elements` may be inserted as a 2-cell: at least three
  /// traversal entries, no cyclically adjacent entries equal and, in a
  /// regular complex, no repeated node.
  pub fn is_insertable_cycle(&self, elements: impl IntoIterator<Item = N>) -> bool {
    let elements = open_cycle(elements.into_iter().collect());
    if elements.len() < 3 {
      return false;
    }
    if self.regular && has_repeats(&elements) {
      return false;
    }
    let no_loops = cycle_pairs(&elements).all(|(u, v)| u != v);
    no_loops
  }

  /// The key of a stored entity given by its elements.
  ///
  /// Equivalent cells of a non-regular complex are selected by `index`.
  pub fn find_key(&self, elements: &[N], rank: Rank, index: Option<usize>) -> Result<CellKey<N>> {
    let not_found = || ComplexError::NotFound(format!("{elements:?}"));
    let key = match (rank, elements) {
      (0, [n]) => CellKey::Node(n.clone()),
      (0, _) => return Err(not_found()),
      (1, [a, b]) => CellKey::edge(a.clone(), b.clone())?,
      (1, _) => return Err(ComplexError::InvalidEdge(elements.len())),
      (2, _) => {
        let canonical = canonical_cycle(&open_cycle(elements.to_vec()));
        let class = self.classes.get(&canonical).ok_or_else(not_found)?;
        return match index {
          Some(i) => class
            .iter()
            .find(|k| cell_index(*k) == Some(i))
            .cloned()
            .ok_or_else(not_found),
          None => match class.as_slice() {
            [key] => Ok(key.clone()),
            _ => Err(ComplexError::AmbiguousKey {
              key: format!("{elements:?}"),
              count: class.len(),
            }),
          },
        };
      }
      _ => return Err(ComplexError::UnsupportedRank(rank)),
    };
    if !self.store.contains(&key) {
      return Err(not_found());
    }
    Ok(key)
  }

  /// Removes a stored entity together with every entity containing it.
  pub fn remove(&mut self, elements: &[N], rank: Rank, index: Option<usize>) -> Result<()> {
    let key = self.find_key(elements, rank, index)?;
    self.remove_key(&key)
  }
  pub fn remove_node(&mut self, n: N) -> Result<()> {
    self.remove(&[n], 0, None)
  }
  pub fn remove_edge(&mut self, a: N, b: N) -> Result<()> {
    self.remove(&[a, b], 1, None)
  }
  pub fn remove_cell(&mut self, elements: &[N], index: Option<usize>) -> Result<()> {
    self.remove(elements, 2, index)
  }
  pub fn remove_cells<I, E>(&mut self, groups: I) -> Result<()>
  where
    I: IntoIterator<Item = E>,
    E: AsRef<[N]>,
  {
    for group in groups {
      self.remove_cell(group.as_ref(), None)?;
    }
    Ok(())
  }

  pub fn remove_key(&mut self, key: &CellKey<N>) -> Result<()> {
    if !self.store.contains(key) {
      return Err(ComplexError::NotFound(format!("{key:?}")));
    }
    for coface in self.store.cofaces(key)? {
      self.remove_stored(&coface)?;
    }
    self.remove_stored(key)?;
    Ok(())
  }

  fn remove_stored(&mut self, key: &CellKey<N>) -> Result<Attributes> {
    let record = self.store.remove(key)?;
    if let CellKey::Cell { boundary, .. } = key {
      let canonical = canonical_cycle(boundary);
      if let Some(class) = self.classes.get_mut(&canonical) {
        class.retain(|k| k != key);
        if class.is_empty() {
          self.classes.shift_remove(&canonical);
        }
      }
    }
    debug!(?key, "removed");
    Ok(record.attributes().clone())
  }

  pub fn clear(&mut self) {
    self.store.clear();
    self.classes.clear();
  }

  pub fn nodes(&self) -> Vec<N> {
    self.store.keys(0).flat_map(CellKey::elements).collect()
  }
  pub fn edges(&self) -> Vec<(N, N)> {
    self
      .store
      .keys(1)
      .filter_map(|k| match k {
        CellKey::Edge(a, b) => Some((a.clone(), b.clone())),
        _ => None,
      })
      .collect()
  }
  pub fn cells(&self) -> impl Iterator<Item = &CellKey<N>> {
    self.store.keys(2)
  }

  /// A stored cell with its current attributes.
  pub fn cell(&self, key: &CellKey<N>) -> Result<Cell<N>> {
    let CellKey::Cell { boundary, .. } = key else {
      return Err(ComplexError::key_missing(key, 2));
    };
    let attributes = self.store.attributes(key)?.clone();
    Cell::with_attributes(boundary.iter().cloned(), self.regular, attributes)
  }

  /// No two cells are equivalent and no cell repeats a node.
  pub fn is_regular(&self) -> bool {
    self.classes.values().all(|class| class.len() <= 1)
      && self
        .cells()
        .all(|k| !has_repeats(&k.elements()))
  }

  /// Number of edges incident to `n`.
  pub fn degree(&self, n: &N) -> Result<usize> {
    let key = CellKey::Node(n.clone());
    let degree = self
      .store
      .membership(&key)?
      .iter()
      .filter(|k| k.rank() == 1)
      .count();
    Ok(degree)
  }

  /// The nodes sharing an edge with `n`, in edge insertion order.
  pub fn neighbors(&self, n: &N) -> Result<Vec<N>> {
    let key = CellKey::Node(n.clone());
    let neighbors = self
      .store
      .membership(&key)?
      .iter()
      .filter_map(|k| match k {
        CellKey::Edge(a, b) if a == n => Some(b.clone()),
        CellKey::Edge(a, b) if b == n => Some(a.clone()),
        _ => None,
      })
      .collect();
    Ok(neighbors)
  }

  /// Nodes contained in no edge or cell.
  pub fn singletons(&self) -> Vec<N> {
    self
      .store
      .keys(0)
      .filter(|k| self.store.record(k).is_some_and(|r| r.is_maximal()))
      .flat_map(CellKey::elements)
      .collect()
  }

  pub fn remove_singletons(&mut self) -> Result<()> {
    for n in self.singletons() {
      self.remove_node(n)?;
    }
    Ok(())
  }

  /// The stored entities of `rank`.
  pub fn skeleton(&self, rank: Rank) -> Result<Vec<&CellKey<N>>> {
    self.check_rank(rank)?;
    Ok(self.store.keys(rank).collect())
  }

  /// Number of distinct nodes of a stored entity.
  pub fn size(&self, key: &CellKey<N>) -> Result<usize> {
    if !self.store.contains(key) {
      return Err(ComplexError::key_missing(key, key.rank()));
    }
    Ok(self.nodes_of(key).len())
  }

  /// The stored cells grouped by rotation/reflection class.
  pub fn equivalence_classes(&self) -> Vec<Vec<CellKey<N>>> {
    self.classes.values().cloned().collect()
  }

  /// Keeps the first cell of every class. The attributes of the others are
  /// merged into it in insertion order.
  pub fn remove_equivalent_cells(&mut self) -> Result<()> {
    let duplicates: Vec<Vec<CellKey<N>>> = self
      .classes
      .values()
      .filter(|class| class.len() > 1)
      .cloned()
      .collect();
    for class in duplicates {
      let Some((survivor, others)) = class.split_first() else {
        continue;
      };
      warn!(?survivor, count = others.len(), "collapsing equivalent cells");
      for other in others {
        let attributes = self.remove_stored(other)?;
        self.store.attributes_mut(survivor)?.merge(attributes);
      }
    }
    Ok(())
  }

  pub fn set_attribute(
    &mut self,
    key: &CellKey<N>,
    name: &str,
    value: impl Into<AttrValue>,
  ) -> Result<()> {
    self.store.set_attribute(key, name, value)
  }

  /// The values of attribute `name` on the entities of `rank` carrying it.
  pub fn cell_attributes(&self, name: &str, rank: Rank) -> Result<IndexMap<CellKey<N>, AttrValue>> {
    self.check_rank(rank)?;
    let values = self
      .store
      .keys(rank)
      .filter_map(|k| {
        let value = self.store.attributes(k).ok()?.get(name)?;
        Some((k.clone(), value.clone()))
      })
      .collect();
    Ok(values)
  }

  /// Sets attribute `name` on several entities. Nothing is written unless
  /// every key is stored.
  pub fn set_cell_attributes<V: Into<AttrValue>>(
    &mut self,
    name: &str,
    values: impl IntoIterator<Item = (CellKey<N>, V)>,
  ) -> Result<()> {
    let values: Vec<(CellKey<N>, V)> = values.into_iter().collect();
    if let Some((missing, _)) = values.iter().find(|(k, _)| !self.store.contains(k)) {
      return Err(ComplexError::key_missing(missing, missing.rank()));
    }
    for (key, value) in values {
      self.store.set_attribute(&key, name, value)?;
    }
    Ok(())
  }

  /// Stores a numeric level under `name` for every given entity. Rejects the
  /// whole batch if a value is not numeric or a key is not stored.
  pub fn set_filtration<V: Into<AttrValue>>(
    &mut self,
    name: &str,
    values: impl IntoIterator<Item = (CellKey<N>, V)>,
  ) -> Result<()> {
    let values: Vec<(CellKey<N>, AttrValue)> =
      values.into_iter().map(|(k, v)| (k, v.into())).collect();
    if let Some((key, _)) = values.iter().find(|(_, v)| v.as_f64().is_none()) {
      return Err(ComplexError::non_numeric(key, name));
    }
    self.set_cell_attributes(name, values)
  }

  /// Copies every entity accepted by `keep`, in store order. `keep` must be
  /// closed under taking faces.
  fn restricted(&self, keep: impl Fn(&CellKey<N>) -> bool) -> Result<Self> {
    let mut complex = Self::with_regularity(self.regular).with_name(self.name.clone());
    for (key, record) in self.store.iter().filter(|(k, _)| keep(k)) {
      complex
        .store
        .insert(key.clone(), record.attributes().clone(), record.faces().to_vec())?;
      if let CellKey::Cell { boundary, .. } = key {
        complex
          .classes
          .entry(canonical_cycle(boundary))
          .or_default()
          .push(key.clone());
      }
    }
    Ok(complex)
  }
}

fn cell_index<N>(key: &CellKey<N>) -> Option<usize> {
  match key {
    CellKey::Cell { index, .. } => Some(*index),
    _ => None,
  }
}

fn infer_rank<N>(group: &[N]) -> Result<Rank> {
  match group.len() {
    0 => Err(ComplexError::UnsupportedInput(
      "cannot infer the rank of an empty group".to_owned(),
    )),
    1 => Ok(0),
    2 => Ok(1),
    _ => Ok(2),
  }
}

impl<N: Node> Complex for CellComplex<N> {
  type Node = N;
  type Key = CellKey<N>;

  fn store(&self) -> &Store<CellKey<N>> {
    &self.store
  }

  fn rank_bound(&self) -> Rank {
    2
  }

  fn boundary_terms(&self, key: &CellKey<N>) -> Vec<(CellKey<N>, Sign)> {
    match key {
      CellKey::Node(_) => Vec::new(),
      CellKey::Edge(a, b) => vec![
        (CellKey::Node(a.clone()), Sign::Neg),
        (CellKey::Node(b.clone()), Sign::Pos),
      ],
      CellKey::Cell { boundary, .. } => cycle_pairs(boundary)
        .filter_map(|(u, v)| {
          let edge = CellKey::edge(u.clone(), v.clone()).ok()?;
          Some((edge, Sign::from_order(u, v)))
        })
        .collect(),
    }
  }

  fn node_key(&self, node: &N) -> CellKey<N> {
    CellKey::Node(node.clone())
  }

  fn nodes_of(&self, key: &CellKey<N>) -> Vec<N> {
    key.elements().into_iter().unique().collect()
  }

  fn restrict_to_nodes(&self, nodes: &[N]) -> Result<Self> {
    let nodes: IndexSet<&N> = nodes.iter().collect();
    self.restricted(|key| key.elements().iter().all(|n| nodes.contains(n)))
  }

  fn restrict_to_cells(&self, keys: &[CellKey<N>]) -> Result<Self> {
    let mut closure: IndexSet<CellKey<N>> = IndexSet::new();
    for key in keys {
      closure.extend(self.store.faces_of(key)?.iter().cloned());
      closure.insert(key.clone());
    }
    self.restricted(|key| closure.contains(key))
  }
}
