//! s-connectivity over nodes and over cells.
//!
//! Two nodes are s-adjacent if they lie together in at least `s` entities of
//! rank one or more. Two such entities are s-adjacent if they share at least
//! `s` nodes. Components, distances and diameters are all computed by
//! breadth-first search on the resulting graph.

use super::{incidence::IndexedMatrix, Complex};
use crate::{
  error::{ComplexError, Result},
  store::StoreKey,
};

use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

/// Length of a shortest path, ordered so that every finite distance is
/// smaller than [`Distance::Unreachable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
  Finite(usize),
  Unreachable,
}

impl Distance {
  pub fn finite(self) -> Option<usize> {
    match self {
      Self::Finite(d) => Some(d),
      Self::Unreachable => None,
    }
  }
  pub fn is_reachable(self) -> bool {
    matches!(self, Self::Finite(_))
  }
}

impl std::fmt::Display for Distance {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Finite(d) => write!(f, "{d}"),
      Self::Unreachable => write!(f, "unreachable"),
    }
  }
}

/// The s-connected components of a complex, in order of their first key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components<K: StoreKey> {
  components: Vec<IndexSet<K>>,
}

impl<K: StoreKey> Components<K> {
  pub fn iter(&self) -> std::slice::Iter<'_, IndexSet<K>> {
    self.components.iter()
  }
  pub fn len(&self) -> usize {
    self.components.len()
  }
  pub fn is_empty(&self) -> bool {
    self.components.is_empty()
  }
  pub fn into_vec(self) -> Vec<IndexSet<K>> {
    self.components
  }
}

impl<K: StoreKey> IntoIterator for Components<K> {
  type Item = IndexSet<K>;
  type IntoIter = std::vec::IntoIter<IndexSet<K>>;
  fn into_iter(self) -> Self::IntoIter {
    self.components.into_iter()
  }
}
impl<'a, K: StoreKey> IntoIterator for &'a Components<K> {
  type Item = &'a IndexSet<K>;
  type IntoIter = std::slice::Iter<'a, IndexSet<K>>;
  fn into_iter(self) -> Self::IntoIter {
    self.components.iter()
  }
}

/// Unweighted s-adjacency graph on either the nodes or the cells.
struct SGraph<K> {
  keys: IndexMap<K, usize>,
  neighbors: Vec<Vec<usize>>,
}

impl<K: StoreKey> SGraph<K> {
  fn new<C: Complex<Key = K> + ?Sized>(complex: &C, s: usize, cells: bool) -> Self {
    let s = s.max(1);
    let IndexedMatrix { rows, matrix, .. } = if cells {
      complex.all_cell_to_node_coadjacency(Some(s))
    } else {
      complex.node_to_all_cell_adjacency(Some(s))
    };
    let mut neighbors = vec![Vec::new(); rows.len()];
    for &(r, c, _) in matrix.triplets() {
      neighbors[r].push(c);
    }
    Self {
      keys: rows,
      neighbors,
    }
  }

  fn len(&self) -> usize {
    self.keys.len()
  }

  fn index(&self, key: &K) -> Result<usize> {
    self
      .keys
      .get(key)
      .copied()
      .ok_or_else(|| ComplexError::key_missing(key, key.rank()))
  }

  /// Hop counts from `source`, `None` where unreachable.
  fn bfs(&self, source: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; self.len()];
    dist[source] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(u) = queue.pop_front() {
      let next = dist[u].map(|d| d + 1);
      for &v in &self.neighbors[u] {
        if dist[v].is_none() {
          dist[v] = next;
          queue.push_back(v);
        }
      }
    }
    dist
  }

  fn eccentricity(&self, source: usize) -> usize {
    self.bfs(source).into_iter().flatten().max().unwrap_or(0)
  }

  /// Position sets of all components, including singletons.
  fn components(&self) -> Vec<Vec<usize>> {
    let mut seen = vec![false; self.len()];
    let mut components = Vec::new();
    for source in 0..self.len() {
      if seen[source] {
        continue;
      }
      let component: Vec<usize> = self
        .bfs(source)
        .into_iter()
        .enumerate()
        .filter_map(|(i, d)| d.map(|_| i))
        .collect();
      for &i in &component {
        seen[i] = true;
      }
      components.push(component);
    }
    components
  }

  fn keys_of(&self, positions: &[usize]) -> IndexSet<K> {
    positions
      .iter()
      .filter_map(|&i| self.keys.get_index(i).map(|(k, _)| k.clone()))
      .collect()
  }
}

pub fn s_connected_components<C: Complex + ?Sized>(
  complex: &C,
  s: usize,
  cells: bool,
  return_singletons: bool,
) -> Components<C::Key> {
  let graph = SGraph::new(complex, s, cells);
  let components = graph
    .components()
    .into_iter()
    .filter(|c| return_singletons || c.len() > 1)
    .map(|c| graph.keys_of(&c))
    .collect();
  Components { components }
}

/// One fresh complex per s-connected component, attributes included.
pub fn s_component_subcomplexes<C: Complex>(
  complex: &C,
  s: usize,
  cells: bool,
  return_singletons: bool,
) -> Result<Vec<C>> {
  s_connected_components(complex, s, cells, return_singletons)
    .into_iter()
    .map(|component| {
      let keys: Vec<C::Key> = component.into_iter().collect();
      if cells {
        complex.restrict_to_cells(&keys)
      } else {
        let nodes: Vec<C::Node> = keys.iter().flat_map(|k| complex.nodes_of(k)).collect();
        complex.restrict_to_nodes(&nodes)
      }
    })
    .collect()
}

fn graph_distance<K: StoreKey>(graph: &SGraph<K>, source: &K, target: &K) -> Result<Distance> {
  let isource = graph.index(source)?;
  let itarget = graph.index(target)?;
  let distance = graph.bfs(isource)[itarget].map_or(Distance::Unreachable, Distance::Finite);
  Ok(distance)
}

/// Shortest s-walk between two nodes.
pub fn distance<C: Complex + ?Sized>(
  complex: &C,
  source: &C::Node,
  target: &C::Node,
  s: usize,
) -> Result<Distance> {
  let graph = SGraph::new(complex, s, false);
  graph_distance(&graph, &complex.node_key(source), &complex.node_key(target))
}

/// Shortest s-walk between two entities of rank one or more.
pub fn cell_distance<C: Complex + ?Sized>(
  complex: &C,
  source: &C::Key,
  target: &C::Key,
  s: usize,
) -> Result<Distance> {
  let graph = SGraph::new(complex, s, true);
  graph_distance(&graph, source, target)
}

/// Longest shortest s-walk. Fails unless the s-graph is connected.
pub fn diameter<C: Complex + ?Sized>(complex: &C, s: usize, cells: bool) -> Result<usize> {
  let graph = SGraph::new(complex, s, cells);
  if graph.components().len() > 1 {
    return Err(ComplexError::DisconnectedComplex);
  }
  Ok((0..graph.len()).map(|i| graph.eccentricity(i)).max().unwrap_or(0))
}

/// The diameter of every s-connected component, singletons included.
pub fn component_diameters<C: Complex + ?Sized>(
  complex: &C,
  s: usize,
  cells: bool,
) -> (Vec<usize>, Components<C::Key>) {
  let graph = SGraph::new(complex, s, cells);
  let mut diameters = Vec::new();
  let mut components = Vec::new();
  for component in graph.components() {
    let diameter = component
      .iter()
      .map(|&i| graph.eccentricity(i))
      .max()
      .unwrap_or(0);
    diameters.push(diameter);
    components.push(graph.keys_of(&component));
  }
  (diameters, Components { components })
}
