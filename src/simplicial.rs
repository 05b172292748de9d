//! Abstract simplicial complexes of arbitrary rank.
//!
//! Inserting a simplex inserts all of its faces, lower ranks first. Only
//! maximal simplices may be removed directly; removing a node removes every
//! simplex containing it.

use crate::{
  attribute::{AttrValue, Attributes},
  combinatorics::Sign,
  complex::Complex,
  error::{ComplexError, Result},
  simplex::{Simplex, SimplexKey},
  store::{Store, StoreKey},
  Node, Rank,
};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SimplicialComplex<N: Node> {
  store: Store<SimplexKey<N>>,
  name: String,
}

impl<N: Node> Default for SimplicialComplex<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<N: Node> SimplicialComplex<N> {
  pub fn new() -> Self {
    Self {
      store: Store::new(),
      name: String::new(),
    }
  }
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn from_simplices<I, E>(groups: I) -> Result<Self>
  where
    I: IntoIterator<Item = E>,
    E: IntoIterator<Item = N>,
  {
    let mut complex = Self::new();
    complex.add_simplices_from(groups)?;
    Ok(complex)
  }

  pub fn add_node(&mut self, n: N) -> Result<SimplexKey<N>> {
    self.add_simplex_entity(Simplex::new([n])?)
  }

  pub fn add_simplex(&mut self, elements: impl IntoIterator<Item = N>) -> Result<SimplexKey<N>> {
    self.add_simplex_entity(Simplex::new(elements)?)
  }
  pub fn add_simplex_with(
    &mut self,
    elements: impl IntoIterator<Item = N>,
    attributes: Attributes,
  ) -> Result<SimplexKey<N>> {
    self.add_simplex_entity(Simplex::with_attributes(elements, attributes)?)
  }

  /// Inserts a simplex and every missing face. Attributes of an already
  /// stored simplex are merged.
  pub fn add_simplex_entity(&mut self, simplex: Simplex<N>) -> Result<SimplexKey<N>> {
    let (key, attributes) = simplex.into_parts();
    let faces = key.faces();
    for face in &faces {
      let subfaces = face.faces();
      self.store.insert(face.clone(), Attributes::new(), subfaces)?;
    }
    if self.store.insert(key.clone(), attributes, faces)? {
      debug!(?key, "inserted simplex");
    }
    Ok(key)
  }

  pub fn add_simplices_from<I, E>(&mut self, groups: I) -> Result<Vec<SimplexKey<N>>>
  where
    I: IntoIterator<Item = E>,
    E: IntoIterator<Item = N>,
  {
    groups
      .into_iter()
      .map(|group| self.add_simplex(group))
      .collect()
  }

  /// Removes a simplex that is not a face of any other and returns its
  /// attributes. Its faces stay.
  pub fn remove_maximal_simplex(
    &mut self,
    elements: impl IntoIterator<Item = N>,
  ) -> Result<Attributes> {
    let key = SimplexKey::new(elements)?;
    let record = self.store.remove(&key)?;
    debug!(?key, "removed maximal simplex");
    Ok(record.attributes().clone())
  }

  /// Removes a node and every simplex containing it.
  pub fn remove_node(&mut self, n: N) -> Result<()> {
    let key = SimplexKey::vertex(n);
    if !self.store.contains(&key) {
      return Err(ComplexError::NotFound(format!("{key:?}")));
    }
    for coface in self.store.cofaces(&key)? {
      self.store.remove(&coface)?;
    }
    self.store.remove(&key)?;
    debug!(?key, "removed node");
    Ok(())
  }

  pub fn clear(&mut self) {
    self.store.clear();
  }

  pub fn contains(&self, elements: impl IntoIterator<Item = N>) -> bool {
    SimplexKey::new(elements).is_ok_and(|key| self.store.contains(&key))
  }

  pub fn nodes(&self) -> Vec<N> {
    self
      .store
      .keys(0)
      .flat_map(|k| k.vertices().iter().cloned())
      .collect()
  }

  /// The simplices of `rank` in insertion order.
  pub fn skeleton(&self, rank: Rank) -> Result<Vec<&SimplexKey<N>>> {
    self.check_rank(rank)?;
    Ok(self.store.keys(rank).collect())
  }
  pub fn simplices(&self) -> impl Iterator<Item = &SimplexKey<N>> {
    self.store.iter().map(|(k, _)| k)
  }
  pub fn maximal_simplices(&self) -> impl Iterator<Item = &SimplexKey<N>> {
    self
      .store
      .iter()
      .filter(|(_, r)| r.is_maximal())
      .map(|(k, _)| k)
  }

  /// A stored simplex with its current attributes.
  pub fn simplex(&self, key: &SimplexKey<N>) -> Result<Simplex<N>> {
    let attributes = self.store.attributes(key)?.clone();
    Simplex::with_attributes(key.vertices().iter().cloned(), attributes)
  }

  pub fn set_attribute(
    &mut self,
    key: &SimplexKey<N>,
    name: &str,
    value: impl Into<AttrValue>,
  ) -> Result<()> {
    self.store.set_attribute(key, name, value)
  }

  /// The values of attribute `name` on the simplices of `rank` carrying it.
  pub fn simplex_attributes(
    &self,
    name: &str,
    rank: Rank,
  ) -> Result<IndexMap<SimplexKey<N>, AttrValue>> {
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

  /// Sets attribute `name` on several simplices. Nothing is written unless
  /// every key is stored.
  pub fn set_simplex_attributes<V: Into<AttrValue>>(
    &mut self,
    name: &str,
    values: impl IntoIterator<Item = (SimplexKey<N>, V)>,
  ) -> Result<()> {
    let values: Vec<(SimplexKey<N>, V)> = values.into_iter().collect();
    if let Some((missing, _)) = values.iter().find(|(k, _)| !self.store.contains(k)) {
      return Err(ComplexError::key_missing(missing, missing.rank()));
    }
    for (key, value) in values {
      self.store.set_attribute(&key, name, value)?;
    }
    Ok(())
  }

  /// Stores a numeric level under `name` for every given simplex. Rejects the
  /// whole batch if a value is not numeric or a simplex is not stored.
  pub fn set_filtration<V: Into<AttrValue>>(
    &mut self,
    name: &str,
    values: impl IntoIterator<Item = (SimplexKey<N>, V)>,
  ) -> Result<()> {
    let values: Vec<(SimplexKey<N>, AttrValue)> =
      values.into_iter().map(|(k, v)| (k, v.into())).collect();
    if let Some((key, _)) = values.iter().find(|(_, v)| v.as_f64().is_none()) {
      return Err(ComplexError::non_numeric(key, name));
    }
    self.set_simplex_attributes(name, values)
  }

  fn restricted(&self, keep: impl Fn(&SimplexKey<N>) -> bool) -> Result<Self> {
    let mut complex = Self::new().with_name(self.name.clone());
    for (key, record) in self.store.iter().filter(|(k, _)| keep(k)) {
      complex
        .store
        .insert(key.clone(), record.attributes().clone(), record.faces().to_vec())?;
    }
    Ok(complex)
  }
}

impl<N: Node> Complex for SimplicialComplex<N> {
  type Node = N;
  type Key = SimplexKey<N>;

  fn store(&self) -> &Store<SimplexKey<N>> {
    &self.store
  }

  fn rank_bound(&self) -> Rank {
    self.dim()
  }

  fn boundary_terms(&self, key: &SimplexKey<N>) -> Vec<(SimplexKey<N>, Sign)> {
    key.boundary()
  }

  fn node_key(&self, node: &N) -> SimplexKey<N> {
    SimplexKey::vertex(node.clone())
  }

  fn nodes_of(&self, key: &SimplexKey<N>) -> Vec<N> {
    key.vertices().to_vec()
  }

  fn restrict_to_nodes(&self, nodes: &[N]) -> Result<Self> {
    let nodes: IndexSet<&N> = nodes.iter().collect();
    self.restricted(|key| key.vertices().iter().all(|n| nodes.contains(n)))
  }

  fn restrict_to_cells(&self, keys: &[SimplexKey<N>]) -> Result<Self> {
    let mut closure: IndexSet<SimplexKey<N>> = IndexSet::new();
    for key in keys {
      closure.extend(self.store.faces_of(key)?.iter().cloned());
      closure.insert(key.clone());
    }
    self.restricted(|key| closure.contains(key))
  }
}

#[cfg(test)]
mod test {
  use super::SimplicialComplex;
  use crate::{
    attribute::{AttrValue, Attributes},
    complex::Complex,
    error::ComplexError,
    simplex::SimplexKey,
  };

  fn key(vertices: &[u32]) -> SimplexKey<u32> {
    SimplexKey::new(vertices.iter().copied()).unwrap()
  }

  #[test]
  fn faces_are_inserted() {
    let mut complex = SimplicialComplex::new();
    complex.add_simplex([0, 1, 2, 3]).unwrap();
    assert_eq!(complex.shape(), vec![4, 6, 4, 1]);
    assert_eq!(complex.dim(), 3);
    assert_eq!(complex.euler_characteristic(), 1);
    assert!(complex.contains([2, 0]));
    assert!(!complex.is_maximal(&key(&[0, 1, 2])).unwrap());
    assert_eq!(complex.membership(&key(&[0])).unwrap().len(), 3 + 3 + 1);
    assert_eq!(complex.maximal_simplices().count(), 1);
  }

  #[test]
  fn only_maximal_simplices_are_removed_directly() {
    let mut complex = SimplicialComplex::new();
    complex
      .add_simplex_with([1, 2, 3], Attributes::new().with("w", 1))
      .unwrap();
    assert!(matches!(
      complex.remove_maximal_simplex([1, 2]),
      Err(ComplexError::NotMaximal(_))
    ));
    assert!(matches!(
      complex.remove_maximal_simplex([1, 4]),
      Err(ComplexError::NotFound(_))
    ));
    let attributes = complex.remove_maximal_simplex([3, 2, 1]).unwrap();
    assert_eq!(attributes.get("w").unwrap().as_i64(), Some(1));
    assert_eq!(complex.shape(), vec![3, 3]);
    assert!(complex.is_maximal(&key(&[1, 2])).unwrap());
  }

  #[test]
  fn node_removal_cascades() {
    let mut complex = SimplicialComplex::from_simplices([vec![1, 2, 3], vec![2, 3, 4]]).unwrap();
    complex.remove_node(1).unwrap();
    assert_eq!(complex.shape(), vec![3, 3, 1]);
    assert!(!complex.contains([1]));
    assert!(!complex.is_maximal(&key(&[2, 3])).unwrap());
    assert!(complex.remove_node(1).is_err());
  }

  #[test]
  fn boundaries_compose_to_zero() {
    let complex =
      SimplicialComplex::from_simplices([vec![0, 1, 2, 3], vec![2, 3, 4], vec![4, 5]]).unwrap();
    for rank in 1..complex.dim() {
      let lower = complex.incidence_matrix(rank, true).unwrap();
      let upper = complex.incidence_matrix(rank + 1, true).unwrap();
      assert_eq!(lower.matmul(&upper).nnz(), 0);
    }
    assert!(matches!(
      complex.incidence_matrix(4, true),
      Err(ComplexError::InvalidRank { rank: 4, max: 3 })
    ));
    assert!(complex.skeleton(4).is_err());
    assert_eq!(complex.skeleton(1).unwrap().len(), 6 + 2 + 1);
  }

  #[test]
  fn triangle_incidence() {
    let complex = SimplicialComplex::from_simplices([['a', 'b', 'c']]).unwrap();
    let b2 = complex.incidence_matrix_indexed(2, true).unwrap();
    let column: Vec<f64> = ["ab", "ac", "bc"]
      .iter()
      .map(|e| {
        let face = SimplexKey::new(e.chars()).unwrap();
        b2.matrix.get(b2.rows[&face], 0)
      })
      .collect();
    assert_eq!(column, vec![1.0, -1.0, 1.0]);
    assert_eq!(complex.incidence_matrix(0, true).unwrap().shape(), (0, 3));
  }

  #[test]
  fn restriction_and_attributes() {
    let mut complex = SimplicialComplex::from_simplices([vec![1, 2, 3], vec![3, 4]]).unwrap();
    complex
      .set_simplex_attributes("f", [(key(&[1, 2]), 0.25), (key(&[3, 4]), 0.75)])
      .unwrap();
    let values = complex.simplex_attributes("f", 1).unwrap();
    assert_eq!(values.len(), 2);

    let sub = complex.restrict_to_nodes(&[2, 3, 4]).unwrap();
    assert_eq!(sub.shape(), vec![3, 2]);
    assert_eq!(sub.attribute(&key(&[3, 4]), "f").unwrap().as_f64(), Some(0.75));

    let sub = complex.restrict_to_cells(&[key(&[1, 2, 3])]).unwrap();
    assert_eq!(sub.shape(), vec![3, 3, 1]);
    assert_eq!(sub.attribute(&key(&[1, 2]), "f").unwrap().as_f64(), Some(0.25));
    assert!(matches!(
      complex.set_attribute(&key(&[1, 4]), "f", 1.0),
      Err(ComplexError::KeyMissing { rank: 1, .. })
    ));
  }

  #[test]
  fn filtration_levels_follow_restriction() {
    let key = |v: &[u32]| SimplexKey::new(v.iter().copied()).unwrap();
    let mut complex = SimplicialComplex::from_simplices([vec![1, 2, 3], vec![3, 4]]).unwrap();
    complex
      .set_filtration(
        "level",
        [(key(&[1]), 0.0), (key(&[1, 2]), 0.5), (key(&[1, 2, 3]), 1.0), (key(&[3, 4]), 2.0)],
      )
      .unwrap();
    assert!(matches!(
      complex.set_filtration("level", [(key(&[4]), AttrValue::Bool(true))]),
      Err(ComplexError::NonNumericAttribute { .. })
    ));

    let sub = complex.restrict_to_nodes(&[1, 2, 4]).unwrap();
    let levels = sub.filtration("level").unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[&key(&[1])], 0.0);
    assert_eq!(levels[&key(&[1, 2])], 0.5);

    let sub = complex.restrict_to_cells(&[key(&[1, 2, 3])]).unwrap();
    assert_eq!(sub.filtration("level").unwrap().len(), 3);
    assert_eq!(sub.filtration("level").unwrap()[&key(&[1, 2, 3])], 1.0);
  }
}
