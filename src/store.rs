//! Dimension-indexed storage of complex entities.
//!
//! Every skeleton maps canonical keys to [`Record`]s in insertion order.
//! Records remember their faces and the higher-rank entities containing them,
//! which keeps the two directions of the face relation in sync:
//!
//! - every face of a stored entity is stored and lists the entity in its membership
//! - an entity is maximal iff its membership is empty

use crate::{
  attribute::{AttrValue, Attributes},
  error::{ComplexError, Result},
  Rank,
};

use indexmap::{IndexMap, IndexSet};
use std::{fmt::Debug, hash::Hash};
use tracing::trace;

/// Canonical key of a stored entity. The key determines its rank.
pub trait StoreKey: Clone + Eq + Hash + Debug {
  fn rank(&self) -> Rank;
}

pub type Skeleton<K> = IndexMap<K, Record<K>>;

#[derive(Debug, Clone)]
pub struct Record<K> {
  attributes: Attributes,
  faces: Vec<K>,
  membership: IndexSet<K>,
}

impl<K: StoreKey> Record<K> {
  fn new(attributes: Attributes, faces: Vec<K>) -> Self {
    Self {
      attributes,
      faces,
      membership: IndexSet::new(),
    }
  }

  pub fn attributes(&self) -> &Attributes {
    &self.attributes
  }
  pub fn attributes_mut(&mut self) -> &mut Attributes {
    &mut self.attributes
  }
  /// All proper faces, lower ranks first.
  pub fn faces(&self) -> &[K] {
    &self.faces
  }
  /// The higher-rank entities having this one as a face.
  pub fn membership(&self) -> &IndexSet<K> {
    &self.membership
  }
  pub fn is_maximal(&self) -> bool {
    self.membership.is_empty()
  }
}

#[derive(Debug, Clone)]
pub struct Store<K> {
  skeletons: Vec<Skeleton<K>>,
}

impl<K> Default for Store<K> {
  fn default() -> Self {
    Self {
      skeletons: Vec::new(),
    }
  }
}

impl<K: StoreKey> Store<K> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Highest rank with at least one entity.
  pub fn max_rank(&self) -> Option<Rank> {
    self.skeletons.iter().rposition(|s| !s.is_empty())
  }
  pub fn is_empty(&self) -> bool {
    self.max_rank().is_none()
  }

  pub fn skeleton(&self, rank: Rank) -> Option<&Skeleton<K>> {
    self.skeletons.get(rank)
  }
  pub fn keys(&self, rank: Rank) -> impl Iterator<Item = &K> {
    self.skeleton(rank).into_iter().flat_map(|s| s.keys())
  }
  pub fn len(&self, rank: Rank) -> usize {
    self.skeleton(rank).map_or(0, |s| s.len())
  }
  /// Number of entities per rank, up to the maximal rank.
  pub fn shape(&self) -> Vec<usize> {
    match self.max_rank() {
      Some(max) => (0..=max).map(|r| self.len(r)).collect(),
      None => Vec::new(),
    }
  }
  pub fn total_len(&self) -> usize {
    self.skeletons.iter().map(|s| s.len()).sum()
  }

  pub fn contains(&self, key: &K) -> bool {
    self.record(key).is_some()
  }
  pub fn record(&self, key: &K) -> Option<&Record<K>> {
    self.skeleton(key.rank())?.get(key)
  }
  pub fn position(&self, key: &K) -> Option<usize> {
    self.skeleton(key.rank())?.get_index_of(key)
  }

  fn try_record(&self, key: &K) -> Result<&Record<K>> {
    self
      .record(key)
      .ok_or_else(|| ComplexError::key_missing(key, key.rank()))
  }
  fn try_record_mut(&mut self, key: &K) -> Result<&mut Record<K>> {
    self
      .skeletons
      .get_mut(key.rank())
      .and_then(|s| s.get_mut(key))
      .ok_or_else(|| ComplexError::key_missing(key, key.rank()))
  }

  pub fn is_maximal(&self, key: &K) -> Result<bool> {
    self.try_record(key).map(Record::is_maximal)
  }
  pub fn membership(&self, key: &K) -> Result<&IndexSet<K>> {
    self.try_record(key).map(Record::membership)
  }
  pub fn faces_of(&self, key: &K) -> Result<&[K]> {
    self.try_record(key).map(Record::faces)
  }
  /// Faces of `key` of the given rank, including `key` itself at its own rank.
  pub fn faces_of_rank(&self, key: &K, rank: Rank) -> Result<Vec<K>> {
    let record = self.try_record(key)?;
    if key.rank() == rank {
      return Ok(vec![key.clone()]);
    }
    Ok(
      record
        .faces
        .iter()
        .filter(|f| f.rank() == rank)
        .cloned()
        .collect(),
    )
  }

  pub fn attributes(&self, key: &K) -> Result<&Attributes> {
    self.try_record(key).map(Record::attributes)
  }
  pub fn attributes_mut(&mut self, key: &K) -> Result<&mut Attributes> {
    self.try_record_mut(key).map(Record::attributes_mut)
  }
  pub fn attribute(&self, key: &K, name: &str) -> Result<&AttrValue> {
    self
      .attributes(key)?
      .get(name)
      .ok_or_else(|| ComplexError::AttributeMissing {
        key: format!("{key:?}"),
        name: name.to_owned(),
      })
  }
  pub fn set_attribute(&mut self, key: &K, name: &str, value: impl Into<AttrValue>) -> Result<()> {
    self.attributes_mut(key)?.insert(name, value);
    Ok(())
  }

  /// Inserts `key` with the given proper faces, or merges `attributes` into
  /// the existing record. Returns whether a new record was created.
  ///
  /// All faces must already be stored; callers insert bottom-up.
  pub fn insert(&mut self, key: K, attributes: Attributes, faces: Vec<K>) -> Result<bool> {
    if let Some(record) = self
      .skeletons
      .get_mut(key.rank())
      .and_then(|s| s.get_mut(&key))
    {
      record.attributes.merge(attributes);
      return Ok(false);
    }
    if let Some(missing) = faces.iter().find(|f| !self.contains(f)) {
      return Err(ComplexError::key_missing(missing, missing.rank()));
    }

    for face in &faces {
      trace!(?face, ?key, "linking face");
      self.try_record_mut(face)?.membership.insert(key.clone());
    }
    let rank = key.rank();
    if self.skeletons.len() <= rank {
      self.skeletons.resize_with(rank + 1, Skeleton::default);
    }
    self.skeletons[rank].insert(key, Record::new(attributes, faces));
    Ok(true)
  }

  /// Removes a maximal entity and unlinks it from all of its faces.
  pub fn remove(&mut self, key: &K) -> Result<Record<K>> {
    let record = self
      .record(key)
      .ok_or_else(|| ComplexError::NotFound(format!("{key:?}")))?;
    if !record.is_maximal() {
      return Err(ComplexError::NotMaximal(format!("{key:?}")));
    }

    let record = self.skeletons[key.rank()]
      .shift_remove(key)
      .ok_or_else(|| ComplexError::NotFound(format!("{key:?}")))?;
    for face in &record.faces {
      if let Some(face_record) = self
        .skeletons
        .get_mut(face.rank())
        .and_then(|s| s.get_mut(face))
      {
        face_record.membership.shift_remove(key);
      }
    }
    self.truncate();
    Ok(record)
  }

  /// The entities transitively containing `key`, highest rank first.
  /// Removing them in this order never hits a non-maximal entity.
  pub fn cofaces(&self, key: &K) -> Result<Vec<K>> {
    let mut cofaces: Vec<K> = self.try_record(key)?.membership.iter().cloned().collect();
    cofaces.sort_by_key(|k| std::cmp::Reverse(k.rank()));
    Ok(cofaces)
  }

  pub fn clear(&mut self) {
    self.skeletons.clear();
  }

  fn truncate(&mut self) {
    let len = self.max_rank().map_or(0, |r| r + 1);
    self.skeletons.truncate(len);
  }

  pub fn iter(&self) -> impl Iterator<Item = (&K, &Record<K>)> {
    self.skeletons.iter().flat_map(|s| s.iter())
  }
}

#[cfg(test)]
mod test {
  use super::{Store, StoreKey};
  use crate::{attribute::Attributes, error::ComplexError, Rank};

  #[derive(Debug, Clone, PartialEq, Eq, Hash)]
  struct Key(Vec<u32>);
  impl StoreKey for Key {
    fn rank(&self) -> Rank {
      self.0.len() - 1
    }
  }

  fn triangle() -> Store<Key> {
    let mut store = Store::new();
    for v in [1, 2, 3] {
      store.insert(Key(vec![v]), Attributes::new(), vec![]).unwrap();
    }
    for (a, b) in [(1, 2), (1, 3), (2, 3)] {
      let faces = vec![Key(vec![a]), Key(vec![b])];
      store.insert(Key(vec![a, b]), Attributes::new(), faces).unwrap();
    }
    let faces = [
      vec![1],
      vec![2],
      vec![3],
      vec![1, 2],
      vec![1, 3],
      vec![2, 3],
    ]
    .into_iter()
    .map(Key)
    .collect();
    store
      .insert(Key(vec![1, 2, 3]), Attributes::new(), faces)
      .unwrap();
    store
  }

  #[test]
  fn maximality_follows_membership() {
    let mut store = triangle();
    assert_eq!(store.shape(), vec![3, 3, 1]);
    assert!(!store.is_maximal(&Key(vec![1, 2])).unwrap());
    assert_eq!(store.membership(&Key(vec![1])).unwrap().len(), 3);

    assert!(matches!(
      store.remove(&Key(vec![1, 2])),
      Err(ComplexError::NotMaximal(_))
    ));
    store.remove(&Key(vec![1, 2, 3])).unwrap();
    assert_eq!(store.max_rank(), Some(1));
    assert!(store.is_maximal(&Key(vec![1, 2])).unwrap());
    assert_eq!(store.membership(&Key(vec![1])).unwrap().len(), 2);
  }

  #[test]
  fn missing_faces_are_rejected() {
    let mut store = Store::new();
    let err = store
      .insert(Key(vec![1, 2]), Attributes::new(), vec![Key(vec![1])])
      .unwrap_err();
    assert!(matches!(err, ComplexError::KeyMissing { .. }));
    assert!(store.is_empty());
  }

  #[test]
  fn reinsertion_merges_attributes() {
    let mut store = triangle();
    let created = store
      .insert(Key(vec![1]), Attributes::new().with("w", 2.0), vec![])
      .unwrap();
    assert!(!created);
    assert_eq!(
      store.attribute(&Key(vec![1]), "w").unwrap().as_f64(),
      Some(2.0)
    );
    assert!(matches!(
      store.attribute(&Key(vec![1]), "color"),
      Err(ComplexError::AttributeMissing { .. })
    ));
  }

  #[test]
  fn cofaces_are_ordered_top_down() {
    let store = triangle();
    let cofaces = store.cofaces(&Key(vec![2])).unwrap();
    assert_eq!(cofaces[0], Key(vec![1, 2, 3]));
    assert_eq!(cofaces.len(), 3);
  }
}
