use indexmap::IndexMap;

/// A typed attribute value attached to an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
}

impl AttrValue {
  pub fn as_bool(&self) -> Option<bool> {
    match *self {
      Self::Bool(b) => Some(b),
      _ => None,
    }
  }
  pub fn as_i64(&self) -> Option<i64> {
    match *self {
      Self::Int(i) => Some(i),
      _ => None,
    }
  }
  /// Integers are widened.
  pub fn as_f64(&self) -> Option<f64> {
    match *self {
      Self::Int(i) => Some(i as f64),
      Self::Float(f) => Some(f),
      _ => None,
    }
  }
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::Str(s) => Some(s),
      _ => None,
    }
  }
}

impl From<bool> for AttrValue {
  fn from(b: bool) -> Self {
    Self::Bool(b)
  }
}
impl From<i32> for AttrValue {
  fn from(i: i32) -> Self {
    Self::Int(i as i64)
  }
}
impl From<i64> for AttrValue {
  fn from(i: i64) -> Self {
    Self::Int(i)
  }
}
impl From<usize> for AttrValue {
  fn from(i: usize) -> Self {
    Self::Int(i as i64)
  }
}
impl From<f64> for AttrValue {
  fn from(f: f64) -> Self {
    Self::Float(f)
  }
}
impl From<&str> for AttrValue {
  fn from(s: &str) -> Self {
    Self::Str(s.to_owned())
  }
}
impl From<String> for AttrValue {
  fn from(s: String) -> Self {
    Self::Str(s)
  }
}

impl std::fmt::Display for AttrValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Bool(b) => write!(f, "{b}"),
      Self::Int(i) => write!(f, "{i}"),
      Self::Float(x) => write!(f, "{x}"),
      Self::Str(s) => write!(f, "{s:?}"),
    }
  }
}

/// Attribute map of a single entity. Insertion order is irrelevant for equality.
#[derive(Debug, Default, Clone)]
pub struct Attributes {
  map: IndexMap<String, AttrValue>,
}

impl Attributes {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder style insertion.
  pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
    self.map.insert(name.into(), value.into());
  }
  pub fn get(&self, name: &str) -> Option<&AttrValue> {
    self.map.get(name)
  }
  pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
    self.map.shift_remove(name)
  }
  pub fn contains(&self, name: &str) -> bool {
    self.map.contains_key(name)
  }

  /// Copies all of `other` into `self`, overwriting existing names.
  pub fn merge(&mut self, other: Attributes) {
    self.map.extend(other.map);
  }

  pub fn len(&self) -> usize {
    self.map.len()
  }
  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }
  pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
    self.map.iter().map(|(k, v)| (k.as_str(), v))
  }
}

impl PartialEq for Attributes {
  fn eq(&self, other: &Self) -> bool {
    self.len() == other.len()
      && self
        .map
        .iter()
        .all(|(k, v)| other.map.get(k).is_some_and(|w| w == v))
  }
}

impl<S: Into<String>, V: Into<AttrValue>> FromIterator<(S, V)> for Attributes {
  fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
    let map = iter
      .into_iter()
      .map(|(k, v)| (k.into(), v.into()))
      .collect();
    Self { map }
  }
}

#[cfg(test)]
mod test {
  use super::{AttrValue, Attributes};

  #[test]
  fn merge_overwrites() {
    let mut a = Attributes::new().with("color", "red").with("weight", 1);
    let b = Attributes::new().with("color", "blue");
    a.merge(b);
    assert_eq!(a.get("color"), Some(&AttrValue::from("blue")));
    assert_eq!(a.get("weight").and_then(AttrValue::as_f64), Some(1.0));
  }

  #[test]
  fn order_independent_equality() {
    let a: Attributes = [("x", 1), ("y", 2)].into_iter().collect();
    let b: Attributes = [("y", 2), ("x", 1)].into_iter().collect();
    assert_eq!(a, b);
  }
}
