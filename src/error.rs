use crate::Rank;

pub type Result<T> = std::result::Result<T, ComplexError>;

/// Everything that can go wrong while building or querying a complex.
///
/// Keys are rendered with `Debug`, so the error type stays independent
/// of the node type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplexError {
  #[error("rank {rank} is out of range, maximal admissible rank is {max}")]
  InvalidRank { rank: Rank, max: Rank },
  #[error("rank {0} is not supported by this complex")]
  UnsupportedRank(Rank),
  #[error("an edge requires exactly two nodes, got {0}")]
  InvalidEdge(usize),
  #[error("self-loops are not allowed: {0}")]
  SelfLoop(String),
  #[error("duplicate element in {0}")]
  DuplicateElement(String),
  #[error("an entity must contain at least one element")]
  EmptyEntity,
  #[error("{0} is not an insertable cycle")]
  CycleViolation(String),
  #[error("{0} is not contained in the complex")]
  NotFound(String),
  #[error("no entity {key} of rank {rank}")]
  KeyMissing { key: String, rank: Rank },
  #[error("entity {key} has no attribute `{name}`")]
  AttributeMissing { key: String, name: String },
  #[error("{key} matches {count} cells, an index is required")]
  AmbiguousKey { key: String, count: usize },
  #[error("{0} is not maximal and cannot be removed directly")]
  NotMaximal(String),
  #[error("complex is not connected")]
  DisconnectedComplex,
  #[error("unsupported input: {0}")]
  UnsupportedInput(String),
  #[error("expected {expected} weights, got {got}")]
  WeightMismatch { expected: usize, got: usize },
  #[error("attribute `{name}` of {key} is not numeric")]
  NonNumericAttribute { key: String, name: String },
}

impl ComplexError {
  pub(crate) fn key_missing(key: &impl std::fmt::Debug, rank: Rank) -> Self {
    Self::KeyMissing {
      key: format!("{key:?}"),
      rank,
    }
  }

  pub(crate) fn non_numeric(key: &impl std::fmt::Debug, name: &str) -> Self {
    Self::NonNumericAttribute {
      key: format!("{key:?}"),
      name: name.to_owned(),
    }
  }

  /// Malformed input rejected before touching the store.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::InvalidRank { .. }
        | Self::UnsupportedRank(_)
        | Self::InvalidEdge(_)
        | Self::SelfLoop(_)
        | Self::DuplicateElement(_)
        | Self::EmptyEntity
    )
  }
}
