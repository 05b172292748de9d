//! Cell and simplicial complexes with their algebraic operators.
//!
//! Entities are kept in a dimension-indexed [`store::Store`] that maintains
//! face membership and maximality under insertion and deletion. Incidence
//! matrices, Laplacians, adjacency structures and s-connectivity queries are
//! derived from the store through the [`complex::Complex`] trait.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod attribute;
pub mod cell;
pub mod cellular;
pub mod combinatorics;
pub mod complex;
pub mod error;
pub mod simplex;
pub mod simplicial;
pub mod sparse;
pub mod store;

pub use attribute::{AttrValue, Attributes};
pub use cell::{Cell, CellKey};
pub use cellular::CellComplex;
pub use complex::{Complex, Components, Distance, IndexedMatrix};
pub use error::{ComplexError, Result};
pub use simplex::{Simplex, SimplexKey};
pub use simplicial::SimplicialComplex;
pub use sparse::SparseMatrix;

pub type Rank = usize;

/// Element type of a complex.
///
/// Ordering makes canonical keys deterministic.
pub trait Node: Clone + Eq + std::hash::Hash + Ord + std::fmt::Debug {}
impl<T: Clone + Eq + std::hash::Hash + Ord + std::fmt::Debug> Node for T {}
