//! Structural invariants and operators of cell complexes.

extern crate nalgebra as na;

use topocomplex::{
  complex::Complex, store::Store, Attributes, CellComplex, CellKey, ComplexError,
};

fn init_logging() {
  let _ = tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_test_writer()
    .try_init();
}

/// Every stored entity is maximal exactly when nothing contains it, and
/// every face lists the entities it belongs to.
fn assert_consistent(store: &Store<CellKey<u32>>) {
  for (key, record) in store.iter() {
    assert_eq!(record.is_maximal(), record.membership().is_empty());
    for face in record.faces() {
      let face_record = store.record(face).expect("face is stored");
      assert!(face_record.membership().contains(key));
    }
    for sup in record.membership() {
      assert!(store.faces_of(sup).unwrap().contains(key));
    }
  }
}

#[test]
fn two_squares_shape() {
  init_logging();
  let mut complex = CellComplex::new();
  complex.add_cell([1, 2, 3, 4], 2).unwrap();
  complex.add_cell([2, 3, 4, 5], 2).unwrap();
  assert_eq!(complex.nentities(0), 5);
  assert_eq!(complex.nentities(1), 6);
  assert_eq!(complex.nentities(2), 2);
  assert_eq!(complex.shape(), vec![5, 6, 2]);
  assert_consistent(complex.store());
}

#[test]
fn laplacians_from_incidence() {
  let mut complex = CellComplex::new();
  complex
    .add_cells_from([[1, 2, 3], [2, 3, 4], [3, 4, 5]], 2)
    .unwrap();
  let b1 = complex.incidence_matrix(1, true).unwrap().to_nalgebra_dense();
  let up0 = complex.up_laplacian(0).unwrap().to_nalgebra_dense();
  let down1 = complex.down_laplacian(1).unwrap().to_nalgebra_dense();
  assert_eq!(up0, &b1 * b1.transpose());
  assert_eq!(down1, b1.transpose() * &b1);

  let b2 = complex.incidence_matrix(2, true).unwrap().to_nalgebra_dense();
  assert_eq!(
    complex.up_laplacian(1).unwrap().to_nalgebra_dense(),
    &b2 * b2.transpose()
  );
  assert_eq!((&b1 * &b2).abs().max(), 0.0);
  assert_eq!(complex.up_laplacian(2).unwrap().nnz(), 0);
  assert_eq!(complex.down_laplacian(0).unwrap().nnz(), 0);
}

#[test]
fn weighted_laplacian_scales_edges() {
  let mut complex = CellComplex::new();
  complex.add_edge(0, 1).unwrap();
  complex.add_edge(1, 2).unwrap();
  let weights = na::DVector::from_vec(vec![0.5, 2.0]);
  let l0 = complex
    .up_laplacian_weighted(0, &weights)
    .unwrap()
    .to_nalgebra_dense();
  #[rustfmt::skip]
  let expected = na::DMatrix::from_row_slice(3, 3, &[
     0.5, -0.5,  0.0,
    -0.5,  2.5, -2.0,
     0.0, -2.0,  2.0,
  ]);
  approx::assert_relative_eq!(l0, expected);
}

#[test]
fn disjoint_triangles_are_disconnected() {
  let mut complex = CellComplex::new();
  complex.add_cell([2, 3, 4], 2).unwrap();
  complex.add_cell([5, 6, 7], 2).unwrap();
  assert_eq!(complex.connected_components(false, true).len(), 2);
  assert_eq!(complex.connected_components(true, true).len(), 2);
  assert!(matches!(
    complex.diameter(1),
    Err(ComplexError::DisconnectedComplex)
  ));
  assert!(matches!(
    complex.cell_diameter(1),
    Err(ComplexError::DisconnectedComplex)
  ));
  let (diameters, _) = complex.node_diameters(1);
  assert_eq!(diameters, vec![1, 1]);
}

#[test]
fn removing_a_node_keeps_the_opposite_edge() {
  let mut complex = CellComplex::new();
  complex.add_cell([1, 2, 3], 2).unwrap();
  complex.remove_node(1).unwrap();
  assert_eq!(complex.nodes(), vec![2, 3]);
  assert_eq!(complex.edges(), vec![(2, 3)]);
  assert_eq!(complex.shape(), vec![2, 1]);
  assert_consistent(complex.store());
}

#[test]
fn non_regular_rotations_are_distinct() {
  let mut complex = CellComplex::non_regular();
  complex.add_cell([1, 2, 3, 4], 2).unwrap();
  complex.add_cell([2, 3, 4, 1], 2).unwrap();
  assert_eq!(complex.cells().count(), 2);
  assert!(!complex.is_regular());
  assert_consistent(complex.store());

  let b2 = complex.incidence_matrix(2, true).unwrap().to_nalgebra_dense();
  assert_eq!(b2.column(0), b2.column(1));
}

#[test]
fn regular_insertion_is_idempotent() {
  let mut complex = CellComplex::new();
  let attrs = Attributes::new().with("label", "a");
  let first = complex.add_cell_with([1, 2, 3, 4], 2, attrs.clone()).unwrap();
  let shape = complex.shape();
  let second = complex
    .add_cell_with([1, 2, 3, 4], 2, Attributes::new().with("weight", 2))
    .unwrap();
  assert_eq!(first, second);
  assert_eq!(complex.shape(), shape);
  let stored = complex.store().attributes(&first).unwrap();
  assert_eq!(stored.len(), 2);
  assert_eq!(stored.get("label").unwrap().as_str(), Some("a"));
}

#[test]
fn deletion_inverts_insertion() {
  let mut complex = CellComplex::new();
  complex.add_cell([1, 2, 3], 2).unwrap();
  let nodes = complex.nodes();
  let edges = complex.edges();

  complex.add_cell([7, 8, 9], 2).unwrap();
  complex.remove_cell(&[7, 8, 9], None).unwrap();
  for n in [7, 8, 9] {
    complex.remove_node(n).unwrap();
  }
  assert_eq!(complex.nodes(), nodes);
  assert_eq!(complex.edges(), edges);
  assert_consistent(complex.store());
}

#[test]
fn invariants_survive_mixed_updates() {
  let mut complex = CellComplex::non_regular();
  complex
    .add_cells_from([vec![1, 2, 3, 4], vec![3, 4, 5], vec![4, 3, 2, 1]], 2)
    .unwrap();
  complex.add_edge(5, 6).unwrap();
  assert_consistent(complex.store());

  complex.remove_cell(&[1, 2, 3, 4], Some(1)).unwrap();
  assert_consistent(complex.store());
  complex.remove_edge(3, 4).unwrap();
  assert_consistent(complex.store());
  assert_eq!(complex.cells().count(), 0);
  assert!(complex.is_maximal(&CellKey::Edge(1, 2)).unwrap());

  complex.add_cell([1, 2, 6, 5], 2).unwrap();
  assert_consistent(complex.store());
  assert!(!complex.is_maximal(&CellKey::Edge(5, 6)).unwrap());
}

#[test]
fn signed_boundaries_compose_to_zero() {
  let mut complex = CellComplex::non_regular();
  complex
    .add_cells_from(
      [
        vec![1, 2, 3, 4],
        vec![4, 3, 5],
        vec![5, 6, 7, 8],
        vec![2, 3, 4, 5, 2, 3, 4, 5],
      ],
      2,
    )
    .unwrap();
  let b1 = complex.incidence_matrix(1, true).unwrap();
  let b2 = complex.incidence_matrix(2, true).unwrap();
  assert_eq!(b1.matmul(&b2).nnz(), 0);
  assert_eq!(complex.incidence_matrix(0, true).unwrap().shape(), (0, 8));
  assert!(matches!(
    complex.incidence_matrix(3, true),
    Err(ComplexError::InvalidRank { rank: 3, max: 2 })
  ));
}

#[test]
fn empty_complex_operators() {
  let complex = CellComplex::<u32>::new();
  assert!(complex.shape().is_empty());
  assert_eq!(complex.incidence_matrix(2, true).unwrap().shape(), (0, 0));
  assert_eq!(complex.hodge_laplacian(1).unwrap().shape(), (0, 0));
  assert_eq!(complex.diameter(1).unwrap(), 0);
}
