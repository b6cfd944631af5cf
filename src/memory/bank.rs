use super::address::{
    MemoryLayout, FEATURES_VECTOR_ADDRESS, LABELS_SCALAR_ADDRESS, PREDICTIONS_SCALAR_ADDRESS,
};
use super::tensor::{Matrix, Vector};
use crate::types::{AddressT, Scalar};

/// The three typed memory banks of one execution context.
///
/// Sized from a validated `MemoryLayout`. Indexing assumes the addresses were
/// checked against that layout before execution started.
#[derive(Debug, Clone)]
pub struct Memory<const F: usize> {
    pub scalar: Vec<Scalar>,
    pub vector: Vec<Vector<F>>,
    pub matrix: Vec<Matrix<F>>,
}

impl<const F: usize> Memory<F> {
    pub fn new(layout: &MemoryLayout) -> Self {
        Self {
            scalar: vec![0.0; usize::from(layout.scalar_addresses)],
            vector: vec![Vector::zeros(); usize::from(layout.vector_addresses)],
            matrix: vec![Matrix::zeros(); usize::from(layout.matrix_addresses)],
        }
    }

    /// Zeroes every slot without reallocating.
    pub fn wipe(&mut self) {
        self.scalar.fill(0.0);
        self.vector.fill(Vector::zeros());
        self.matrix.fill(Matrix::zeros());
    }

    pub fn scalar(&self, address: AddressT) -> Scalar {
        self.scalar[usize::from(address)]
    }

    pub fn set_scalar(&mut self, address: AddressT, value: Scalar) {
        self.scalar[usize::from(address)] = value;
    }

    pub fn vector(&self, address: AddressT) -> &Vector<F> {
        &self.vector[usize::from(address)]
    }

    pub fn set_vector(&mut self, address: AddressT, value: Vector<F>) {
        self.vector[usize::from(address)] = value;
    }

    pub fn matrix(&self, address: AddressT) -> &Matrix<F> {
        &self.matrix[usize::from(address)]
    }

    pub fn set_matrix(&mut self, address: AddressT, value: Matrix<F>) {
        self.matrix[usize::from(address)] = value;
    }

    pub fn load_features(&mut self, features: &Vector<F>) {
        self.set_vector(FEATURES_VECTOR_ADDRESS, *features);
    }

    pub fn load_label(&mut self, label: Scalar) {
        self.set_scalar(LABELS_SCALAR_ADDRESS, label);
    }

    pub fn prediction(&self) -> Scalar {
        self.scalar(PREDICTIONS_SCALAR_ADDRESS)
    }
}
