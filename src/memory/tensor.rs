//! Fixed-size vector and matrix values.
//!
//! `F` is the feature count. It is a const generic so every tensor inside one
//! execution context necessarily shares it.

use crate::types::{FeatureIndexT, Scalar};
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const F: usize>(pub [Scalar; F]);

/// Row-major `F x F` matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const F: usize>(pub [[Scalar; F]; F]);

impl<const F: usize> Vector<F> {
    pub fn zeros() -> Self {
        Self([0.0; F])
    }

    pub fn filled(value: Scalar) -> Self {
        Self([value; F])
    }

    pub fn as_slice(&self) -> &[Scalar] {
        &self.0
    }

    pub fn map(&self, f: impl Fn(Scalar) -> Scalar) -> Self {
        Self(self.0.map(f))
    }

    pub fn zip_map(&self, other: &Self, f: impl Fn(Scalar, Scalar) -> Scalar) -> Self {
        let mut out = [0.0; F];
        for (i, value) in out.iter_mut().enumerate() {
            *value = f(self.0[i], other.0[i]);
        }
        Self(out)
    }

    pub fn dot(&self, other: &Self) -> Scalar {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn norm(&self) -> Scalar {
        self.dot(self).sqrt()
    }

    pub fn sum(&self) -> Scalar {
        self.0.iter().sum()
    }

    pub fn mean(&self) -> Scalar {
        mean(&self.0)
    }

    /// Population standard deviation.
    pub fn st_dev(&self) -> Scalar {
        st_dev(&self.0)
    }

    pub fn outer(&self, other: &Self) -> Matrix<F> {
        let mut out = Matrix::zeros();
        for i in 0..F {
            for j in 0..F {
                out.0[i][j] = self.0[i] * other.0[j];
            }
        }
        out
    }
}

impl<const F: usize> Default for Vector<F> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const F: usize> Index<FeatureIndexT> for Vector<F> {
    type Output = Scalar;

    fn index(&self, index: FeatureIndexT) -> &Scalar {
        &self.0[index]
    }
}

impl<const F: usize> IndexMut<FeatureIndexT> for Vector<F> {
    fn index_mut(&mut self, index: FeatureIndexT) -> &mut Scalar {
        &mut self.0[index]
    }
}

impl<const F: usize> Matrix<F> {
    pub fn zeros() -> Self {
        Self([[0.0; F]; F])
    }

    pub fn filled(value: Scalar) -> Self {
        Self([[value; F]; F])
    }

    pub fn map(&self, f: impl Fn(Scalar) -> Scalar) -> Self {
        Self(self.0.map(|row| row.map(&f)))
    }

    pub fn zip_map(&self, other: &Self, f: impl Fn(Scalar, Scalar) -> Scalar) -> Self {
        let mut out = Self::zeros();
        for i in 0..F {
            for j in 0..F {
                out.0[i][j] = f(self.0[i][j], other.0[i][j]);
            }
        }
        out
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros();
        for i in 0..F {
            for j in 0..F {
                out.0[j][i] = self.0[i][j];
            }
        }
        out
    }

    pub fn mat_mul(&self, other: &Self) -> Self {
        let mut out = Self::zeros();
        for i in 0..F {
            for j in 0..F {
                out.0[i][j] = (0..F).map(|k| self.0[i][k] * other.0[k][j]).sum();
            }
        }
        out
    }

    pub fn mul_vec(&self, vector: &Vector<F>) -> Vector<F> {
        let mut out = Vector::zeros();
        for i in 0..F {
            out.0[i] = self.0[i].iter().zip(vector.0.iter()).map(|(a, b)| a * b).sum();
        }
        out
    }

    /// Every column equals `vector`.
    pub fn column_broadcast(vector: &Vector<F>) -> Self {
        let mut out = Self::zeros();
        for i in 0..F {
            out.0[i] = [vector.0[i]; F];
        }
        out
    }

    /// Every row equals `vector`.
    pub fn row_broadcast(vector: &Vector<F>) -> Self {
        Self([vector.0; F])
    }

    /// Frobenius norm.
    pub fn norm(&self) -> Scalar {
        self.0.iter().flatten().map(|x| x * x).sum::<Scalar>().sqrt()
    }

    pub fn column_norms(&self) -> Vector<F> {
        let mut out = Vector::zeros();
        for j in 0..F {
            out.0[j] = (0..F).map(|i| self.0[i][j] * self.0[i][j]).sum::<Scalar>().sqrt();
        }
        out
    }

    pub fn row_norms(&self) -> Vector<F> {
        Vector(self.0.map(|row| Vector(row).norm()))
    }

    pub fn row_means(&self) -> Vector<F> {
        Vector(self.0.map(|row| mean(&row)))
    }

    pub fn row_st_devs(&self) -> Vector<F> {
        Vector(self.0.map(|row| st_dev(&row)))
    }

    pub fn mean(&self) -> Scalar {
        let flat: Vec<Scalar> = self.0.iter().flatten().copied().collect();
        mean(&flat)
    }

    pub fn st_dev(&self) -> Scalar {
        let flat: Vec<Scalar> = self.0.iter().flatten().copied().collect();
        st_dev(&flat)
    }
}

impl<const F: usize> Default for Matrix<F> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const F: usize> Index<(FeatureIndexT, FeatureIndexT)> for Matrix<F> {
    type Output = Scalar;

    fn index(&self, (row, col): (FeatureIndexT, FeatureIndexT)) -> &Scalar {
        &self.0[row][col]
    }
}

impl<const F: usize> IndexMut<(FeatureIndexT, FeatureIndexT)> for Matrix<F> {
    fn index_mut(&mut self, (row, col): (FeatureIndexT, FeatureIndexT)) -> &mut Scalar {
        &mut self.0[row][col]
    }
}

fn mean(values: &[Scalar]) -> Scalar {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<Scalar>() / values.len() as Scalar
}

fn st_dev(values: &[Scalar]) -> Scalar {
    if values.is_empty() {
        return 0.0;
    }
    let center = mean(values);
    let variance = values.iter().map(|x| (x - center) * (x - center)).sum::<Scalar>() / values.len() as Scalar;
    variance.sqrt()
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &[Scalar]) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in row.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    write!(f, "]")
}

/// Diagnostic rendering, e.g. `[1, 2.5, -3]`. Not a serialization format.
impl<const F: usize> fmt::Display for Vector<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_row(f, &self.0)
    }
}

/// Diagnostic rendering, e.g. `[[1, 2], [3, 4]]`.
impl<const F: usize> fmt::Display for Matrix<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_row(f, row)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering() {
        let v = Vector([1.0, 2.5, -3.0]);
        assert_eq!(v.to_string(), "[1, 2.5, -3]");

        let m = Matrix([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m.to_string(), "[[1, 2], [3, 4]]");
        assert_eq!(Vector::<0>::zeros().to_string(), "[]");
    }

    #[test]
    fn test_broadcasts() {
        let v = Vector([1.0, 2.0]);
        assert_eq!(Matrix::column_broadcast(&v), Matrix([[1.0, 1.0], [2.0, 2.0]]));
        assert_eq!(Matrix::row_broadcast(&v), Matrix([[1.0, 2.0], [1.0, 2.0]]));
    }

    #[test]
    fn test_products() {
        let m = Matrix([[1.0, 2.0], [3.0, 4.0]]);
        let v = Vector([1.0, 1.0]);
        assert_eq!(m.mul_vec(&v), Vector([3.0, 7.0]));
        assert_eq!(m.mat_mul(&Matrix([[1.0, 0.0], [0.0, 1.0]])), m);
        assert_eq!(m.transpose(), Matrix([[1.0, 3.0], [2.0, 4.0]]));
        assert_eq!(v.outer(&Vector([2.0, 3.0])), Matrix([[2.0, 3.0], [2.0, 3.0]]));
        assert_eq!(Vector([3.0, 4.0]).norm(), 5.0);
    }

    #[test]
    fn test_statistics() {
        let v = Vector([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(v.mean(), 5.0);
        assert_eq!(v.st_dev(), 2.0);
        let m = Matrix([[1.0, 3.0], [5.0, 7.0]]);
        assert_eq!(m.row_means(), Vector([2.0, 6.0]));
        assert_eq!(m.row_st_devs(), Vector([1.0, 1.0]));
        assert_eq!(m.mean(), 4.0);
    }
}
