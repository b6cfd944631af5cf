use crate::error::Result;
use crate::instructions::{Algorithm, ComponentFunction, Instruction, Op};
use crate::memory::{Matrix, Memory, MemoryLayout, Vector};
use crate::types::{FeatureIndexT, RandomSeedT, Scalar};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

fn heaviside(x: Scalar) -> Scalar {
    if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

fn uniform(rng: &mut StdRng, low: Scalar, high: Scalar) -> Scalar {
    low + (high - low) * rng.gen::<f64>()
}

// Scaled standard normal, so a zero or negative `std_dev` is still defined.
fn gaussian(rng: &mut StdRng, mean: Scalar, std_dev: Scalar) -> Scalar {
    let sample: f64 = StandardNormal.sample(rng);
    mean + std_dev * sample
}

/// Runs one candidate against its own private memory.
///
/// The algorithm must have passed `Algorithm::validate` with the same layout
/// and `F`; `new` re-checks it so no out-of-range address is ever touched.
pub struct Executor<'a, const F: usize> {
    algorithm: &'a Algorithm,
    memory: Memory<F>,
    rng: StdRng,
}

impl<'a, const F: usize> Executor<'a, F> {
    pub fn new(algorithm: &'a Algorithm, layout: &MemoryLayout, seed: RandomSeedT) -> Result<Self> {
        algorithm.validate(layout, F, usize::MAX)?;
        Ok(Self {
            algorithm,
            memory: Memory::new(layout),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn memory(&self) -> &Memory<F> {
        &self.memory
    }

    pub fn run_setup(&mut self) {
        self.run(ComponentFunction::Setup);
    }

    /// Loads the features, runs predict and returns the prediction slot.
    pub fn predict(&mut self, features: &Vector<F>) -> Scalar {
        self.memory.load_features(features);
        self.run(ComponentFunction::Predict);
        self.memory.prediction()
    }

    /// Loads the label and runs learn. Call after `predict` on the same example.
    pub fn learn(&mut self, label: Scalar) {
        self.memory.load_label(label);
        self.run(ComponentFunction::Learn);
    }

    fn run(&mut self, component: ComponentFunction) {
        for instruction in self.algorithm.component(component) {
            self.execute(instruction);
        }
    }

    fn execute(&mut self, ins: &Instruction) {
        let m = &mut self.memory;
        let (a, b, out) = (ins.in1, ins.in2, ins.out);
        match ins.op {
            Op::NoOp => {}

            Op::ScalarSum => m.set_scalar(out, m.scalar(a) + m.scalar(b)),
            Op::ScalarDiff => m.set_scalar(out, m.scalar(a) - m.scalar(b)),
            Op::ScalarProduct => m.set_scalar(out, m.scalar(a) * m.scalar(b)),
            Op::ScalarDivision => m.set_scalar(out, m.scalar(a) / m.scalar(b)),
            Op::ScalarMin => m.set_scalar(out, m.scalar(a).min(m.scalar(b))),
            Op::ScalarMax => m.set_scalar(out, m.scalar(a).max(m.scalar(b))),
            Op::ScalarAbs => m.set_scalar(out, m.scalar(a).abs()),
            Op::ScalarReciprocal => m.set_scalar(out, 1.0 / m.scalar(a)),
            Op::ScalarSin => m.set_scalar(out, m.scalar(a).sin()),
            Op::ScalarCos => m.set_scalar(out, m.scalar(a).cos()),
            Op::ScalarTan => m.set_scalar(out, m.scalar(a).tan()),
            Op::ScalarArcsin => m.set_scalar(out, m.scalar(a).asin()),
            Op::ScalarArccos => m.set_scalar(out, m.scalar(a).acos()),
            Op::ScalarArctan => m.set_scalar(out, m.scalar(a).atan()),
            Op::ScalarExp => m.set_scalar(out, m.scalar(a).exp()),
            Op::ScalarLog => m.set_scalar(out, m.scalar(a).ln()),
            Op::ScalarHeaviside => m.set_scalar(out, heaviside(m.scalar(a))),

            Op::VectorHeaviside => m.set_vector(out, m.vector(a).map(heaviside)),
            Op::VectorReciprocal => m.set_vector(out, m.vector(a).map(|x| 1.0 / x)),
            Op::VectorAbs => m.set_vector(out, m.vector(a).map(f64::abs)),
            Op::ScalarVectorProduct => {
                let s = m.scalar(a);
                m.set_vector(out, m.vector(b).map(|x| s * x))
            }
            Op::ScalarBroadcast => m.set_vector(out, Vector::filled(m.scalar(a))),
            Op::VectorNorm => m.set_scalar(out, m.vector(a).norm()),
            Op::VectorMean => m.set_scalar(out, m.vector(a).mean()),
            Op::VectorStDev => m.set_scalar(out, m.vector(a).st_dev()),
            Op::VectorSum => m.set_vector(out, m.vector(a).zip_map(m.vector(b), |x, y| x + y)),
            Op::VectorDiff => m.set_vector(out, m.vector(a).zip_map(m.vector(b), |x, y| x - y)),
            Op::VectorProduct => m.set_vector(out, m.vector(a).zip_map(m.vector(b), |x, y| x * y)),
            Op::VectorDivision => m.set_vector(out, m.vector(a).zip_map(m.vector(b), |x, y| x / y)),
            Op::VectorMin => m.set_vector(out, m.vector(a).zip_map(m.vector(b), f64::min)),
            Op::VectorMax => m.set_vector(out, m.vector(a).zip_map(m.vector(b), f64::max)),
            Op::VectorInnerProduct => m.set_scalar(out, m.vector(a).dot(m.vector(b))),
            Op::VectorOuterProduct => m.set_matrix(out, m.vector(a).outer(m.vector(b))),

            Op::MatrixHeaviside => m.set_matrix(out, m.matrix(a).map(heaviside)),
            Op::MatrixReciprocal => m.set_matrix(out, m.matrix(a).map(|x| 1.0 / x)),
            Op::MatrixAbs => m.set_matrix(out, m.matrix(a).map(f64::abs)),
            Op::MatrixTranspose => m.set_matrix(out, m.matrix(a).transpose()),
            Op::ScalarMatrixProduct => {
                let s = m.scalar(a);
                m.set_matrix(out, m.matrix(b).map(|x| s * x))
            }
            Op::MatrixVectorProduct => m.set_vector(out, m.matrix(a).mul_vec(m.vector(b))),
            Op::VectorColumnBroadcast => m.set_matrix(out, Matrix::column_broadcast(m.vector(a))),
            Op::VectorRowBroadcast => m.set_matrix(out, Matrix::row_broadcast(m.vector(a))),
            Op::MatrixNorm => m.set_scalar(out, m.matrix(a).norm()),
            Op::MatrixMean => m.set_scalar(out, m.matrix(a).mean()),
            Op::MatrixStDev => m.set_scalar(out, m.matrix(a).st_dev()),
            Op::MatrixColumnNorm => m.set_vector(out, m.matrix(a).column_norms()),
            Op::MatrixRowNorm => m.set_vector(out, m.matrix(a).row_norms()),
            Op::MatrixRowMean => m.set_vector(out, m.matrix(a).row_means()),
            Op::MatrixRowStDev => m.set_vector(out, m.matrix(a).row_st_devs()),
            Op::MatrixSum => m.set_matrix(out, m.matrix(a).zip_map(m.matrix(b), |x, y| x + y)),
            Op::MatrixDiff => m.set_matrix(out, m.matrix(a).zip_map(m.matrix(b), |x, y| x - y)),
            Op::MatrixProduct => m.set_matrix(out, m.matrix(a).zip_map(m.matrix(b), |x, y| x * y)),
            Op::MatrixDivision => m.set_matrix(out, m.matrix(a).zip_map(m.matrix(b), |x, y| x / y)),
            Op::MatrixMin => m.set_matrix(out, m.matrix(a).zip_map(m.matrix(b), f64::min)),
            Op::MatrixMax => m.set_matrix(out, m.matrix(a).zip_map(m.matrix(b), f64::max)),
            Op::MatrixMatrixProduct => m.set_matrix(out, m.matrix(a).mat_mul(m.matrix(b))),

            Op::ScalarConstSet => m.set_scalar(out, ins.activation_data),
            Op::VectorConstSet => {
                let mut value = *m.vector(out);
                value[ins.index_data_0] = ins.activation_data;
                m.set_vector(out, value);
            }
            Op::MatrixConstSet => {
                let mut value = *m.matrix(out);
                value[(ins.index_data_0, ins.index_data_1)] = ins.activation_data;
                m.set_matrix(out, value);
            }

            Op::ScalarUniformSet => {
                let value = uniform(&mut self.rng, ins.float_data_0, ins.float_data_1);
                m.set_scalar(out, value);
            }
            Op::VectorUniformSet => {
                let mut value = Vector::<F>::zeros();
                for i in 0..F {
                    value[i] = uniform(&mut self.rng, ins.float_data_0, ins.float_data_1);
                }
                m.set_vector(out, value);
            }
            Op::MatrixUniformSet => {
                let mut value = Matrix::<F>::zeros();
                for_each_cell::<F>(|cell| {
                    value[cell] = uniform(&mut self.rng, ins.float_data_0, ins.float_data_1);
                });
                m.set_matrix(out, value);
            }
            Op::ScalarGaussianSet => {
                let value = gaussian(&mut self.rng, ins.float_data_0, ins.float_data_1);
                m.set_scalar(out, value);
            }
            Op::VectorGaussianSet => {
                let mut value = Vector::<F>::zeros();
                for i in 0..F {
                    value[i] = gaussian(&mut self.rng, ins.float_data_0, ins.float_data_1);
                }
                m.set_vector(out, value);
            }
            Op::MatrixGaussianSet => {
                let mut value = Matrix::<F>::zeros();
                for_each_cell::<F>(|cell| {
                    value[cell] = gaussian(&mut self.rng, ins.float_data_0, ins.float_data_1);
                });
                m.set_matrix(out, value);
            }
        }
    }
}

/// Row-major walk over every `(row, col)` of an `F x F` matrix.
fn for_each_cell<const F: usize>(mut f: impl FnMut((FeatureIndexT, FeatureIndexT))) {
    for row in 0..F {
        for col in 0..F {
            f((row, col));
        }
    }
}
