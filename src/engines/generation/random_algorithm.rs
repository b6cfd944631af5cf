use crate::error::Result;
use crate::instructions::{Algorithm, Op, RawInstruction};
use crate::memory::{AddressSpace, MemoryLayout};
use crate::types::{FeatureIndexT, IntegerT};
use crate::utils::{ensure_non_empty, safe_cast};
use rand::seq::SliceRandom;
use rand::Rng;

/// Samples random candidates, e.g. to seed a population or drive tests.
///
/// Instructions are drawn as plain integers and go through the same
/// validating conversion as any externally produced program.
pub struct RandomAlgorithmGenerator {
    layout: MemoryLayout,
    allowed_ops: Vec<Op>,
    feature_size: FeatureIndexT,
    setup_size: usize,
    predict_size: usize,
    learn_size: usize,
}

impl RandomAlgorithmGenerator {
    pub fn new(layout: MemoryLayout, allowed_ops: Vec<Op>, feature_size: FeatureIndexT) -> Result<Self> {
        ensure_non_empty(&allowed_ops, "allowed ops")?;
        layout.validate()?;
        Ok(Self {
            layout,
            allowed_ops,
            feature_size,
            setup_size: 4,
            predict_size: 6,
            learn_size: 6,
        })
    }

    pub fn with_sizes(mut self, setup: usize, predict: usize, learn: usize) -> Self {
        self.setup_size = setup;
        self.predict_size = predict;
        self.learn_size = learn;
        self
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Algorithm> {
        let setup = self.random_component(self.setup_size, rng)?;
        let predict = self.random_component(self.predict_size, rng)?;
        let learn = self.random_component(self.learn_size, rng)?;
        Algorithm::from_raw(&setup, &predict, &learn)
    }

    fn random_component<R: Rng>(&self, size: usize, rng: &mut R) -> Result<Vec<RawInstruction>> {
        (0..size).map(|_| self.random_instruction(rng)).collect()
    }

    fn random_instruction<R: Rng>(&self, rng: &mut R) -> Result<RawInstruction> {
        let op = self.allowed_ops.choose(rng).copied().unwrap_or(Op::NoOp);
        let spaces = op.operand_spaces();
        let mut address = |space: Option<AddressSpace>| -> IntegerT {
            space.map_or(0, |space| IntegerT::from(rng.gen_range(0..space.capacity(&self.layout))))
        };
        let in1 = address(spaces.in1);
        let in2 = address(spaces.in2);
        let out = address(spaces.out);

        let index_bound: IntegerT = safe_cast(self.feature_size.max(1))?;
        Ok(RawInstruction {
            op: op.code(),
            in1,
            in2,
            out,
            activation_data: rng.gen_range(-1.0..1.0),
            index_data_0: rng.gen_range(0..index_bound),
            index_data_1: rng.gen_range(0..index_bound),
            float_data_0: rng.gen_range(-1.0..0.0),
            float_data_1: rng.gen_range(0.0..1.0),
        })
    }
}
