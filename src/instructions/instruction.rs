use super::op::Op;
use crate::error::{AmlzError, Result};
use crate::memory::MemoryLayout;
use crate::types::{AddressT, FeatureIndexT, IntegerT};
use crate::utils::safe_cast;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One validated operation plus its operands.
///
/// Addresses are interpreted in the space `op.operand_spaces()` assigns them.
/// Operands an op does not use are kept at zero by the constructors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub op: Op,
    pub in1: AddressT,
    pub in2: AddressT,
    pub out: AddressT,
    pub activation_data: f64,
    pub index_data_0: FeatureIndexT,
    pub index_data_1: FeatureIndexT,
    pub float_data_0: f64,
    pub float_data_1: f64,
}

impl Instruction {
    pub fn new(op: Op, in1: AddressT, in2: AddressT, out: AddressT) -> Self {
        Self {
            op,
            in1,
            in2,
            out,
            activation_data: 0.0,
            index_data_0: 0,
            index_data_1: 0,
            float_data_0: 0.0,
            float_data_1: 0.0,
        }
    }

    pub fn no_op() -> Self {
        Self::new(Op::NoOp, 0, 0, 0)
    }

    /// `out = value` for the scalar const-set op.
    pub fn scalar_const(out: AddressT, value: f64) -> Self {
        Self::new(Op::ScalarConstSet, 0, 0, out).with_activation(value)
    }

    pub fn with_activation(mut self, value: f64) -> Self {
        self.activation_data = value;
        self
    }

    pub fn with_indices(mut self, index_0: FeatureIndexT, index_1: FeatureIndexT) -> Self {
        self.index_data_0 = index_0;
        self.index_data_1 = index_1;
        self
    }

    /// Range for uniform ops, mean and standard deviation for gaussian ones.
    pub fn with_float_data(mut self, first: f64, second: f64) -> Self {
        self.float_data_0 = first;
        self.float_data_1 = second;
        self
    }

    /// Checks operand addresses against their spaces and feature indices
    /// against `feature_size`. Must pass before the instruction executes.
    pub fn validate(&self, layout: &MemoryLayout, feature_size: FeatureIndexT) -> Result<()> {
        let spaces = self.op.operand_spaces();
        if let Some(space) = spaces.in1 {
            layout.check(space, self.in1)?;
        }
        if let Some(space) = spaces.in2 {
            layout.check(space, self.in2)?;
        }
        if let Some(space) = spaces.out {
            layout.check(space, self.out)?;
        }
        let indices = [self.index_data_0, self.index_data_1];
        for &index in &indices[..self.op.feature_indices_read()] {
            if index >= feature_size {
                return Err(AmlzError::FeatureIndexOutOfRange { index, feature_size });
            }
        }
        Ok(())
    }

    pub fn try_from_raw(raw: &RawInstruction) -> Result<Self> {
        Ok(Self {
            op: Op::try_from(raw.op)?,
            in1: safe_cast(raw.in1)?,
            in2: safe_cast(raw.in2)?,
            out: safe_cast(raw.out)?,
            activation_data: raw.activation_data,
            index_data_0: safe_cast(raw.index_data_0)?,
            index_data_1: safe_cast(raw.index_data_1)?,
            float_data_0: raw.float_data_0,
            float_data_1: raw.float_data_1,
        })
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::no_op()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spaces = self.op.operand_spaces();
        write!(f, "{}", self.op)?;
        if let Some(space) = spaces.out {
            write!(f, " {}{}", &space.name()[..1], self.out)?;
        }
        for (space, address) in [(spaces.in1, self.in1), (spaces.in2, self.in2)] {
            if let Some(space) = space {
                write!(f, ", {}{}", &space.name()[..1], address)?;
            }
        }
        Ok(())
    }
}

/// An instruction as plain integers, e.g. produced by a mutation operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInstruction {
    pub op: IntegerT,
    pub in1: IntegerT,
    pub in2: IntegerT,
    pub out: IntegerT,
    pub activation_data: f64,
    pub index_data_0: IntegerT,
    pub index_data_1: IntegerT,
    pub float_data_0: f64,
    pub float_data_1: f64,
}

impl RawInstruction {
    pub fn new(op: IntegerT, in1: IntegerT, in2: IntegerT, out: IntegerT) -> Self {
        Self {
            op,
            in1,
            in2,
            out,
            ..Self::default()
        }
    }
}
