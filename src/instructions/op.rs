//! Operation codes and their operand address spaces.
//!
//! `Op` values only come from `Op::try_from(IntegerT)`; there is no
//! unchecked path from an integer to an operation.

use crate::error::{AmlzError, Result};
use crate::memory::AddressSpace;
use crate::types::IntegerT;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::memory::AddressSpace::{Matrix as M, Scalar as S, Vector as V};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i64)]
pub enum Op {
    NoOp = 0,
    ScalarSum = 1,
    ScalarDiff = 2,
    ScalarProduct = 3,
    ScalarDivision = 4,
    ScalarAbs = 5,
    ScalarReciprocal = 6,
    ScalarSin = 7,
    ScalarCos = 8,
    ScalarTan = 9,
    ScalarArcsin = 10,
    ScalarArccos = 11,
    ScalarArctan = 12,
    ScalarExp = 13,
    ScalarLog = 14,
    ScalarHeaviside = 15,
    VectorHeaviside = 16,
    MatrixHeaviside = 17,
    ScalarVectorProduct = 18,
    ScalarBroadcast = 19,
    VectorReciprocal = 20,
    VectorNorm = 21,
    VectorAbs = 22,
    VectorSum = 23,
    VectorDiff = 24,
    VectorProduct = 25,
    VectorDivision = 26,
    VectorInnerProduct = 27,
    VectorOuterProduct = 28,
    ScalarMatrixProduct = 29,
    MatrixReciprocal = 30,
    MatrixVectorProduct = 31,
    VectorColumnBroadcast = 32,
    VectorRowBroadcast = 33,
    MatrixNorm = 34,
    MatrixColumnNorm = 35,
    MatrixRowNorm = 36,
    MatrixTranspose = 37,
    MatrixAbs = 38,
    MatrixSum = 39,
    MatrixDiff = 40,
    MatrixProduct = 41,
    MatrixDivision = 42,
    MatrixMatrixProduct = 43,
    ScalarMin = 44,
    VectorMin = 45,
    MatrixMin = 46,
    ScalarMax = 47,
    VectorMax = 48,
    MatrixMax = 49,
    VectorMean = 50,
    MatrixMean = 51,
    MatrixRowMean = 52,
    MatrixRowStDev = 53,
    VectorStDev = 54,
    MatrixStDev = 55,
    ScalarConstSet = 56,
    VectorConstSet = 57,
    MatrixConstSet = 58,
    ScalarUniformSet = 59,
    VectorUniformSet = 60,
    MatrixUniformSet = 61,
    ScalarGaussianSet = 62,
    VectorGaussianSet = 63,
    MatrixGaussianSet = 64,
}

/// Which space each operand of an op lives in. `None` means unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandSpaces {
    pub in1: Option<AddressSpace>,
    pub in2: Option<AddressSpace>,
    pub out: Option<AddressSpace>,
}

const fn binary(in1: AddressSpace, in2: AddressSpace, out: AddressSpace) -> OperandSpaces {
    OperandSpaces {
        in1: Some(in1),
        in2: Some(in2),
        out: Some(out),
    }
}

const fn unary(in1: AddressSpace, out: AddressSpace) -> OperandSpaces {
    OperandSpaces {
        in1: Some(in1),
        in2: None,
        out: Some(out),
    }
}

const fn nullary(out: AddressSpace) -> OperandSpaces {
    OperandSpaces {
        in1: None,
        in2: None,
        out: Some(out),
    }
}

impl Op {
    /// Every op, indexed by its code.
    pub const ALL: [Op; 65] = [
        Op::NoOp,
        Op::ScalarSum,
        Op::ScalarDiff,
        Op::ScalarProduct,
        Op::ScalarDivision,
        Op::ScalarAbs,
        Op::ScalarReciprocal,
        Op::ScalarSin,
        Op::ScalarCos,
        Op::ScalarTan,
        Op::ScalarArcsin,
        Op::ScalarArccos,
        Op::ScalarArctan,
        Op::ScalarExp,
        Op::ScalarLog,
        Op::ScalarHeaviside,
        Op::VectorHeaviside,
        Op::MatrixHeaviside,
        Op::ScalarVectorProduct,
        Op::ScalarBroadcast,
        Op::VectorReciprocal,
        Op::VectorNorm,
        Op::VectorAbs,
        Op::VectorSum,
        Op::VectorDiff,
        Op::VectorProduct,
        Op::VectorDivision,
        Op::VectorInnerProduct,
        Op::VectorOuterProduct,
        Op::ScalarMatrixProduct,
        Op::MatrixReciprocal,
        Op::MatrixVectorProduct,
        Op::VectorColumnBroadcast,
        Op::VectorRowBroadcast,
        Op::MatrixNorm,
        Op::MatrixColumnNorm,
        Op::MatrixRowNorm,
        Op::MatrixTranspose,
        Op::MatrixAbs,
        Op::MatrixSum,
        Op::MatrixDiff,
        Op::MatrixProduct,
        Op::MatrixDivision,
        Op::MatrixMatrixProduct,
        Op::ScalarMin,
        Op::VectorMin,
        Op::MatrixMin,
        Op::ScalarMax,
        Op::VectorMax,
        Op::MatrixMax,
        Op::VectorMean,
        Op::MatrixMean,
        Op::MatrixRowMean,
        Op::MatrixRowStDev,
        Op::VectorStDev,
        Op::MatrixStDev,
        Op::ScalarConstSet,
        Op::VectorConstSet,
        Op::MatrixConstSet,
        Op::ScalarUniformSet,
        Op::VectorUniformSet,
        Op::MatrixUniformSet,
        Op::ScalarGaussianSet,
        Op::VectorGaussianSet,
        Op::MatrixGaussianSet,
    ];

    pub fn code(self) -> IntegerT {
        self as IntegerT
    }

    pub fn operand_spaces(self) -> OperandSpaces {
        match self {
            Op::NoOp => OperandSpaces {
                in1: None,
                in2: None,
                out: None,
            },
            Op::ScalarSum
            | Op::ScalarDiff
            | Op::ScalarProduct
            | Op::ScalarDivision
            | Op::ScalarMin
            | Op::ScalarMax => binary(S, S, S),
            Op::ScalarAbs
            | Op::ScalarReciprocal
            | Op::ScalarSin
            | Op::ScalarCos
            | Op::ScalarTan
            | Op::ScalarArcsin
            | Op::ScalarArccos
            | Op::ScalarArctan
            | Op::ScalarExp
            | Op::ScalarLog
            | Op::ScalarHeaviside => unary(S, S),
            Op::VectorHeaviside | Op::VectorReciprocal | Op::VectorAbs => unary(V, V),
            Op::MatrixHeaviside | Op::MatrixReciprocal | Op::MatrixTranspose | Op::MatrixAbs => unary(M, M),
            Op::ScalarVectorProduct => binary(S, V, V),
            Op::ScalarBroadcast => unary(S, V),
            Op::VectorNorm | Op::VectorMean | Op::VectorStDev => unary(V, S),
            Op::VectorSum
            | Op::VectorDiff
            | Op::VectorProduct
            | Op::VectorDivision
            | Op::VectorMin
            | Op::VectorMax => binary(V, V, V),
            Op::VectorInnerProduct => binary(V, V, S),
            Op::VectorOuterProduct => binary(V, V, M),
            Op::ScalarMatrixProduct => binary(S, M, M),
            Op::MatrixVectorProduct => binary(M, V, V),
            Op::VectorColumnBroadcast | Op::VectorRowBroadcast => unary(V, M),
            Op::MatrixNorm | Op::MatrixMean | Op::MatrixStDev => unary(M, S),
            Op::MatrixColumnNorm | Op::MatrixRowNorm | Op::MatrixRowMean | Op::MatrixRowStDev => unary(M, V),
            Op::MatrixSum
            | Op::MatrixDiff
            | Op::MatrixProduct
            | Op::MatrixDivision
            | Op::MatrixMatrixProduct
            | Op::MatrixMin
            | Op::MatrixMax => binary(M, M, M),
            Op::ScalarConstSet | Op::ScalarUniformSet | Op::ScalarGaussianSet => nullary(S),
            Op::VectorConstSet | Op::VectorUniformSet | Op::VectorGaussianSet => nullary(V),
            Op::MatrixConstSet | Op::MatrixUniformSet | Op::MatrixGaussianSet => nullary(M),
        }
    }

    /// How many of `index_data_0`, `index_data_1` the op reads, in order.
    pub fn feature_indices_read(self) -> usize {
        match self {
            Op::VectorConstSet => 1,
            Op::MatrixConstSet => 2,
            _ => 0,
        }
    }
}

impl TryFrom<IntegerT> for Op {
    type Error = AmlzError;

    fn try_from(raw: IntegerT) -> Result<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|index| Op::ALL.get(index))
            .copied()
            .ok_or(AmlzError::InvalidOpcode(raw))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Validates a list of raw op codes.
pub fn convert_to_ops(values: &[IntegerT]) -> Result<Vec<Op>> {
    values.iter().map(|&value| Op::try_from(value)).collect()
}
