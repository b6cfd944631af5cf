pub mod algorithm;
pub mod instruction;
pub mod op;

pub use algorithm::{Algorithm, ComponentFunction};
pub use instruction::{Instruction, RawInstruction};
pub use op::{convert_to_ops, Op, OperandSpaces};
