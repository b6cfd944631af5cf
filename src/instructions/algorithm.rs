use super::instruction::{Instruction, RawInstruction};
use crate::error::Result;
use crate::memory::MemoryLayout;
use crate::types::{FeatureIndexT, InstructionIndexT};
use crate::utils::ensure_size_below;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentFunction {
    Setup,
    Predict,
    Learn,
}

impl ComponentFunction {
    pub const ALL: [ComponentFunction; 3] = [
        ComponentFunction::Setup,
        ComponentFunction::Predict,
        ComponentFunction::Learn,
    ];

    fn size_label(self) -> &'static str {
        match self {
            ComponentFunction::Setup => "setup component function",
            ComponentFunction::Predict => "predict component function",
            ComponentFunction::Learn => "learn component function",
        }
    }
}

/// A candidate: the setup, predict and learn component functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Algorithm {
    pub setup: Vec<Instruction>,
    pub predict: Vec<Instruction>,
    pub learn: Vec<Instruction>,
}

impl Algorithm {
    pub fn new(setup: Vec<Instruction>, predict: Vec<Instruction>, learn: Vec<Instruction>) -> Self {
        Self { setup, predict, learn }
    }

    pub fn component(&self, component: ComponentFunction) -> &[Instruction] {
        match component {
            ComponentFunction::Setup => &self.setup,
            ComponentFunction::Predict => &self.predict,
            ComponentFunction::Learn => &self.learn,
        }
    }

    pub fn instruction_count(&self) -> usize {
        self.setup.len() + self.predict.len() + self.learn.len()
    }

    /// Pre-execution check of the whole candidate.
    ///
    /// Each component must hold fewer than `max_instructions` instructions
    /// (and never more than `InstructionIndexT` can index); every operand
    /// address must lie inside its space.
    pub fn validate(
        &self,
        layout: &MemoryLayout,
        feature_size: FeatureIndexT,
        max_instructions: usize,
    ) -> Result<()> {
        let limit = max_instructions.min(usize::from(InstructionIndexT::MAX) + 1);
        for component in ComponentFunction::ALL {
            let instructions = self.component(component);
            ensure_size_below(instructions, limit, component.size_label())?;
            for instruction in instructions {
                instruction.validate(layout, feature_size)?;
            }
        }
        Ok(())
    }

    /// Materializes a candidate from plain integers.
    pub fn from_raw(setup: &[RawInstruction], predict: &[RawInstruction], learn: &[RawInstruction]) -> Result<Self> {
        let convert = |raw: &[RawInstruction]| -> Result<Vec<Instruction>> {
            raw.iter().map(Instruction::try_from_raw).collect()
        };
        Ok(Self {
            setup: convert(setup)?,
            predict: convert(predict)?,
            learn: convert(learn)?,
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in ComponentFunction::ALL {
            writeln!(f, "def {:?}():", component)?;
            for instruction in self.component(component) {
                writeln!(f, "  {}", instruction)?;
            }
        }
        Ok(())
    }
}
