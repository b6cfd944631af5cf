//! The three typed address spaces and their reserved slots.
//!
//! ```text
//! Scalar  0: label          1: prediction (first out)   2..: scratch
//! Vector  0: features       1: label (first out)        2: prediction   3..: scratch
//! Matrix  0..: scratch, output convention starts at 0
//! ```

use crate::error::{AmlzError, Result};
use crate::types::AddressT;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const LABELS_SCALAR_ADDRESS: AddressT = 0;
pub const PREDICTIONS_SCALAR_ADDRESS: AddressT = 1;
pub const FIRST_OUT_SCALAR_ADDRESS: AddressT = 1;
pub const MAX_SCALAR_ADDRESSES: AddressT = 20;

pub const FEATURES_VECTOR_ADDRESS: AddressT = 0;
pub const FIRST_OUT_VECTOR_ADDRESS: AddressT = 1;
pub const LABELS_VECTOR_ADDRESS: AddressT = 1;
pub const PREDICTIONS_VECTOR_ADDRESS: AddressT = 2;
pub const MAX_VECTOR_ADDRESSES: AddressT = 20;

pub const FIRST_OUT_MATRIX_ADDRESS: AddressT = 0;
pub const MAX_MATRIX_ADDRESSES: AddressT = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressSpace {
    Scalar,
    Vector,
    Matrix,
}

impl AddressSpace {
    pub const ALL: [AddressSpace; 3] = [AddressSpace::Scalar, AddressSpace::Vector, AddressSpace::Matrix];

    pub fn capacity(self, layout: &MemoryLayout) -> AddressT {
        match self {
            AddressSpace::Scalar => layout.scalar_addresses,
            AddressSpace::Vector => layout.vector_addresses,
            AddressSpace::Matrix => layout.matrix_addresses,
        }
    }

    /// Lowest address an instruction output may conventionally target.
    pub fn first_out(self) -> AddressT {
        match self {
            AddressSpace::Scalar => FIRST_OUT_SCALAR_ADDRESS,
            AddressSpace::Vector => FIRST_OUT_VECTOR_ADDRESS,
            AddressSpace::Matrix => FIRST_OUT_MATRIX_ADDRESS,
        }
    }

    /// Named reserved addresses, in ascending order.
    pub fn reserved(self) -> &'static [(&'static str, AddressT)] {
        match self {
            AddressSpace::Scalar => &[
                ("label", LABELS_SCALAR_ADDRESS),
                ("prediction", PREDICTIONS_SCALAR_ADDRESS),
            ],
            AddressSpace::Vector => &[
                ("features", FEATURES_VECTOR_ADDRESS),
                ("label", LABELS_VECTOR_ADDRESS),
                ("prediction", PREDICTIONS_VECTOR_ADDRESS),
            ],
            AddressSpace::Matrix => &[],
        }
    }

    /// Smallest capacity that still holds every reserved address and one output slot.
    pub fn min_capacity(self) -> AddressT {
        let reserved_end = self
            .reserved()
            .iter()
            .map(|(_, address)| address + 1)
            .max()
            .unwrap_or(0);
        reserved_end.max(self.first_out() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            AddressSpace::Scalar => "scalar",
            AddressSpace::Vector => "vector",
            AddressSpace::Matrix => "matrix",
        }
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Capacities of the three spaces. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryLayout {
    pub scalar_addresses: AddressT,
    pub vector_addresses: AddressT,
    pub matrix_addresses: AddressT,
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self {
            scalar_addresses: MAX_SCALAR_ADDRESSES,
            vector_addresses: MAX_VECTOR_ADDRESSES,
            matrix_addresses: MAX_MATRIX_ADDRESSES,
        }
    }
}

impl MemoryLayout {
    pub fn new(scalar_addresses: AddressT, vector_addresses: AddressT, matrix_addresses: AddressT) -> Result<Self> {
        let layout = Self {
            scalar_addresses,
            vector_addresses,
            matrix_addresses,
        };
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<()> {
        for space in AddressSpace::ALL {
            let capacity = space.capacity(self);
            if capacity < space.min_capacity() {
                return Err(AmlzError::Configuration(format!(
                    "{} capacity {} cannot hold its reserved addresses (need {})",
                    space,
                    capacity,
                    space.min_capacity()
                )));
            }
        }
        Ok(())
    }

    /// Rejects `address >= capacity` for the given space.
    pub fn check(&self, space: AddressSpace, address: AddressT) -> Result<()> {
        let capacity = space.capacity(self);
        if address < capacity {
            Ok(())
        } else {
            Err(AmlzError::AddressOutOfRange {
                space,
                address,
                capacity,
            })
        }
    }
}
