pub mod address;
pub mod bank;
pub mod tensor;

pub use address::{
    AddressSpace, MemoryLayout, FEATURES_VECTOR_ADDRESS, FIRST_OUT_MATRIX_ADDRESS,
    FIRST_OUT_SCALAR_ADDRESS, FIRST_OUT_VECTOR_ADDRESS, LABELS_SCALAR_ADDRESS,
    LABELS_VECTOR_ADDRESS, MAX_MATRIX_ADDRESSES, MAX_SCALAR_ADDRESSES, MAX_VECTOR_ADDRESSES,
    PREDICTIONS_SCALAR_ADDRESS, PREDICTIONS_VECTOR_ADDRESS,
};
pub use bank::Memory;
pub use tensor::{Matrix, Vector};
