use amlz::instructions::{Algorithm, Instruction, Op};
use amlz::memory::{
    AddressSpace, Matrix, MemoryLayout, Vector, FEATURES_VECTOR_ADDRESS, LABELS_SCALAR_ADDRESS,
    PREDICTIONS_SCALAR_ADDRESS,
};
use amlz::types::AddressT;
use amlz::{AmlzError, Executor};
use proptest::prelude::*;

fn small_layout() -> MemoryLayout {
    MemoryLayout::new(8, 6, 4).unwrap()
}

proptest! {
    #[test]
    fn every_address_below_capacity_is_accepted(address in 0..8u16) {
        prop_assert!(small_layout().check(AddressSpace::Scalar, address).is_ok());
    }

    #[test]
    fn every_address_at_or_above_capacity_is_rejected(address in 4..=AddressT::MAX) {
        let rejected = matches!(
            small_layout().check(AddressSpace::Matrix, address),
            Err(AmlzError::AddressOutOfRange { capacity: 4, .. })
        );
        prop_assert!(rejected);
    }
}

#[test]
fn test_capacity_boundary_per_space() {
    let layout = small_layout();
    for space in AddressSpace::ALL {
        let capacity = space.capacity(&layout);
        assert!(layout.check(space, capacity - 1).is_ok());
        assert!(layout.check(space, capacity).is_err());
    }
}

#[test]
fn test_layout_must_hold_reserved_addresses() {
    assert!(MemoryLayout::new(1, 20, 20).is_err());
    assert!(MemoryLayout::new(20, 2, 20).is_err());
    assert!(MemoryLayout::new(20, 20, 0).is_err());
    assert!(MemoryLayout::new(2, 3, 1).is_ok());
}

#[test]
fn test_reserved_addresses() {
    assert_eq!(LABELS_SCALAR_ADDRESS, 0);
    assert_eq!(PREDICTIONS_SCALAR_ADDRESS, 1);
    assert_eq!(FEATURES_VECTOR_ADDRESS, 0);
    assert_eq!(AddressSpace::Scalar.first_out(), 1);
}

#[test]
fn test_out_of_range_operand_rejected_before_execution() {
    let layout = small_layout();
    let algorithm = Algorithm::new(vec![], vec![Instruction::new(Op::VectorSum, 0, 6, 3)], vec![]);
    let err = Executor::<4>::new(&algorithm, &layout, 0).err().unwrap();
    assert!(matches!(
        err,
        AmlzError::AddressOutOfRange {
            space: AddressSpace::Vector,
            address: 6,
            capacity: 6
        }
    ));
    assert_eq!(err.to_string(), "vector address 6 out of range (capacity 6)");
}

#[test]
fn test_feature_index_checked_for_const_set() {
    let layout = small_layout();
    let instruction = Instruction::new(Op::VectorConstSet, 0, 0, 3).with_indices(4, 0);
    assert!(matches!(
        instruction.validate(&layout, 4),
        Err(AmlzError::FeatureIndexOutOfRange { index: 4, feature_size: 4 })
    ));
    assert!(instruction.validate(&layout, 5).is_ok());
}

#[test]
fn test_rendering() {
    assert_eq!(Vector([1.0, 2.5, -3.0]).to_string(), "[1, 2.5, -3]");
    assert_eq!(Matrix([[1.0, 2.0], [3.0, 4.0]]).to_string(), "[[1, 2], [3, 4]]");
    assert_eq!(
        Instruction::new(Op::VectorInnerProduct, 0, 3, 1).to_string(),
        "VectorInnerProduct s1, v0, v3"
    );
    assert_eq!(Instruction::no_op().to_string(), "NoOp");
}
