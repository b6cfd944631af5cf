use amlz::instructions::{convert_to_ops, Algorithm, Instruction, Op, RawInstruction};
use amlz::memory::MemoryLayout;
use amlz::types::IntegerT;
use amlz::AmlzError;
use proptest::prelude::*;

const OP_COUNT: IntegerT = 65;

proptest! {
    #[test]
    fn known_codes_convert(code in 0..OP_COUNT) {
        let op = Op::try_from(code).unwrap();
        prop_assert_eq!(op.code(), code);
    }

    #[test]
    fn unknown_codes_rejected(code in prop_oneof![IntegerT::MIN..0, OP_COUNT..=IntegerT::MAX]) {
        let rejected = matches!(Op::try_from(code), Err(AmlzError::InvalidOpcode(c)) if c == code);
        prop_assert!(rejected);
    }
}

#[test]
fn test_table_endpoints() {
    assert_eq!(Op::try_from(0).unwrap(), Op::NoOp);
    assert_eq!(Op::try_from(64).unwrap(), Op::MatrixGaussianSet);
    assert_eq!(Op::ALL.len(), OP_COUNT as usize);
}

#[test]
fn test_convert_to_ops_stops_at_first_bad_code() {
    assert_eq!(
        convert_to_ops(&[0, 1, 56]).unwrap(),
        vec![Op::NoOp, Op::ScalarSum, Op::ScalarConstSet]
    );
    assert!(matches!(
        convert_to_ops(&[1, 65, -1]),
        Err(AmlzError::InvalidOpcode(65))
    ));
}

#[test]
fn test_raw_program_with_bad_opcode_is_discarded() {
    let good = RawInstruction::new(1, 2, 3, 4);
    let bad = RawInstruction::new(99, 0, 0, 0);
    let err = Algorithm::from_raw(&[good], &[bad], &[]).unwrap_err();
    assert!(matches!(err, AmlzError::InvalidOpcode(99)));
    assert!(err.discards_candidate());
}

#[test]
fn test_raw_address_overflow_is_discarded() {
    let raw = RawInstruction::new(Op::ScalarSum.code(), 70_000, 0, 2);
    let err = Instruction::try_from_raw(&raw).unwrap_err();
    assert!(matches!(err, AmlzError::Overflow { .. }));
}

#[test]
fn test_raw_program_round_trips_through_validation() {
    let raw = [
        RawInstruction::new(Op::VectorInnerProduct.code(), 0, 3, 1),
        RawInstruction::new(Op::ScalarSum.code(), 1, 2, 1),
    ];
    let algorithm = Algorithm::from_raw(&[], &raw, &[]).unwrap();
    algorithm.validate(&MemoryLayout::default(), 4, 100).unwrap();
    assert_eq!(algorithm.predict[0].op, Op::VectorInnerProduct);
}
