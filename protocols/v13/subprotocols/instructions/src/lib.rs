//! # Ofp Instructions
//!
//! Instructions are attached to flow entries and run when a packet matches. A flow entry holds an
//! [`InstructionSet`]: at most one instruction of each type, executed in a fixed order (meter,
//! apply-actions, clear-actions, write-actions, write-metadata, goto-table).
//!
//! Instructions carrying actions keep them as an [`actions_ofp::ActionList`] (apply) or an
//! [`actions_ofp::ActionSet`] (write). The nested actions are checked only by a recursive
//! validator.
//!
//! ## Build Options
//! - `prop_test`: implements `quickcheck::Arbitrary` for [`AnyInstruction`].

#![no_std]

extern crate alloc;

mod instruction;

use binary_ofp::{
    impl_variant, peek_tlv_header, CanonicalOrder, Category, CategoryId, Decoder, Error,
    KeyedSet, SubHeader, TLV_HEADER_LEN,
};
use const_ofp::*;

pub use instruction::*;

pub struct Instructions;

impl Category for Instructions {
    type Tag = u16;
    const ID: CategoryId = CategoryId::Instruction;
    const HEADER_LEN: usize = TLV_HEADER_LEN;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
        peek_tlv_header(src)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyInstruction {
    GotoTable(GotoTable),
    WriteMetadata(WriteMetadata),
    WriteActions(WriteActions),
    ApplyActions(ApplyActions),
    ClearActions(ClearActions),
    Meter(Meter),
    Experimenter(Experimenter),
}

impl_variant!(AnyInstruction: Instructions {
    GotoTable(GotoTable),
    WriteMetadata(WriteMetadata),
    WriteActions(WriteActions),
    ApplyActions(ApplyActions),
    ClearActions(ClearActions),
    Meter(Meter),
    Experimenter(Experimenter),
});

pub type InstructionSet = KeyedSet<AnyInstruction>;

impl CanonicalOrder for AnyInstruction {
    fn canonical_key(tag: u16) -> u64 {
        match tag {
            INSTRUCTION_TYPE_METER => 0,
            INSTRUCTION_TYPE_APPLY_ACTIONS => 1,
            INSTRUCTION_TYPE_CLEAR_ACTIONS => 2,
            INSTRUCTION_TYPE_WRITE_ACTIONS => 3,
            INSTRUCTION_TYPE_WRITE_METADATA => 4,
            INSTRUCTION_TYPE_GOTO_TABLE => 5,
            other => 0x1_0000 + other as u64,
        }
    }
}

#[cfg(any(test, feature = "prop_test"))]
mod prop {
    use super::*;
    use actions_ofp::{ActionList, ActionSet, AnyAction};
    use alloc::vec::Vec;
    use quickcheck::{Arbitrary, Gen};

    fn actions(g: &mut Gen) -> Vec<AnyAction> {
        Vec::<AnyAction>::arbitrary(g).into_iter().take(4).collect()
    }

    impl Arbitrary for AnyInstruction {
        fn arbitrary(g: &mut Gen) -> Self {
            match u8::arbitrary(g) % 6 {
                0 => GotoTable::new(u8::arbitrary(g) % OFPTT_ALL).into(),
                1 => WriteMetadata::new(u64::arbitrary(g), u64::arbitrary(g)).into(),
                2 => {
                    // One action per type.
                    let mut set = ActionSet::new();
                    for action in actions(g) {
                        set.replace(action);
                    }
                    WriteActions::new(set).into()
                }
                3 => ApplyActions::new(ActionList::from(actions(g))).into(),
                4 => ClearActions::new().into(),
                _ => Meter::new(u32::arbitrary(g).max(1)).into(),
            }
        }
    }
}
