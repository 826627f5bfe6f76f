//! # Ofp Actions
//!
//! Actions tell a switch what to do with a packet. They travel in two containers:
//!
//! - [`ActionList`]: executed in the order given (apply-actions instruction, packet-out);
//! - [`ActionSet`]: at most one action per type, executed in the protocol's fixed order whatever
//!   order they were written in (write-actions instruction).
//!
//! Every action starts with a `type:u16, len:u16` header and is a multiple of 8 bytes long. The
//! action category has no fallback: an unknown type is refused with `BAD_ACTION`/`BAD_TYPE`.
//!
//! ## Build Options
//! - `prop_test`: implements `quickcheck::Arbitrary` for [`AnyAction`].

#![no_std]

extern crate alloc;

mod fixed;
mod variable;

use binary_ofp::{
    impl_variant, peek_tlv_header, CanonicalOrder, Category, CategoryId, Decoder, Error,
    KeyedSet, OrderedList, SubHeader, Variant, TLV_HEADER_LEN,
};
use const_ofp::*;

pub use fixed::*;
pub use variable::{Experimenter, SetField};

/// The action category.
pub struct Actions;

impl Category for Actions {
    type Tag = u16;
    const ID: CategoryId = CategoryId::Action;
    const HEADER_LEN: usize = TLV_HEADER_LEN;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
        peek_tlv_header(src)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyAction {
    Output(Output),
    CopyTtlOut(CopyTtlOut),
    CopyTtlIn(CopyTtlIn),
    SetMplsTtl(SetMplsTtl),
    DecMplsTtl(DecMplsTtl),
    PushVlan(PushVlan),
    PopVlan(PopVlan),
    PushMpls(PushMpls),
    PopMpls(PopMpls),
    SetQueue(SetQueue),
    Group(Group),
    SetNwTtl(SetNwTtl),
    DecNwTtl(DecNwTtl),
    SetField(SetField),
    PushPbb(PushPbb),
    PopPbb(PopPbb),
    Experimenter(Experimenter),
}

impl_variant!(AnyAction: Actions {
    Output(Output),
    CopyTtlOut(CopyTtlOut),
    CopyTtlIn(CopyTtlIn),
    SetMplsTtl(SetMplsTtl),
    DecMplsTtl(DecMplsTtl),
    PushVlan(PushVlan),
    PopVlan(PopVlan),
    PushMpls(PushMpls),
    PopMpls(PopMpls),
    SetQueue(SetQueue),
    Group(Group),
    SetNwTtl(SetNwTtl),
    DecNwTtl(DecNwTtl),
    SetField(SetField),
    PushPbb(PushPbb),
    PopPbb(PopPbb),
    Experimenter(Experimenter),
});

/// Actions executed in order.
pub type ActionList = OrderedList<AnyAction>;

/// One action per type, and one set-field per field, executed in [`CanonicalOrder`].
pub type ActionSet = KeyedSet<AnyAction>;

impl CanonicalOrder for AnyAction {
    /// Execution order of an action set: copy TTL inwards, pop, push MPLS, push PBB, push VLAN,
    /// copy TTL outwards, decrement TTL, set, set queue, group, output. Experimenter actions run
    /// last. The position in that order fills the upper half of the key.
    fn canonical_key(tag: u16) -> u64 {
        let order = match tag {
            ACTION_TYPE_COPY_TTL_IN => 0,
            ACTION_TYPE_POP_VLAN => 1,
            ACTION_TYPE_POP_MPLS => 2,
            ACTION_TYPE_POP_PBB => 3,
            ACTION_TYPE_PUSH_MPLS => 4,
            ACTION_TYPE_PUSH_PBB => 5,
            ACTION_TYPE_PUSH_VLAN => 6,
            ACTION_TYPE_COPY_TTL_OUT => 7,
            ACTION_TYPE_DEC_MPLS_TTL => 8,
            ACTION_TYPE_DEC_NW_TTL => 9,
            ACTION_TYPE_SET_MPLS_TTL => 10,
            ACTION_TYPE_SET_NW_TTL => 11,
            ACTION_TYPE_SET_FIELD => 12,
            ACTION_TYPE_SET_QUEUE => 13,
            ACTION_TYPE_GROUP => 14,
            ACTION_TYPE_OUTPUT => 15,
            other => 0x1_0000 + other as u64,
        };
        order << 32
    }

    /// A set-field is also keyed by the field it rewrites.
    fn key(&self) -> u64 {
        match self {
            AnyAction::SetField(action) => {
                Self::canonical_key(ACTION_TYPE_SET_FIELD) | action.field.key()
            }
            other => Self::canonical_key(other.tag()),
        }
    }
}

#[cfg(any(test, feature = "prop_test"))]
mod prop {
    use super::*;
    use alloc::vec::Vec;
    use quickcheck::{Arbitrary, Gen};

    impl Arbitrary for AnyAction {
        fn arbitrary(g: &mut Gen) -> Self {
            match u8::arbitrary(g) % 12 {
                0 => Output::new(u32::arbitrary(g) % OFPP_MAX + 1, u16::arbitrary(g)).into(),
                1 => CopyTtlOut::new().into(),
                2 => CopyTtlIn::new().into(),
                3 => SetMplsTtl::new(u8::arbitrary(g)).into(),
                4 => PushVlan::new(ETH_TYPE_VLAN).into(),
                5 => PopVlan::new().into(),
                6 => PopMpls::new(u16::arbitrary(g)).into(),
                7 => SetQueue::new(u32::arbitrary(g)).into(),
                8 => Group::new(u32::arbitrary(g) % (OFPG_MAX + 1)).into(),
                9 => DecNwTtl::new().into(),
                10 => SetField::new(oxm_ofp::EthType::new(u16::arbitrary(g))).into(),
                _ => {
                    let data: Vec<u8> = Vec::<u8>::arbitrary(g).into_iter().take(20).collect();
                    Experimenter::new(u32::arbitrary(g), &data).into()
                }
            }
        }
    }
}
