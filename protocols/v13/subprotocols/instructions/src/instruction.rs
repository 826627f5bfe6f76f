use alloc::vec::Vec;

use actions_ofp::{ActionList, ActionSet};
use binary_ofp::{
    read_tlv_header, write_tlv_header, Decoder, Encoder, Error, Member, Validator,
    WireValue, TLV_HEADER_LEN,
};
use const_ofp::*;

use crate::Instructions;

/// Continues processing in table `table_id`, which must come after the current table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GotoTable {
    pub table_id: u8,
    pub pad: [u8; 3],
}

impl GotoTable {
    pub fn new(table_id: u8) -> Self {
        Self {
            table_id,
            pad: [0; 3],
        }
    }
}

impl Member for GotoTable {
    type Category = Instructions;
    const TAG: u16 = INSTRUCTION_TYPE_GOTO_TABLE;
}

impl WireValue for GotoTable {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        8
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, Self::MIN_LENGTH);
        dst.put_u8(self.table_id);
        dst.put_slice(&self.pad);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        read_tlv_header::<Self>(src)?;
        Ok(Self {
            table_id: src.read_u8()?,
            pad: src.read_array()?,
        })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        if self.table_id >= OFPTT_ALL {
            return Err(Error::invalid(
                BAD_INSTRUCTION_BAD_TABLE_ID,
                "goto table to the all-tables wildcard",
            ));
        }
        Ok(())
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.table_id == other.table_id
    }
}

/// Writes the bits of `metadata` selected by `metadata_mask` into the metadata register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteMetadata {
    pub pad: [u8; 4],
    pub metadata: u64,
    pub metadata_mask: u64,
}

impl WriteMetadata {
    pub fn new(metadata: u64, metadata_mask: u64) -> Self {
        Self {
            pad: [0; 4],
            metadata,
            metadata_mask,
        }
    }
}

impl Member for WriteMetadata {
    type Category = Instructions;
    const TAG: u16 = INSTRUCTION_TYPE_WRITE_METADATA;
}

impl WireValue for WriteMetadata {
    const MIN_LENGTH: u16 = 24;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        24
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, Self::MIN_LENGTH);
        dst.put_slice(&self.pad);
        dst.put_u64(self.metadata);
        dst.put_u64(self.metadata_mask);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        read_tlv_header::<Self>(src)?;
        Ok(Self {
            pad: src.read_array()?,
            metadata: src.read_u64()?,
            metadata_mask: src.read_u64()?,
        })
    }

    /// Bits outside the mask are never written.
    fn equivalent(&self, other: &Self) -> bool {
        self.metadata_mask == other.metadata_mask
            && self.metadata & self.metadata_mask == other.metadata & other.metadata_mask
    }
}

macro_rules! actions_instruction {
    ($(#[$doc:meta])* $name:ident = $tag:expr, $actions:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name {
            pub pad: [u8; 4],
            pub actions: $actions,
        }

        impl $name {
            pub fn new(actions: $actions) -> Self {
                Self {
                    pad: [0; 4],
                    actions,
                }
            }
        }

        impl Member for $name {
            type Category = Instructions;
            const TAG: u16 = $tag;
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 = 8;
            const FIXED_LENGTH: bool = false;

            fn wire_length(&self) -> usize {
                self.actions.total_wire_length(8)
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                write_tlv_header(dst, Self::TAG, self.wire_length() as u16);
                dst.put_slice(&self.pad);
                self.actions.encode(dst);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                let len = read_tlv_header::<Self>(src)? as usize;
                let pad = src.read_array()?;
                let actions = <$actions>::decode_bounded(src, len - 8)?;
                Ok(Self { pad, actions })
            }

            fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
                validator.nested(&self.actions)
            }

            fn equivalent(&self, other: &Self) -> bool {
                self.actions.equivalent(&other.actions)
            }
        }
    };
}

actions_instruction!(
    /// Merges `actions` into the action set of the packet.
    WriteActions = INSTRUCTION_TYPE_WRITE_ACTIONS,
    ActionSet
);
actions_instruction!(
    /// Runs `actions` immediately, in order.
    ApplyActions = INSTRUCTION_TYPE_APPLY_ACTIONS,
    ActionList
);

/// Empties the action set of the packet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearActions {
    pub pad: [u8; 4],
}

impl ClearActions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Member for ClearActions {
    type Category = Instructions;
    const TAG: u16 = INSTRUCTION_TYPE_CLEAR_ACTIONS;
}

impl WireValue for ClearActions {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        8
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, Self::MIN_LENGTH);
        dst.put_slice(&self.pad);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        read_tlv_header::<Self>(src)?;
        Ok(Self {
            pad: src.read_array()?,
        })
    }

    fn equivalent(&self, _other: &Self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    pub meter_id: u32,
}

impl Meter {
    pub fn new(meter_id: u32) -> Self {
        Self { meter_id }
    }
}

impl Member for Meter {
    type Category = Instructions;
    const TAG: u16 = INSTRUCTION_TYPE_METER;
}

impl WireValue for Meter {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        8
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, Self::MIN_LENGTH);
        dst.put_u32(self.meter_id);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        read_tlv_header::<Self>(src)?;
        Ok(Self {
            meter_id: src.read_u32()?,
        })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        if self.meter_id == 0 {
            return Err(Error::invalid(BAD_INSTRUCTION_UNSUP_INST, "meter id 0"));
        }
        Ok(())
    }
}

/// Vendor instruction, `data` holds everything after the experimenter id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experimenter {
    pub experimenter: u32,
    pub data: Vec<u8>,
}

impl Experimenter {
    pub fn new(experimenter: u32, data: &[u8]) -> Self {
        Self {
            experimenter,
            data: data.to_vec(),
        }
    }
}

impl Member for Experimenter {
    type Category = Instructions;
    const TAG: u16 = INSTRUCTION_TYPE_EXPERIMENTER;
}

impl WireValue for Experimenter {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        TLV_HEADER_LEN + 4 + self.data.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, self.wire_length() as u16);
        dst.put_u32(self.experimenter);
        dst.put_slice(&self.data);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = read_tlv_header::<Self>(src)? as usize;
        Ok(Self {
            experimenter: src.read_u32()?,
            data: src.read_bytes(len - 8)?.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actions_ofp::{Output, PopVlan, SetQueue};
    use alloc::vec;
    use binary_ofp::{Recursive, Shallow};

    #[test]
    fn test_goto_table() {
        let goto = GotoTable::new(3);
        assert_eq!(goto.to_bytes(), vec![0, 1, 0, 8, 3, 0, 0, 0]);
        assert!(goto.validate(&Shallow).is_ok());
        assert!(GotoTable::new(OFPTT_ALL).validate(&Shallow).is_err());
        assert!(GotoTable::new(OFPTT_MAX).validate(&Shallow).is_ok());
    }

    #[test]
    fn test_write_metadata_compares_masked_bits() {
        let a = WriteMetadata::new(0x12_34, 0xff_00);
        let b = WriteMetadata::new(0x12_00, 0xff_00);
        assert!(a.equivalent(&b));
        assert!(!a.byte_eq(&b));
        assert!(!a.equivalent(&WriteMetadata::new(0x12_34, 0xffff)));
        assert_eq!(a.to_bytes().len(), 24);
        assert_eq!(WriteMetadata::from_bytes(&a.to_bytes()), Ok(a));
    }

    #[test]
    fn test_apply_actions_layout() {
        let mut actions = ActionList::new();
        actions.push(Output::new(1, 0));
        let apply = ApplyActions::new(actions);
        let bytes = apply.to_bytes();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..8], &[0, 4, 0, 24, 0, 0, 0, 0]);
        assert_eq!(ApplyActions::from_bytes(&bytes), Ok(apply));
    }

    #[test]
    fn test_write_actions_is_a_set() {
        let mut a = ActionSet::new();
        a.insert(Output::new(1, 0));
        a.insert(PopVlan::new());
        let mut b = ActionSet::new();
        b.insert(PopVlan::new());
        b.insert(Output::new(1, 0));
        assert!(WriteActions::new(a.clone()).equivalent(&WriteActions::new(b)));

        a.insert(Output::new(2, 0));
        let write = WriteActions::new(a);
        assert!(write.validate(&Shallow).is_ok());
        assert!(matches!(
            write.validate(&Recursive),
            Err(Error::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_actions_are_bounded_by_instruction_length() {
        let mut actions = ActionList::new();
        actions.push(SetQueue::new(1));
        let mut bytes = ApplyActions::new(actions).to_bytes();
        // Declares the header only, the queue action is outside the instruction.
        bytes[3] = 8;
        assert!(matches!(
            ApplyActions::from_bytes(&bytes),
            Err(Error::BadLength { declared: 16, .. })
        ));
        let apply = ApplyActions::from_bytes(&bytes[..8]).unwrap();
        assert!(apply.actions.is_empty());
    }

    #[test]
    fn test_meter_zero_is_refused() {
        assert!(Meter::new(0).validate(&Shallow).is_err());
        assert!(Meter::new(1).validate(&Shallow).is_ok());
        assert_eq!(Meter::new(1).to_bytes(), vec![0, 6, 0, 8, 0, 0, 0, 1]);
    }

    #[test]
    fn test_experimenter() {
        let exp = Experimenter::new(7, &[1, 2, 3, 4]);
        let bytes = exp.to_bytes();
        assert_eq!(&bytes[..4], &[0xff, 0xff, 0, 12]);
        assert_eq!(Experimenter::from_bytes(&bytes), Ok(exp));
        assert!(Experimenter::from_bytes(&[0xff, 0xff, 0, 4]).is_err());
    }

    #[test]
    fn test_instruction_longer_than_length_field() {
        let actions: ActionList = (0..9000)
            .map(|_| actions_ofp::AnyAction::from(PopVlan::new()))
            .collect();
        let apply = crate::AnyInstruction::from(ApplyActions::new(actions));
        assert_eq!(apply.wire_length(), 72_008);
        assert_eq!(
            apply.validate(&Shallow).unwrap_err().code(),
            binary_ofp::ErrorCode::protocol(
                binary_ofp::ErrorType::BadInstruction,
                BAD_INSTRUCTION_BAD_LEN
            )
        );
    }
}
