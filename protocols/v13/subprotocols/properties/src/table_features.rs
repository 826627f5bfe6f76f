//! Table features and their properties.
//!
//! A property starts with `type:u16, len:u16`. The declared length excludes the padding that
//! brings the property to a multiple of 8 bytes. Most properties are plain lists of ids:
//! instruction and action ids are 4 byte `type, len` headers, next-table ids are single bytes
//! and match/set-field ids are 32 bit OXM headers.

use alloc::vec::Vec;

use binary_ofp::{
    check_length_field, impl_variant, peek_tlv_header, read_tlv_header, write_tlv_header, CanonicalOrder, Category,
    CategoryId, Decoder, Encoder, Error, KeyedSet, LengthRule, Member, Padding, SubHeader,
    Validator, WireValue, TLV_HEADER_LEN,
};
use const_ofp::*;

pub struct TableFeatureProperties;

impl Category for TableFeatureProperties {
    type Tag = u16;
    const ID: CategoryId = CategoryId::TableFeatureProperty;
    const HEADER_LEN: usize = TABLE_FEATURE_PROPERTY_HEADER_SIZE;
    const ALIGNMENT: usize = OFP_ALIGNMENT;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
        peek_tlv_header(src)
    }
}

/// Header of an instruction or action, naming a supported type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ElementId {
    pub kind: u16,
    pub len: u16,
}

impl ElementId {
    pub fn new(kind: u16) -> Self {
        Self { kind, len: 4 }
    }
}

impl WireValue for ElementId {
    const MIN_LENGTH: u16 = 4;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        4
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u16(self.kind);
        dst.put_u16(self.len);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let kind = src.read_u16()?;
        let len = src.read_u16()?;
        if len != 4 {
            return Err(Error::bad_length(len as usize, LengthRule::Exact(4)));
        }
        Ok(Self { kind, len })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        if self.len != 4 {
            return Err(Error::bad_length(self.len as usize, LengthRule::Exact(4)));
        }
        Ok(())
    }
}

macro_rules! id_property {
    ($(#[$doc:meta])* $name:ident = $tag:expr, $id:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub ids: Vec<$id>,
            pub pad: Padding,
        }

        impl $name {
            pub fn new(ids: Vec<$id>) -> Self {
                let len = TLV_HEADER_LEN + ids.len() * <$id>::MIN_LENGTH as usize;
                Self {
                    ids,
                    pad: Padding::to_align(len, OFP_ALIGNMENT),
                }
            }
        }

        impl Member for $name {
            type Category = TableFeatureProperties;
            const TAG: u16 = $tag;

            fn declared_length(&self) -> usize {
                TLV_HEADER_LEN + self.ids.len() * <$id>::MIN_LENGTH as usize
            }
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 = TLV_HEADER_LEN as u16;
            const FIXED_LENGTH: bool = false;

            fn wire_length(&self) -> usize {
                self.declared_length() + self.pad.len()
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                write_tlv_header(dst, Self::TAG, Member::length(self));
                for id in &self.ids {
                    id.encode(dst);
                }
                self.pad.encode(dst);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                let len = read_tlv_header::<Self>(src)? as usize;
                let size = <$id>::MIN_LENGTH as usize;
                let body = len - TLV_HEADER_LEN;
                if body % size != 0 {
                    return Err(Error::bad_length(len, LengthRule::MultipleOf(size as u16)));
                }
                let mut ids = Vec::with_capacity(body / size);
                for _ in 0..body / size {
                    ids.push(<$id>::decode(src)?);
                }
                let pad = Padding::decode_to_align(src, len, OFP_ALIGNMENT)?;
                Ok(Self { ids, pad })
            }

            fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
                self.pad.check_aligns(self.declared_length(), OFP_ALIGNMENT)?;
                self.ids.iter().try_for_each(|id| validator.nested(id))
            }

            /// Same ids in any order.
            fn equivalent(&self, other: &Self) -> bool {
                let mut a = self.ids.clone();
                let mut b = other.ids.clone();
                a.sort_unstable();
                b.sort_unstable();
                a == b
            }
        }
    };
}

id_property!(
    /// Instructions supported by the table.
    Instructions = TABLE_FEATURE_PROPERTY_INSTRUCTIONS, ElementId
);
id_property!(InstructionsMiss = TABLE_FEATURE_PROPERTY_INSTRUCTIONS_MISS, ElementId);
id_property!(
    /// Tables reachable from this one with a goto-table instruction.
    NextTables = TABLE_FEATURE_PROPERTY_NEXT_TABLES, u8
);
id_property!(NextTablesMiss = TABLE_FEATURE_PROPERTY_NEXT_TABLES_MISS, u8);
id_property!(WriteActions = TABLE_FEATURE_PROPERTY_WRITE_ACTIONS, ElementId);
id_property!(WriteActionsMiss = TABLE_FEATURE_PROPERTY_WRITE_ACTIONS_MISS, ElementId);
id_property!(ApplyActions = TABLE_FEATURE_PROPERTY_APPLY_ACTIONS, ElementId);
id_property!(ApplyActionsMiss = TABLE_FEATURE_PROPERTY_APPLY_ACTIONS_MISS, ElementId);
id_property!(
    /// Fields the table can match on, as OXM headers.
    MatchProp = TABLE_FEATURE_PROPERTY_MATCH, u32
);
id_property!(
    /// Fields the table may leave wildcarded.
    Wildcards = TABLE_FEATURE_PROPERTY_WILDCARDS, u32
);
id_property!(WriteSetfield = TABLE_FEATURE_PROPERTY_WRITE_SETFIELD, u32);
id_property!(WriteSetfieldMiss = TABLE_FEATURE_PROPERTY_WRITE_SETFIELD_MISS, u32);
id_property!(ApplySetfield = TABLE_FEATURE_PROPERTY_APPLY_SETFIELD, u32);
id_property!(ApplySetfieldMiss = TABLE_FEATURE_PROPERTY_APPLY_SETFIELD_MISS, u32);

macro_rules! experimenter_property {
    ($name:ident = $tag:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub experimenter: u32,
            pub exp_type: u32,
            pub data: Vec<u8>,
            pub pad: Padding,
        }

        impl $name {
            pub fn new(experimenter: u32, exp_type: u32, data: &[u8]) -> Self {
                Self {
                    experimenter,
                    exp_type,
                    data: data.to_vec(),
                    pad: Padding::to_align(12 + data.len(), OFP_ALIGNMENT),
                }
            }
        }

        impl Member for $name {
            type Category = TableFeatureProperties;
            const TAG: u16 = $tag;

            fn declared_length(&self) -> usize {
                12 + self.data.len()
            }
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 = 12;
            const FIXED_LENGTH: bool = false;

            fn wire_length(&self) -> usize {
                12 + self.data.len() + self.pad.len()
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                write_tlv_header(dst, Self::TAG, Member::length(self));
                dst.put_u32(self.experimenter);
                dst.put_u32(self.exp_type);
                dst.put_slice(&self.data);
                self.pad.encode(dst);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                let len = read_tlv_header::<Self>(src)? as usize;
                Ok(Self {
                    experimenter: src.read_u32()?,
                    exp_type: src.read_u32()?,
                    data: src.read_bytes(len - 12)?.to_vec(),
                    pad: Padding::decode_to_align(src, len, OFP_ALIGNMENT)?,
                })
            }

            fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
                self.pad.check_aligns(self.declared_length(), OFP_ALIGNMENT)
            }

            fn equivalent(&self, other: &Self) -> bool {
                self.experimenter == other.experimenter
                    && self.exp_type == other.exp_type
                    && self.data == other.data
            }
        }
    };
}

experimenter_property!(Experimenter = TABLE_FEATURE_PROPERTY_EXPERIMENTER);
experimenter_property!(ExperimenterMiss = TABLE_FEATURE_PROPERTY_EXPERIMENTER_MISS);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyTableFeatureProperty {
    Instructions(Instructions),
    InstructionsMiss(InstructionsMiss),
    NextTables(NextTables),
    NextTablesMiss(NextTablesMiss),
    WriteActions(WriteActions),
    WriteActionsMiss(WriteActionsMiss),
    ApplyActions(ApplyActions),
    ApplyActionsMiss(ApplyActionsMiss),
    MatchProp(MatchProp),
    Wildcards(Wildcards),
    WriteSetfield(WriteSetfield),
    WriteSetfieldMiss(WriteSetfieldMiss),
    ApplySetfield(ApplySetfield),
    ApplySetfieldMiss(ApplySetfieldMiss),
    Experimenter(Experimenter),
    ExperimenterMiss(ExperimenterMiss),
}

impl_variant!(AnyTableFeatureProperty: TableFeatureProperties {
    Instructions(Instructions),
    InstructionsMiss(InstructionsMiss),
    NextTables(NextTables),
    NextTablesMiss(NextTablesMiss),
    WriteActions(WriteActions),
    WriteActionsMiss(WriteActionsMiss),
    ApplyActions(ApplyActions),
    ApplyActionsMiss(ApplyActionsMiss),
    MatchProp(MatchProp),
    Wildcards(Wildcards),
    WriteSetfield(WriteSetfield),
    WriteSetfieldMiss(WriteSetfieldMiss),
    ApplySetfield(ApplySetfield),
    ApplySetfieldMiss(ApplySetfieldMiss),
    Experimenter(Experimenter),
    ExperimenterMiss(ExperimenterMiss),
});

/// Properties are listed by increasing type.
impl CanonicalOrder for AnyTableFeatureProperty {
    fn canonical_key(tag: u16) -> u64 {
        tag as u64
    }
}

pub type TableFeaturePropertySet = KeyedSet<AnyTableFeatureProperty>;

/// Capabilities of one flow table, as exchanged in a table-features multipart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFeatures {
    pub table_id: u8,
    pub pad: [u8; 5],
    pub name: [u8; MAX_TABLE_NAME_LEN],
    pub metadata_match: u64,
    pub metadata_write: u64,
    pub config: u32,
    pub max_entries: u32,
    pub properties: TableFeaturePropertySet,
}

impl TableFeatures {
    pub fn new(table_id: u8, name: &str, max_entries: u32) -> Self {
        let mut features = Self {
            table_id,
            pad: [0; 5],
            name: [0; MAX_TABLE_NAME_LEN],
            metadata_match: 0,
            metadata_write: 0,
            config: 0,
            max_entries,
            properties: TableFeaturePropertySet::new(),
        };
        features.set_name(name);
        features
    }

    /// Stores `name` NUL terminated, cut to 31 bytes.
    pub fn set_name(&mut self, name: &str) {
        self.name = [0; MAX_TABLE_NAME_LEN];
        let len = name.len().min(MAX_TABLE_NAME_LEN - 1);
        self.name[..len].copy_from_slice(&name.as_bytes()[..len]);
    }

    /// Name bytes up to the first NUL.
    pub fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(MAX_TABLE_NAME_LEN);
        &self.name[..end]
    }

    pub fn declared_length(&self) -> usize {
        self.properties.total_wire_length(TABLE_FEATURES_HEADER_SIZE)
    }

    /// Value of the length field.
    pub fn length(&self) -> u16 {
        self.declared_length() as u16
    }

    fn decode_inner(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = src.read_u16()? as usize;
        if len < TABLE_FEATURES_HEADER_SIZE {
            return Err(Error::bad_length(
                len,
                LengthRule::AtLeast(TABLE_FEATURES_HEADER_SIZE as u16),
            ));
        }
        let table_id = src.read_u8()?;
        let pad = src.read_array()?;
        let name = src.read_array()?;
        let metadata_match = src.read_u64()?;
        let metadata_write = src.read_u64()?;
        let config = src.read_u32()?;
        let max_entries = src.read_u32()?;
        let properties =
            TableFeaturePropertySet::decode_bounded(src, len - TABLE_FEATURES_HEADER_SIZE)?;
        Ok(Self {
            table_id,
            pad,
            name,
            metadata_match,
            metadata_write,
            config,
            max_entries,
            properties,
        })
    }
}

impl WireValue for TableFeatures {
    const MIN_LENGTH: u16 = TABLE_FEATURES_HEADER_SIZE as u16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.declared_length()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.put_u16(self.length());
        dst.put_u8(self.table_id);
        dst.put_slice(&self.pad);
        dst.put_slice(&self.name);
        dst.put_u64(self.metadata_match);
        dst.put_u64(self.metadata_write);
        dst.put_u32(self.config);
        dst.put_u32(self.max_entries);
        self.properties.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        Self::decode_inner(src).map_err(|e| e.within_category(CategoryId::TableFeatureProperty))
    }

    fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
        check_length_field(self.declared_length())
            .and_then(|()| {
                if self.table_id > OFPTT_MAX {
                    return Err(Error::invalid(
                        TABLE_FEATURES_FAILED_BAD_TABLE,
                        "table id is reserved",
                    ));
                }
                Ok(())
            })
            .map_err(|e| e.within_category(CategoryId::TableFeatureProperty))?;
        self.properties.validate(validator)
    }

    /// Names compare up to their terminator, properties as a set.
    fn equivalent(&self, other: &Self) -> bool {
        self.table_id == other.table_id
            && self.name_bytes() == other.name_bytes()
            && self.metadata_match == other.metadata_match
            && self.metadata_write == other.metadata_write
            && self.config == other.config
            && self.max_entries == other.max_entries
            && self.properties.equivalent(&other.properties)
    }
}
