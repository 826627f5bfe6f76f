//! Actions whose length depends on their content. Both are padded to a multiple of 8 inside
//! their declared length.

use alloc::vec::Vec;

use binary_ofp::{
    pad_len, read_tlv_header, write_tlv_header, Decoder, Encoder, Error, LengthRule, Member,
    Padding, Validator, WireValue, TLV_HEADER_LEN,
};
use const_ofp::{
    ACTION_TYPE_EXPERIMENTER, ACTION_TYPE_SET_FIELD, BAD_ACTION_BAD_SET_ARGUMENT, OFP_ALIGNMENT,
};
use oxm_ofp::AnyOxm;

use crate::Actions;

/// Reads the declared length of `T` and refuses lengths shorter than `T::MIN_LENGTH`, which the
/// multiple-of-8 rule alone would let through.
fn read_padded_header<T>(src: &mut Decoder<'_>) -> Result<usize, Error>
where
    T: Member<Category = Actions>,
{
    let len = read_tlv_header::<T>(src)?;
    if len < T::MIN_LENGTH {
        return Err(Error::bad_length(
            len as usize,
            LengthRule::AtLeast(T::MIN_LENGTH),
        ));
    }
    Ok(len as usize)
}

/// Rewrites one header field with the value of `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetField {
    pub field: AnyOxm,
    pub pad: Padding,
}

impl SetField {
    pub fn new<T: Into<AnyOxm>>(field: T) -> Self {
        let field = field.into();
        let pad = Padding::to_align(TLV_HEADER_LEN + field.wire_length(), OFP_ALIGNMENT);
        Self { field, pad }
    }
}

impl Member for SetField {
    type Category = Actions;
    const TAG: u16 = ACTION_TYPE_SET_FIELD;
}

impl WireValue for SetField {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        TLV_HEADER_LEN + self.field.wire_length() + self.pad.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, self.wire_length() as u16);
        self.field.encode(dst);
        self.pad.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = read_padded_header::<Self>(src)?;
        let mut body = src.take(len - TLV_HEADER_LEN)?;
        let field = AnyOxm::decode(&mut body)?;
        let expected = pad_len(TLV_HEADER_LEN + field.wire_length(), OFP_ALIGNMENT);
        if body.remaining() != expected {
            return Err(Error::bad_length(
                len,
                LengthRule::exact(len - body.remaining() + expected),
            ));
        }
        let pad = Padding::decode(&mut body, expected)?;
        Ok(Self { field, pad })
    }

    /// A set-field carries a plain value, never a mask. Out of range values are reported as a bad
    /// set-field argument.
    fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
        self.pad
            .check_aligns(TLV_HEADER_LEN + self.field.wire_length(), OFP_ALIGNMENT)?;
        if self.field.has_mask() {
            return Err(Error::invalid(
                BAD_ACTION_BAD_SET_ARGUMENT,
                "set-field carries a masked field",
            ));
        }
        validator.nested(&self.field).map_err(|e| match e {
            Error::InvalidValue { reason, .. } => {
                Error::invalid(BAD_ACTION_BAD_SET_ARGUMENT, reason)
            }
            other => other,
        })
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.field.equivalent(&other.field)
    }

    fn length_rule() -> LengthRule {
        LengthRule::MultipleOf(OFP_ALIGNMENT as u16)
    }
}

/// Vendor action. `data` holds everything after the experimenter id, padding included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experimenter {
    pub experimenter: u32,
    pub data: Vec<u8>,
}

impl Experimenter {
    /// Zero pads `data` so the action stays a multiple of 8 bytes long.
    pub fn new(experimenter: u32, data: &[u8]) -> Self {
        let mut data = data.to_vec();
        data.resize(data.len() + pad_len(8 + data.len(), OFP_ALIGNMENT), 0);
        Self { experimenter, data }
    }
}

impl Member for Experimenter {
    type Category = Actions;
    const TAG: u16 = ACTION_TYPE_EXPERIMENTER;
}

impl WireValue for Experimenter {
    const MIN_LENGTH: u16 = 8;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        8 + self.data.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, self.wire_length() as u16);
        dst.put_u32(self.experimenter);
        dst.put_slice(&self.data);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = read_padded_header::<Self>(src)?;
        let experimenter = src.read_u32()?;
        let data = src.read_bytes(len - 8)?.to_vec();
        Ok(Self { experimenter, data })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        let len = self.wire_length();
        if len % OFP_ALIGNMENT != 0 {
            return Err(Error::bad_length(len, Self::length_rule()));
        }
        Ok(())
    }

    fn length_rule() -> LengthRule {
        LengthRule::MultipleOf(OFP_ALIGNMENT as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use binary_ofp::{ErrorCode, ErrorType, Recursive, Shallow};
    use const_ofp::BAD_ACTION_BAD_LEN;
    use oxm_ofp::{EthDst, Ipv4SrcMasked, VlanPcp, VlanVid};

    #[test]
    fn test_set_field_layout() {
        let action = SetField::new(VlanVid::new(0x1005));
        assert_eq!(
            action.to_bytes(),
            vec![0, 25, 0, 16, 0x80, 0x00, 0x0c, 0x02, 0x10, 0x05, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(SetField::from_bytes(&action.to_bytes()), Ok(action));
    }

    #[test]
    fn test_set_field_padding_mismatch() {
        // eth_dst needs 2 bytes of padding, 10 are supplied.
        let mut bytes = SetField::new(EthDst::new([1, 2, 3, 4, 5, 6])).to_bytes();
        assert_eq!(bytes.len(), 16);
        bytes[3] = 24;
        bytes.extend_from_slice(&[0; 8]);
        assert!(matches!(
            SetField::from_bytes(&bytes),
            Err(Error::BadLength { declared: 24, .. })
        ));
    }

    #[test]
    fn test_set_field_length_must_be_multiple_of_eight() {
        let mut bytes = SetField::new(VlanVid::new(1)).to_bytes();
        bytes[3] = 12;
        assert_eq!(
            SetField::from_bytes(&bytes[..12]),
            Err(Error::bad_length(12, LengthRule::MultipleOf(8)))
        );
    }

    #[test]
    fn test_set_field_rejects_masks_and_bad_values() {
        let masked = SetField::new(Ipv4SrcMasked::new(0, 0));
        assert!(matches!(
            masked.validate(&Shallow),
            Err(Error::InvalidValue {
                code: BAD_ACTION_BAD_SET_ARGUMENT,
                ..
            })
        ));
        let out_of_range = SetField::new(VlanPcp::new(8));
        assert!(out_of_range.validate(&Shallow).is_ok());
        assert!(matches!(
            out_of_range.validate(&Recursive),
            Err(Error::InvalidValue {
                code: BAD_ACTION_BAD_SET_ARGUMENT,
                ..
            })
        ));
    }

    #[test]
    fn test_experimenter_is_padded() {
        let action = Experimenter::new(0x00_2320, &[1, 2, 3]);
        assert_eq!(action.wire_length(), 16);
        assert_eq!(action.data, vec![1, 2, 3, 0, 0, 0, 0, 0]);
        let bytes = action.to_bytes();
        assert_eq!(&bytes[..8], &[0xff, 0xff, 0, 16, 0, 0, 0x23, 0x20]);
        assert_eq!(Experimenter::from_bytes(&bytes), Ok(action));
    }

    #[test]
    fn test_set_field_padding_follows_the_field() {
        let mut action = SetField::new(VlanVid::new(1));
        assert_eq!(action.validate(&Recursive), Ok(()));
        action.field = EthDst::new([1, 2, 3, 4, 5, 6]).into();
        assert_eq!(
            action.validate(&Shallow),
            Err(Error::bad_length(20, LengthRule::Exact(16)))
        );
        action.pad = Padding::to_align(TLV_HEADER_LEN + action.field.wire_length(), 8);
        assert_eq!(action.validate(&Recursive), Ok(()));
        assert_eq!(SetField::from_bytes(&action.to_bytes()), Ok(action));
    }

    #[test]
    fn test_unaligned_experimenter_data_is_bad_len() {
        let action = Experimenter {
            experimenter: 0x00_2320,
            data: vec![1, 2, 3],
        };
        assert_eq!(
            action.validate(&Shallow),
            Err(Error::bad_length(11, LengthRule::MultipleOf(8)))
        );
        let list: crate::ActionList = vec![crate::AnyAction::from(action)].into();
        assert_eq!(list.validate(&Shallow), Ok(()));
        assert_eq!(
            list.validate(&Recursive).unwrap_err().code(),
            ErrorCode::protocol(ErrorType::BadAction, BAD_ACTION_BAD_LEN)
        );
    }
}
