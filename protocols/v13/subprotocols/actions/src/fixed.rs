//! Actions with a fixed layout.

use alloc::vec::Vec;

use binary_ofp::{
    read_tlv_header, write_tlv_header, Decoder, Encoder, Error, Member, Validator, WireValue,
    TLV_HEADER_LEN,
};
use const_ofp::*;

use crate::Actions;

/// Declares an action made of the common header, at most one scalar argument and trailing
/// padding. Padding is ignored by `equivalent`. An optional `check` function runs on validation.
macro_rules! action {
    (
        $(#[$doc:meta])*
        $name:ident = $tag:expr;
        $( [$field:ident: $t:ty] )?
        pad $pad:expr
        $(; check $check:path)?
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name {
            $( pub $field: $t, )?
            pub pad: [u8; $pad],
        }

        impl $name {
            pub fn new($( $field: $t )?) -> Self {
                Self {
                    $( $field, )?
                    pad: [0; $pad],
                }
            }
        }

        impl Member for $name {
            type Category = Actions;
            const TAG: u16 = $tag;
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 =
                (TLV_HEADER_LEN $( + <$t as WireValue>::MIN_LENGTH as usize )? + $pad) as u16;
            const FIXED_LENGTH: bool = true;

            fn wire_length(&self) -> usize {
                Self::MIN_LENGTH as usize
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                write_tlv_header(dst, Self::TAG, Self::MIN_LENGTH);
                $( self.$field.encode(dst); )?
                dst.put_slice(&self.pad);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                read_tlv_header::<Self>(src)?;
                Ok(Self {
                    $( $field: <$t as WireValue>::decode(src)?, )?
                    pad: src.read_array()?,
                })
            }

            $(
                fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
                    $check(self)
                }
            )?

            fn equivalent(&self, _other: &Self) -> bool {
                true $( && self.$field == _other.$field )?
            }
        }
    };
}

action!(
    /// Copies the TTL outwards, from next-to-outermost to outermost header.
    CopyTtlOut = ACTION_TYPE_COPY_TTL_OUT;
    pad 4
);
action!(
    /// Copies the TTL inwards, from outermost to next-to-outermost header.
    CopyTtlIn = ACTION_TYPE_COPY_TTL_IN;
    pad 4
);
action!(SetMplsTtl = ACTION_TYPE_SET_MPLS_TTL; [mpls_ttl: u8] pad 3);
action!(DecMplsTtl = ACTION_TYPE_DEC_MPLS_TTL; pad 4);
action!(
    /// Pushes a new VLAN tag. The ethertype must be 802.1Q or 802.1ad.
    PushVlan = ACTION_TYPE_PUSH_VLAN;
    [ethertype: u16]
    pad 2;
    check check_push_vlan
);
action!(PopVlan = ACTION_TYPE_POP_VLAN; pad 4);
action!(
    PushMpls = ACTION_TYPE_PUSH_MPLS;
    [ethertype: u16]
    pad 2;
    check check_push_mpls
);
action!(
    /// Pops the outer MPLS tag, `ethertype` is the type of the uncovered payload.
    PopMpls = ACTION_TYPE_POP_MPLS;
    [ethertype: u16]
    pad 2
);
action!(SetQueue = ACTION_TYPE_SET_QUEUE; [queue_id: u32] pad 0);
action!(
    /// Processes the packet through a group.
    Group = ACTION_TYPE_GROUP;
    [group_id: u32]
    pad 0;
    check check_group
);
action!(SetNwTtl = ACTION_TYPE_SET_NW_TTL; [nw_ttl: u8] pad 3);
action!(DecNwTtl = ACTION_TYPE_DEC_NW_TTL; pad 4);
action!(
    PushPbb = ACTION_TYPE_PUSH_PBB;
    [ethertype: u16]
    pad 2;
    check check_push_pbb
);
action!(PopPbb = ACTION_TYPE_POP_PBB; pad 4);

pub const ETH_TYPE_VLAN: u16 = 0x8100;
pub const ETH_TYPE_VLAN_QINQ: u16 = 0x88a8;
pub const ETH_TYPE_MPLS: u16 = 0x8847;
pub const ETH_TYPE_MPLS_MULTICAST: u16 = 0x8848;
pub const ETH_TYPE_PBB: u16 = 0x88e7;

fn check_push_vlan(action: &PushVlan) -> Result<(), Error> {
    match action.ethertype {
        ETH_TYPE_VLAN | ETH_TYPE_VLAN_QINQ => Ok(()),
        _ => Err(Error::invalid(
            BAD_ACTION_BAD_ARGUMENT,
            "push vlan ethertype is not 802.1Q nor 802.1ad",
        )),
    }
}

fn check_push_mpls(action: &PushMpls) -> Result<(), Error> {
    match action.ethertype {
        ETH_TYPE_MPLS | ETH_TYPE_MPLS_MULTICAST => Ok(()),
        _ => Err(Error::invalid(
            BAD_ACTION_BAD_ARGUMENT,
            "push mpls ethertype is not an MPLS ethertype",
        )),
    }
}

fn check_push_pbb(action: &PushPbb) -> Result<(), Error> {
    if action.ethertype != ETH_TYPE_PBB {
        return Err(Error::invalid(
            BAD_ACTION_BAD_ARGUMENT,
            "push pbb ethertype is not 802.1ah",
        ));
    }
    Ok(())
}

fn check_group(action: &Group) -> Result<(), Error> {
    if action.group_id > OFPG_MAX {
        return Err(Error::invalid(
            BAD_ACTION_BAD_OUT_GROUP,
            "group id is reserved",
        ));
    }
    Ok(())
}

/// Sends the packet out of `port`.
///
/// `max_len` caps the bytes sent when the port is the controller and is meaningless for any other
/// port, so it only takes part in `equivalent` for controller outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub port: u32,
    pub max_len: u16,
    pub pad: [u8; 6],
}

impl Output {
    pub fn new(port: u32, max_len: u16) -> Self {
        Self {
            port,
            max_len,
            pad: [0; 6],
        }
    }

    /// Output to the controller, sending the whole packet.
    pub fn to_controller() -> Self {
        Self::new(OFPP_CONTROLLER, OFPCML_NO_BUFFER)
    }
}

impl Member for Output {
    type Category = Actions;
    const TAG: u16 = ACTION_TYPE_OUTPUT;
}

impl WireValue for Output {
    const MIN_LENGTH: u16 = 16;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        Self::MIN_LENGTH as usize
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_tlv_header(dst, Self::TAG, Self::MIN_LENGTH);
        dst.put_u32(self.port);
        dst.put_u16(self.max_len);
        dst.put_slice(&self.pad);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        read_tlv_header::<Self>(src)?;
        Ok(Self {
            port: src.read_u32()?,
            max_len: src.read_u16()?,
            pad: src.read_array()?,
        })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        if self.port == 0 || self.port == OFPP_ANY {
            return Err(Error::invalid(
                BAD_ACTION_BAD_OUT_PORT,
                "output port is 0 or ANY",
            ));
        }
        Ok(())
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.port == other.port
            && (self.port != OFPP_CONTROLLER || self.max_len == other.max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use binary_ofp::{LengthRule, Shallow};

    #[test]
    fn test_output_layout() {
        let output = Output::new(3, 0);
        assert_eq!(
            output.to_bytes(),
            vec![0, 0, 0, 16, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(Output::from_bytes(&output.to_bytes()), Ok(output));
    }

    #[test]
    fn test_output_max_len_only_matters_for_controller() {
        let a = Output::new(3, 0);
        let b = Output::new(3, 128);
        assert!(a.equivalent(&b));
        assert!(!a.byte_eq(&b));

        let c = Output::new(OFPP_CONTROLLER, 0);
        let d = Output::new(OFPP_CONTROLLER, 128);
        assert!(!c.equivalent(&d));
        assert!(!Output::new(3, 0).equivalent(&Output::new(4, 0)));
    }

    #[test]
    fn test_output_port_checks() {
        assert!(Output::new(0, 0).validate(&Shallow).is_err());
        assert!(Output::new(OFPP_ANY, 0).validate(&Shallow).is_err());
        assert!(Output::to_controller().validate(&Shallow).is_ok());
    }

    #[test]
    fn test_padding_is_kept_and_ignored() {
        let bytes = [0, 17, 0, 8, 0x81, 0x00, 0xde, 0xad];
        let push = PushVlan::from_bytes(&bytes).unwrap();
        assert_eq!(push.pad, [0xde, 0xad]);
        assert_eq!(push.to_bytes(), bytes);
        assert!(push.equivalent(&PushVlan::new(ETH_TYPE_VLAN)));
        assert!(!push.byte_eq(&PushVlan::new(ETH_TYPE_VLAN)));
    }

    #[test]
    fn test_sizes() {
        assert_eq!(CopyTtlIn::new().to_bytes(), vec![0, 12, 0, 8, 0, 0, 0, 0]);
        assert_eq!(SetNwTtl::new(64).to_bytes(), vec![0, 23, 0, 8, 64, 0, 0, 0]);
        assert_eq!(Group::new(7).to_bytes(), vec![0, 22, 0, 8, 0, 0, 0, 7]);
        assert_eq!(SetQueue::length_rule(), LengthRule::Exact(8));
    }

    #[test]
    fn test_argument_checks() {
        assert!(PushVlan::new(ETH_TYPE_VLAN_QINQ).validate(&Shallow).is_ok());
        assert!(PushVlan::new(0x0800).validate(&Shallow).is_err());
        assert!(PushMpls::new(ETH_TYPE_MPLS_MULTICAST).validate(&Shallow).is_ok());
        assert!(PushMpls::new(ETH_TYPE_VLAN).validate(&Shallow).is_err());
        assert!(PushPbb::new(ETH_TYPE_PBB).validate(&Shallow).is_ok());
        assert!(PopMpls::new(0x0800).validate(&Shallow).is_ok());
        assert_eq!(
            Group::new(OFPG_ALL).validate(&Shallow),
            Err(Error::invalid(BAD_ACTION_BAD_OUT_GROUP, "group id is reserved"))
        );
    }

    #[test]
    fn test_decoding_another_action_is_wrong_variant() {
        let bytes = PopVlan::new().to_bytes();
        assert!(matches!(
            PopPbb::from_bytes(&bytes),
            Err(Error::WrongVariant { .. })
        ));
    }
}
