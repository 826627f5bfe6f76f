//! # Ofp Messages
//!
//! Every message starts with the 8-byte [`Header`]: `version:u8, type:u8, length:u16, xid:u32`.
//! The type selects the message struct; [`AnyMessage`] holds any of them and decodes whatever
//! message comes next.
//!
//! ```txt
//! Symmetric   Hello, ErrorMsg, EchoRequest, EchoReply
//! Controller  FeaturesRequest, PacketOut, FlowMod, MeterMod, BarrierRequest,
//!             QueueGetConfigRequest, TableFeaturesRequest
//! Switch      BarrierReply, QueueGetConfigReply, TableFeaturesReply
//! ```
//!
//! Requests take their transaction id from an [`XidFactory`] shared by whoever builds requests
//! on one connection; replies copy the id of the request they answer.
//!
//! A message that fails to decode or validate is answered with the [`ErrorMsg`] built by
//! [`ErrorMsg::from_error`].
//!
//! ## Build Options
//! - `prop_test`: implements `quickcheck::Arbitrary` for [`AnyMessage`].

mod controller;
mod error;
mod header;
mod multipart;
mod queue_config;
mod symmetric;

use binary_ofp::{impl_variant, Category, CategoryId, Decoder, WireValue};
use const_ofp::*;
use tracing::{debug, error};

pub use controller::{FlowMod, MeterMod, PacketOut};
pub use error::MessageError;
pub use header::{Header, Messages, XidFactory};
pub use multipart::{TableFeaturesReply, TableFeaturesRequest};
pub use queue_config::{QueueGetConfigReply, QueueGetConfigRequest};
pub use symmetric::{
    BarrierReply, BarrierRequest, EchoReply, EchoRequest, ErrorMsg, FeaturesRequest, Hello,
};

/// Message types this library decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(clippy::enum_variant_names)]
pub enum MessageType {
    Hello = MESSAGE_TYPE_HELLO,
    Error = MESSAGE_TYPE_ERROR,
    EchoRequest = MESSAGE_TYPE_ECHO_REQUEST,
    EchoReply = MESSAGE_TYPE_ECHO_REPLY,
    FeaturesRequest = MESSAGE_TYPE_FEATURES_REQUEST,
    PacketOut = MESSAGE_TYPE_PACKET_OUT,
    FlowMod = MESSAGE_TYPE_FLOW_MOD,
    MultipartRequest = MESSAGE_TYPE_MULTIPART_REQUEST,
    MultipartReply = MESSAGE_TYPE_MULTIPART_REPLY,
    BarrierRequest = MESSAGE_TYPE_BARRIER_REQUEST,
    BarrierReply = MESSAGE_TYPE_BARRIER_REPLY,
    QueueGetConfigRequest = MESSAGE_TYPE_QUEUE_GET_CONFIG_REQUEST,
    QueueGetConfigReply = MESSAGE_TYPE_QUEUE_GET_CONFIG_REPLY,
    MeterMod = MESSAGE_TYPE_METER_MOD,
}

impl TryFrom<u8> for MessageType {
    type Error = MessageError;

    fn try_from(v: u8) -> Result<MessageType, MessageError> {
        match v {
            MESSAGE_TYPE_HELLO => Ok(MessageType::Hello),
            MESSAGE_TYPE_ERROR => Ok(MessageType::Error),
            MESSAGE_TYPE_ECHO_REQUEST => Ok(MessageType::EchoRequest),
            MESSAGE_TYPE_ECHO_REPLY => Ok(MessageType::EchoReply),
            MESSAGE_TYPE_FEATURES_REQUEST => Ok(MessageType::FeaturesRequest),
            MESSAGE_TYPE_PACKET_OUT => Ok(MessageType::PacketOut),
            MESSAGE_TYPE_FLOW_MOD => Ok(MessageType::FlowMod),
            MESSAGE_TYPE_MULTIPART_REQUEST => Ok(MessageType::MultipartRequest),
            MESSAGE_TYPE_MULTIPART_REPLY => Ok(MessageType::MultipartReply),
            MESSAGE_TYPE_BARRIER_REQUEST => Ok(MessageType::BarrierRequest),
            MESSAGE_TYPE_BARRIER_REPLY => Ok(MessageType::BarrierReply),
            MESSAGE_TYPE_QUEUE_GET_CONFIG_REQUEST => Ok(MessageType::QueueGetConfigRequest),
            MESSAGE_TYPE_QUEUE_GET_CONFIG_REPLY => Ok(MessageType::QueueGetConfigReply),
            MESSAGE_TYPE_METER_MOD => Ok(MessageType::MeterMod),
            _ => {
                error!("Invalid message type: {}", v);
                Err(MessageError::UnexpectedMessage(v))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyMessage {
    Hello(Hello),
    Error(ErrorMsg),
    EchoRequest(EchoRequest),
    EchoReply(EchoReply),
    FeaturesRequest(FeaturesRequest),
    PacketOut(PacketOut),
    FlowMod(FlowMod),
    TableFeaturesRequest(TableFeaturesRequest),
    TableFeaturesReply(TableFeaturesReply),
    BarrierRequest(BarrierRequest),
    BarrierReply(BarrierReply),
    QueueGetConfigRequest(QueueGetConfigRequest),
    QueueGetConfigReply(QueueGetConfigReply),
    MeterMod(MeterMod),
}

impl_variant!(AnyMessage: Messages {
    Hello(Hello),
    Error(ErrorMsg),
    EchoRequest(EchoRequest),
    EchoReply(EchoReply),
    FeaturesRequest(FeaturesRequest),
    PacketOut(PacketOut),
    FlowMod(FlowMod),
    TableFeaturesRequest(TableFeaturesRequest),
    TableFeaturesReply(TableFeaturesReply),
    BarrierRequest(BarrierRequest),
    BarrierReply(BarrierReply),
    QueueGetConfigRequest(QueueGetConfigRequest),
    QueueGetConfigReply(QueueGetConfigReply),
    MeterMod(MeterMod),
});

impl AnyMessage {
    /// Decodes one whole message. Unlike [`WireValue::from_bytes`] an unknown message type is
    /// reported as [`MessageError::UnexpectedMessage`].
    pub fn parse(bytes: &[u8]) -> Result<AnyMessage, MessageError> {
        let header = Messages::peek_header(&Decoder::new(bytes))
            .map_err(|e| e.within_category(CategoryId::Message))?;
        let msg_type = MessageType::try_from(header.tag)?;
        let message = AnyMessage::from_bytes(bytes)?;
        debug!(
            "Parsed {:?} message of {} bytes, xid {}",
            msg_type,
            header.length,
            message.xid()
        );
        Ok(message)
    }

    pub fn xid(&self) -> u32 {
        match self {
            AnyMessage::Hello(m) => m.xid,
            AnyMessage::Error(m) => m.xid,
            AnyMessage::EchoRequest(m) => m.xid,
            AnyMessage::EchoReply(m) => m.xid,
            AnyMessage::FeaturesRequest(m) => m.xid,
            AnyMessage::PacketOut(m) => m.xid,
            AnyMessage::FlowMod(m) => m.xid,
            AnyMessage::TableFeaturesRequest(m) => m.xid,
            AnyMessage::TableFeaturesReply(m) => m.xid,
            AnyMessage::BarrierRequest(m) => m.xid,
            AnyMessage::BarrierReply(m) => m.xid,
            AnyMessage::QueueGetConfigRequest(m) => m.xid,
            AnyMessage::QueueGetConfigReply(m) => m.xid,
            AnyMessage::MeterMod(m) => m.xid,
        }
    }
}

pub fn message_type_to_name(msg_type: u8) -> &'static str {
    match msg_type {
        MESSAGE_TYPE_HELLO => "HELLO",
        MESSAGE_TYPE_ERROR => "ERROR",
        MESSAGE_TYPE_ECHO_REQUEST => "ECHO_REQUEST",
        MESSAGE_TYPE_ECHO_REPLY => "ECHO_REPLY",
        MESSAGE_TYPE_EXPERIMENTER => "EXPERIMENTER",
        MESSAGE_TYPE_FEATURES_REQUEST => "FEATURES_REQUEST",
        MESSAGE_TYPE_FEATURES_REPLY => "FEATURES_REPLY",
        MESSAGE_TYPE_PACKET_OUT => "PACKET_OUT",
        MESSAGE_TYPE_FLOW_MOD => "FLOW_MOD",
        MESSAGE_TYPE_MULTIPART_REQUEST => "MULTIPART_REQUEST",
        MESSAGE_TYPE_MULTIPART_REPLY => "MULTIPART_REPLY",
        MESSAGE_TYPE_BARRIER_REQUEST => "BARRIER_REQUEST",
        MESSAGE_TYPE_BARRIER_REPLY => "BARRIER_REPLY",
        MESSAGE_TYPE_QUEUE_GET_CONFIG_REQUEST => "QUEUE_GET_CONFIG_REQUEST",
        MESSAGE_TYPE_QUEUE_GET_CONFIG_REPLY => "QUEUE_GET_CONFIG_REPLY",
        MESSAGE_TYPE_METER_MOD => "METER_MOD",
        _ => "UNKNOWN",
    }
}

#[cfg(any(test, feature = "prop_test"))]
mod prop {
    use super::*;
    use actions_ofp::{ActionList, AnyAction};
    use binary_ofp::KeyedSet;
    use instructions_ofp::{AnyInstruction, InstructionSet};
    use oxm_ofp::{AnyOxm, Match};
    use properties_ofp::{AnyHelloElement, AnyMeterBand, HelloElementList, MeterBandList};
    use quickcheck::{Arbitrary, Gen};

    fn few<T: Arbitrary>(g: &mut Gen, n: usize) -> Vec<T> {
        Vec::<T>::arbitrary(g).into_iter().take(n).collect()
    }

    fn flow_mod(g: &mut Gen) -> FlowMod {
        let xids = XidFactory::starting_at(u32::arbitrary(g));
        // One value per key.
        let mut fields = KeyedSet::new();
        for field in few::<AnyOxm>(g, 4) {
            fields.replace(field);
        }
        let mut instructions = InstructionSet::new();
        for instruction in few::<AnyInstruction>(g, 4) {
            instructions.replace(instruction);
        }
        let mut flow_mod = FlowMod::add(
            &xids,
            u8::arbitrary(g) % OFPTT_ALL,
            u16::arbitrary(g),
            Match::new(fields),
            instructions,
        );
        flow_mod.cookie = u64::arbitrary(g);
        flow_mod.idle_timeout = u16::arbitrary(g);
        flow_mod
    }

    impl Arbitrary for AnyMessage {
        fn arbitrary(g: &mut Gen) -> Self {
            let xids = XidFactory::starting_at(u32::arbitrary(g));
            match u8::arbitrary(g) % 7 {
                0 => {
                    let elements: HelloElementList = few::<AnyHelloElement>(g, 3).into();
                    Hello::new(&xids, elements).into()
                }
                1 => EchoRequest::new(&xids, &few::<u8>(g, 32)).into(),
                2 => BarrierRequest::new(&xids).into(),
                3 => {
                    let actions: ActionList = few::<AnyAction>(g, 4).into();
                    let in_port = u32::arbitrary(g) % OFPP_MAX + 1;
                    PacketOut::new(&xids, in_port, actions, &few::<u8>(g, 64)).into()
                }
                4 => flow_mod(g).into(),
                5 => {
                    let bands: MeterBandList = few::<AnyMeterBand>(g, 3).into();
                    let meter_id = u32::arbitrary(g) % OFPM_MAX + 1;
                    MeterMod::new(&xids, METER_COMMAND_ADD, meter_id, bands).into()
                }
                _ => QueueGetConfigRequest::new(&xids, u32::arbitrary(g) % OFPP_MAX + 1).into(),
            }
        }
    }
}
