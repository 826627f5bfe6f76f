use binary_ofp::{CategoryId, Decoder, Encoder, Error, Member, Validator, WireValue};
use const_ofp::*;
use properties_ofp::PacketQueue;

use crate::header::{
    check_message_length, decode_all, read_message_header, within_message, write_message_header,
    Messages, XidFactory,
};

/// Asks for the queues configured on `port`, or on every port with `OFPP_ANY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueGetConfigRequest {
    pub xid: u32,
    pub port: u32,
    pub pad: [u8; 4],
}

impl QueueGetConfigRequest {
    pub fn new(xids: &XidFactory, port: u32) -> Self {
        Self {
            xid: xids.next(),
            port,
            pad: [0; 4],
        }
    }
}

fn check_port(port: u32) -> Result<(), Error> {
    if port == 0 || (port > OFPP_MAX && port != OFPP_ANY) {
        return Err(Error::invalid(QUEUE_OP_FAILED_BAD_PORT, "invalid port"));
    }
    Ok(())
}

impl Member for QueueGetConfigRequest {
    type Category = Messages;
    const TAG: u8 = MESSAGE_TYPE_QUEUE_GET_CONFIG_REQUEST;
}

impl WireValue for QueueGetConfigRequest {
    const MIN_LENGTH: u16 = 16;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        16
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_message_header(dst, self, self.xid);
        dst.put_u32(self.port);
        dst.put_slice(&self.pad);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let header = read_message_header::<Self>(src)?;
        Ok(Self {
            xid: header.xid,
            port: src.read_u32()?,
            pad: src.read_array()?,
        })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        within_message::<Self>(check_port(self.port))
    }
}

/// The queues of the requested port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueGetConfigReply {
    pub xid: u32,
    pub port: u32,
    pub pad: [u8; 4],
    pub queues: Vec<PacketQueue>,
}

impl QueueGetConfigReply {
    pub fn to(request: &QueueGetConfigRequest, queues: Vec<PacketQueue>) -> Self {
        Self {
            xid: request.xid,
            port: request.port,
            pad: [0; 4],
            queues,
        }
    }
}

impl Member for QueueGetConfigReply {
    type Category = Messages;
    const TAG: u8 = MESSAGE_TYPE_QUEUE_GET_CONFIG_REPLY;
}

impl WireValue for QueueGetConfigReply {
    const MIN_LENGTH: u16 = 16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        16 + self.queues.iter().map(|q| q.wire_length()).sum::<usize>()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_message_header(dst, self, self.xid);
        dst.put_u32(self.port);
        dst.put_slice(&self.pad);
        for queue in &self.queues {
            queue.encode(dst);
        }
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let header = read_message_header::<Self>(src)?;
        let mut body = src.take(header.body_len())?;
        let port = body.read_u32()?;
        let pad = body.read_array()?;
        let queues = decode_all(&mut body)
            .map_err(|e| e.within(CategoryId::Message, Self::TAG as u64))?;
        Ok(Self {
            xid: header.xid,
            port,
            pad,
            queues,
        })
    }

    /// Every queue must belong to the port of the reply, unless the reply covers all ports.
    fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
        check_message_length(self)?;
        within_message::<Self>(check_port(self.port))?;
        for queue in &self.queues {
            if self.port != OFPP_ANY && queue.port != self.port {
                return within_message::<Self>(Err(Error::invalid(
                    QUEUE_OP_FAILED_BAD_QUEUE,
                    "queue of another port",
                )));
            }
            validator.nested(queue)?;
        }
        Ok(())
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.xid == other.xid
            && self.port == other.port
            && self.queues.len() == other.queues.len()
            && self
                .queues
                .iter()
                .zip(&other.queues)
                .all(|(a, b)| a.equivalent(b))
    }
}
