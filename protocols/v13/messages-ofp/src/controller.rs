//! Controller-to-switch modifications: packet-out, flow-mod and meter-mod.

use actions_ofp::ActionList;
use binary_ofp::{CategoryId, Decoder, Encoder, Error, Member, Validator, WireValue};
use const_ofp::*;
use instructions_ofp::{AnyInstruction, InstructionSet};
use oxm_ofp::Match;
use properties_ofp::MeterBandList;

use crate::header::{
    check_message_length, read_message_header, within_message, write_message_header, Messages,
    XidFactory,
};

fn within<T: Member<Category = Messages>>(e: Error) -> Error {
    e.within(CategoryId::Message, T::TAG as u64)
}

/// Sends a packet out of the switch. The packet is either buffered on the switch
/// (`buffer_id`) or carried in `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketOut {
    pub xid: u32,
    pub buffer_id: u32,
    pub in_port: u32,
    pub pad: [u8; 6],
    pub actions: ActionList,
    pub data: Vec<u8>,
}

impl PacketOut {
    /// An unbuffered packet-out carrying `data`.
    pub fn new(xids: &XidFactory, in_port: u32, actions: ActionList, data: &[u8]) -> Self {
        Self {
            xid: xids.next(),
            buffer_id: OFP_NO_BUFFER,
            in_port,
            pad: [0; 6],
            actions,
            data: data.to_vec(),
        }
    }

    /// Value of the `actions_len` field.
    pub fn actions_len(&self) -> u16 {
        self.actions.wire_length() as u16
    }

    fn decode_inner(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let header = read_message_header::<Self>(src)?;
        let mut body = src.take(header.body_len())?;
        let buffer_id = body.read_u32()?;
        let in_port = body.read_u32()?;
        let actions_len = body.read_u16()? as usize;
        let pad = body.read_array()?;
        if actions_len > body.remaining() {
            return Err(Error::invalid(
                BAD_REQUEST_BAD_LEN,
                "actions overrun the message",
            ));
        }
        let actions = ActionList::decode_bounded(&mut body, actions_len)?;
        Ok(Self {
            xid: header.xid,
            buffer_id,
            in_port,
            pad,
            actions,
            data: body.read_rest().to_vec(),
        })
    }
}

impl Member for PacketOut {
    type Category = Messages;
    const TAG: u8 = MESSAGE_TYPE_PACKET_OUT;
}

impl WireValue for PacketOut {
    const MIN_LENGTH: u16 = PACKET_OUT_FIXED_SIZE as u16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.actions
            .total_wire_length(PACKET_OUT_FIXED_SIZE + self.data.len())
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_message_header(dst, self, self.xid);
        dst.put_u32(self.buffer_id);
        dst.put_u32(self.in_port);
        dst.put_u16(self.actions_len());
        dst.put_slice(&self.pad);
        self.actions.encode(dst);
        dst.put_slice(&self.data);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        Self::decode_inner(src).map_err(within::<Self>)
    }

    /// `in_port` must be a physical port, `CONTROLLER` or `LOCAL`.
    fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
        check_message_length(self)?;
        let port_ok = match self.in_port {
            0 => false,
            OFPP_CONTROLLER | OFPP_LOCAL => true,
            port => port <= OFPP_MAX,
        };
        if !port_ok {
            return within_message::<Self>(Err(Error::invalid(
                BAD_REQUEST_BAD_PORT,
                "invalid ingress port",
            )));
        }
        validator.nested(&self.actions)
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.xid == other.xid
            && self.buffer_id == other.buffer_id
            && self.in_port == other.in_port
            && self.actions.equivalent(&other.actions)
            && self.data == other.data
    }
}

/// Adds, modifies or deletes flow entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowMod {
    pub xid: u32,
    pub cookie: u64,
    pub cookie_mask: u64,
    pub table_id: u8,
    pub command: u8,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub priority: u16,
    pub buffer_id: u32,
    pub out_port: u32,
    pub out_group: u32,
    pub flags: u16,
    pub pad: [u8; 2],
    pub flow_match: Match,
    pub instructions: InstructionSet,
}

impl FlowMod {
    /// A permanent flow entry in `table_id`. Buffer, output port and group are left unset.
    pub fn add(
        xids: &XidFactory,
        table_id: u8,
        priority: u16,
        flow_match: Match,
        instructions: InstructionSet,
    ) -> Self {
        Self {
            xid: xids.next(),
            cookie: 0,
            cookie_mask: 0,
            table_id,
            command: FLOW_MOD_COMMAND_ADD,
            idle_timeout: 0,
            hard_timeout: 0,
            priority,
            buffer_id: OFP_NO_BUFFER,
            out_port: OFPP_ANY,
            out_group: OFPG_ANY,
            flags: 0,
            pad: [0; 2],
            flow_match,
            instructions,
        }
    }

    /// Deletes every entry of `table_id` (or of all tables) matching `flow_match`.
    pub fn delete(xids: &XidFactory, table_id: u8, flow_match: Match) -> Self {
        Self {
            command: FLOW_MOD_COMMAND_DELETE,
            ..Self::add(xids, table_id, 0, flow_match, InstructionSet::new())
        }
    }

    /// The same flow-mod with instructions, written action sets and match fields in canonical
    /// order. Two equivalent flow-mods have the same canonical encoding.
    pub fn canonical(self) -> Self {
        let instructions: InstructionSet = self
            .instructions
            .into_iter()
            .map(|instruction| match instruction {
                AnyInstruction::WriteActions(mut write) => {
                    write.actions = write.actions.into_canonical();
                    AnyInstruction::WriteActions(write)
                }
                other => other,
            })
            .collect();
        Self {
            flow_match: Match::new(self.flow_match.fields.into_canonical()),
            instructions: instructions.into_canonical(),
            pad: [0; 2],
            ..self
        }
    }

    fn decode_inner(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let header = read_message_header::<Self>(src)?;
        let mut body = src.take(header.body_len())?;
        let cookie = body.read_u64()?;
        let cookie_mask = body.read_u64()?;
        let table_id = body.read_u8()?;
        let command = body.read_u8()?;
        let idle_timeout = body.read_u16()?;
        let hard_timeout = body.read_u16()?;
        let priority = body.read_u16()?;
        let buffer_id = body.read_u32()?;
        let out_port = body.read_u32()?;
        let out_group = body.read_u32()?;
        let flags = body.read_u16()?;
        let pad = body.read_array()?;
        let flow_match = Match::decode(&mut body)?;
        let rest = body.remaining();
        let instructions = InstructionSet::decode_bounded(&mut body, rest)?;
        Ok(Self {
            xid: header.xid,
            cookie,
            cookie_mask,
            table_id,
            command,
            idle_timeout,
            hard_timeout,
            priority,
            buffer_id,
            out_port,
            out_group,
            flags,
            pad,
            flow_match,
            instructions,
        })
    }

    fn check_fields(&self) -> Result<(), Error> {
        if self.command > FLOW_MOD_COMMAND_DELETE_STRICT {
            return Err(Error::invalid(
                FLOW_MOD_FAILED_BAD_COMMAND,
                "unknown flow-mod command",
            ));
        }
        let adds = matches!(
            self.command,
            FLOW_MOD_COMMAND_ADD | FLOW_MOD_COMMAND_MODIFY | FLOW_MOD_COMMAND_MODIFY_STRICT
        );
        if adds && self.table_id == OFPTT_ALL {
            return Err(Error::invalid(
                FLOW_MOD_FAILED_BAD_TABLE_ID,
                "entries cannot be added to all tables",
            ));
        }
        Ok(())
    }
}

impl Member for FlowMod {
    type Category = Messages;
    const TAG: u8 = MESSAGE_TYPE_FLOW_MOD;
}

impl WireValue for FlowMod {
    const MIN_LENGTH: u16 = (FLOW_MOD_FIXED_SIZE + 8) as u16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.instructions
            .total_wire_length(FLOW_MOD_FIXED_SIZE + self.flow_match.wire_length())
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_message_header(dst, self, self.xid);
        dst.put_u64(self.cookie);
        dst.put_u64(self.cookie_mask);
        dst.put_u8(self.table_id);
        dst.put_u8(self.command);
        dst.put_u16(self.idle_timeout);
        dst.put_u16(self.hard_timeout);
        dst.put_u16(self.priority);
        dst.put_u32(self.buffer_id);
        dst.put_u32(self.out_port);
        dst.put_u32(self.out_group);
        dst.put_u16(self.flags);
        dst.put_slice(&self.pad);
        self.flow_match.encode(dst);
        self.instructions.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        Self::decode_inner(src).map_err(within::<Self>)
    }

    /// Duplicate match fields and instructions are refused even by a shallow validator, the
    /// values inside them only by a recursive one.
    fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
        check_message_length(self)?;
        within_message::<Self>(self.check_fields())?;
        self.flow_match.validate(validator)?;
        self.instructions.validate(validator)
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.xid == other.xid
            && self.cookie == other.cookie
            && self.cookie_mask == other.cookie_mask
            && self.table_id == other.table_id
            && self.command == other.command
            && self.idle_timeout == other.idle_timeout
            && self.hard_timeout == other.hard_timeout
            && self.priority == other.priority
            && self.buffer_id == other.buffer_id
            && self.out_port == other.out_port
            && self.out_group == other.out_group
            && self.flags == other.flags
            && self.flow_match.equivalent(&other.flow_match)
            && self.instructions.equivalent(&other.instructions)
    }
}

/// Adds, modifies or deletes a meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterMod {
    pub xid: u32,
    pub command: u16,
    pub flags: u16,
    pub meter_id: u32,
    pub bands: MeterBandList,
}

impl MeterMod {
    pub fn new(xids: &XidFactory, command: u16, meter_id: u32, bands: MeterBandList) -> Self {
        Self {
            xid: xids.next(),
            command,
            flags: 0,
            meter_id,
            bands,
        }
    }

    fn check_fields(&self) -> Result<(), Error> {
        if self.command > METER_COMMAND_DELETE {
            return Err(Error::invalid(
                METER_MOD_FAILED_BAD_COMMAND,
                "unknown meter-mod command",
            ));
        }
        let meter_ok = match self.meter_id {
            0 => false,
            OFPM_SLOWPATH | OFPM_CONTROLLER | OFPM_ALL => true,
            id => id <= OFPM_MAX,
        };
        if !meter_ok {
            return Err(Error::invalid(
                METER_MOD_FAILED_INVALID_METER,
                "meter id is reserved",
            ));
        }
        Ok(())
    }
}

impl Member for MeterMod {
    type Category = Messages;
    const TAG: u8 = MESSAGE_TYPE_METER_MOD;
}

impl WireValue for MeterMod {
    const MIN_LENGTH: u16 = 16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.bands.total_wire_length(16)
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_message_header(dst, self, self.xid);
        dst.put_u16(self.command);
        dst.put_u16(self.flags);
        dst.put_u32(self.meter_id);
        self.bands.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let header = read_message_header::<Self>(src)?;
        let mut body = src.take(header.body_len()).map_err(within::<Self>)?;
        let command = body.read_u16()?;
        let flags = body.read_u16()?;
        let meter_id = body.read_u32()?;
        let rest = body.remaining();
        Ok(Self {
            xid: header.xid,
            command,
            flags,
            meter_id,
            bands: MeterBandList::decode_bounded(&mut body, rest)?,
        })
    }

    fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
        check_message_length(self)?;
        within_message::<Self>(self.check_fields())?;
        validator.nested(&self.bands)
    }
}
