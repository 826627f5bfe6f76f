//! Central repository for all the ofp constants
//!
//! Every number that appears on the wire lives here: the protocol version, header sizes, the
//! type tags of each value category, reserved port/group/meter/table numbers and the error type
//! numbers. The codec crates never hard-code these values.
#![no_std]

pub const OFP_VERSION: u8 = 0x04;
pub const OFP_HEADER_SIZE: usize = 8;
pub const OFP_HEADER_LEN_OFFSET: usize = 2;
/// Alignment of actions, instructions, matches, bands and padded properties.
pub const OFP_ALIGNMENT: usize = 8;

// Message types
pub const MESSAGE_TYPE_HELLO: u8 = 0;
pub const MESSAGE_TYPE_ERROR: u8 = 1;
pub const MESSAGE_TYPE_ECHO_REQUEST: u8 = 2;
pub const MESSAGE_TYPE_ECHO_REPLY: u8 = 3;
pub const MESSAGE_TYPE_EXPERIMENTER: u8 = 4;
pub const MESSAGE_TYPE_FEATURES_REQUEST: u8 = 5;
pub const MESSAGE_TYPE_FEATURES_REPLY: u8 = 6;
pub const MESSAGE_TYPE_PACKET_OUT: u8 = 13;
pub const MESSAGE_TYPE_FLOW_MOD: u8 = 14;
pub const MESSAGE_TYPE_MULTIPART_REQUEST: u8 = 18;
pub const MESSAGE_TYPE_MULTIPART_REPLY: u8 = 19;
pub const MESSAGE_TYPE_BARRIER_REQUEST: u8 = 20;
pub const MESSAGE_TYPE_BARRIER_REPLY: u8 = 21;
pub const MESSAGE_TYPE_QUEUE_GET_CONFIG_REQUEST: u8 = 22;
pub const MESSAGE_TYPE_QUEUE_GET_CONFIG_REPLY: u8 = 23;
pub const MESSAGE_TYPE_METER_MOD: u8 = 29;

pub const MULTIPART_TYPE_TABLE_FEATURES: u16 = 12;
pub const MULTIPART_FLAG_MORE: u16 = 1;

// Action types
pub const ACTION_HEADER_SIZE: usize = 4;
pub const ACTION_TYPE_OUTPUT: u16 = 0;
pub const ACTION_TYPE_COPY_TTL_OUT: u16 = 11;
pub const ACTION_TYPE_COPY_TTL_IN: u16 = 12;
pub const ACTION_TYPE_SET_MPLS_TTL: u16 = 15;
pub const ACTION_TYPE_DEC_MPLS_TTL: u16 = 16;
pub const ACTION_TYPE_PUSH_VLAN: u16 = 17;
pub const ACTION_TYPE_POP_VLAN: u16 = 18;
pub const ACTION_TYPE_PUSH_MPLS: u16 = 19;
pub const ACTION_TYPE_POP_MPLS: u16 = 20;
pub const ACTION_TYPE_SET_QUEUE: u16 = 21;
pub const ACTION_TYPE_GROUP: u16 = 22;
pub const ACTION_TYPE_SET_NW_TTL: u16 = 23;
pub const ACTION_TYPE_DEC_NW_TTL: u16 = 24;
pub const ACTION_TYPE_SET_FIELD: u16 = 25;
pub const ACTION_TYPE_PUSH_PBB: u16 = 26;
pub const ACTION_TYPE_POP_PBB: u16 = 27;
pub const ACTION_TYPE_EXPERIMENTER: u16 = 0xffff;

// Instruction types
pub const INSTRUCTION_HEADER_SIZE: usize = 4;
pub const INSTRUCTION_TYPE_GOTO_TABLE: u16 = 1;
pub const INSTRUCTION_TYPE_WRITE_METADATA: u16 = 2;
pub const INSTRUCTION_TYPE_WRITE_ACTIONS: u16 = 3;
pub const INSTRUCTION_TYPE_APPLY_ACTIONS: u16 = 4;
pub const INSTRUCTION_TYPE_CLEAR_ACTIONS: u16 = 5;
pub const INSTRUCTION_TYPE_METER: u16 = 6;
pub const INSTRUCTION_TYPE_EXPERIMENTER: u16 = 0xffff;

// Match structure and OXM fields
pub const MATCH_TYPE_STANDARD: u16 = 0;
pub const MATCH_TYPE_OXM: u16 = 1;
pub const MATCH_HEADER_SIZE: usize = 4;
pub const OXM_HEADER_SIZE: usize = 4;
pub const OXM_CLASS_NXM_0: u16 = 0x0000;
pub const OXM_CLASS_NXM_1: u16 = 0x0001;
pub const OXM_CLASS_OPENFLOW_BASIC: u16 = 0x8000;
pub const OXM_CLASS_EXPERIMENTER: u16 = 0xffff;
pub const OXM_FIELD_IN_PORT: u8 = 0;
pub const OXM_FIELD_IN_PHY_PORT: u8 = 1;
pub const OXM_FIELD_METADATA: u8 = 2;
pub const OXM_FIELD_ETH_DST: u8 = 3;
pub const OXM_FIELD_ETH_SRC: u8 = 4;
pub const OXM_FIELD_ETH_TYPE: u8 = 5;
pub const OXM_FIELD_VLAN_VID: u8 = 6;
pub const OXM_FIELD_VLAN_PCP: u8 = 7;
pub const OXM_FIELD_IP_DSCP: u8 = 8;
pub const OXM_FIELD_IP_ECN: u8 = 9;
pub const OXM_FIELD_IP_PROTO: u8 = 10;
pub const OXM_FIELD_IPV4_SRC: u8 = 11;
pub const OXM_FIELD_IPV4_DST: u8 = 12;
pub const OXM_FIELD_TCP_SRC: u8 = 13;
pub const OXM_FIELD_TCP_DST: u8 = 14;
pub const OXM_FIELD_UDP_SRC: u8 = 15;
pub const OXM_FIELD_UDP_DST: u8 = 16;
pub const OFPVID_PRESENT: u16 = 0x1000;
pub const OFPVID_MAX: u16 = 0x1fff;
pub const VLAN_PCP_MAX: u8 = 7;
pub const IP_DSCP_MAX: u8 = 63;

// Queue properties
pub const QUEUE_PROPERTY_HEADER_SIZE: usize = 8;
pub const QUEUE_PROPERTY_MIN_RATE: u16 = 1;
pub const QUEUE_PROPERTY_MAX_RATE: u16 = 2;
pub const QUEUE_PROPERTY_EXPERIMENTER: u16 = 0xffff;
/// Rates above this value (per mille) mean the rate is disabled.
pub const QUEUE_RATE_MAX: u16 = 1000;
pub const QUEUE_RATE_UNCONFIGURED: u16 = 0xffff;
pub const PACKET_QUEUE_HEADER_SIZE: usize = 16;
pub const OFPQ_ALL: u32 = 0xffff_ffff;

// Meter bands
pub const METER_BAND_HEADER_SIZE: usize = 12;
pub const METER_BAND_TYPE_DROP: u16 = 1;
pub const METER_BAND_TYPE_DSCP_REMARK: u16 = 2;
pub const METER_BAND_TYPE_EXPERIMENTER: u16 = 0xffff;
pub const METER_COMMAND_ADD: u16 = 0;
pub const METER_COMMAND_MODIFY: u16 = 1;
pub const METER_COMMAND_DELETE: u16 = 2;

// Table feature properties
pub const TABLE_FEATURE_PROPERTY_HEADER_SIZE: usize = 4;
pub const TABLE_FEATURE_PROPERTY_INSTRUCTIONS: u16 = 0;
pub const TABLE_FEATURE_PROPERTY_INSTRUCTIONS_MISS: u16 = 1;
pub const TABLE_FEATURE_PROPERTY_NEXT_TABLES: u16 = 2;
pub const TABLE_FEATURE_PROPERTY_NEXT_TABLES_MISS: u16 = 3;
pub const TABLE_FEATURE_PROPERTY_WRITE_ACTIONS: u16 = 4;
pub const TABLE_FEATURE_PROPERTY_WRITE_ACTIONS_MISS: u16 = 5;
pub const TABLE_FEATURE_PROPERTY_APPLY_ACTIONS: u16 = 6;
pub const TABLE_FEATURE_PROPERTY_APPLY_ACTIONS_MISS: u16 = 7;
pub const TABLE_FEATURE_PROPERTY_MATCH: u16 = 8;
pub const TABLE_FEATURE_PROPERTY_WILDCARDS: u16 = 10;
pub const TABLE_FEATURE_PROPERTY_WRITE_SETFIELD: u16 = 12;
pub const TABLE_FEATURE_PROPERTY_WRITE_SETFIELD_MISS: u16 = 13;
pub const TABLE_FEATURE_PROPERTY_APPLY_SETFIELD: u16 = 14;
pub const TABLE_FEATURE_PROPERTY_APPLY_SETFIELD_MISS: u16 = 15;
pub const TABLE_FEATURE_PROPERTY_EXPERIMENTER: u16 = 0xfffe;
pub const TABLE_FEATURE_PROPERTY_EXPERIMENTER_MISS: u16 = 0xffff;
pub const TABLE_FEATURES_HEADER_SIZE: usize = 64;
pub const MAX_TABLE_NAME_LEN: usize = 32;

// Hello elements
pub const HELLO_ELEMENT_HEADER_SIZE: usize = 4;
pub const HELLO_ELEMENT_VERSION_BITMAP: u16 = 1;

// Reserved port numbers
pub const OFPP_MAX: u32 = 0xffff_ff00;
pub const OFPP_IN_PORT: u32 = 0xffff_fff8;
pub const OFPP_TABLE: u32 = 0xffff_fff9;
pub const OFPP_NORMAL: u32 = 0xffff_fffa;
pub const OFPP_FLOOD: u32 = 0xffff_fffb;
pub const OFPP_ALL: u32 = 0xffff_fffc;
pub const OFPP_CONTROLLER: u32 = 0xffff_fffd;
pub const OFPP_LOCAL: u32 = 0xffff_fffe;
pub const OFPP_ANY: u32 = 0xffff_ffff;

/// `max_len` asking the switch to send the whole packet to the controller.
pub const OFPCML_NO_BUFFER: u16 = 0xffff;
pub const OFPCML_MAX: u16 = 0xffe5;
pub const OFP_NO_BUFFER: u32 = 0xffff_ffff;

// Groups, meters and tables
pub const OFPG_MAX: u32 = 0xffff_ff00;
pub const OFPG_ALL: u32 = 0xffff_fffc;
pub const OFPG_ANY: u32 = 0xffff_ffff;
pub const OFPM_MAX: u32 = 0xffff_0000;
pub const OFPM_SLOWPATH: u32 = 0xffff_fffd;
pub const OFPM_CONTROLLER: u32 = 0xffff_fffe;
pub const OFPM_ALL: u32 = 0xffff_ffff;
pub const OFPTT_MAX: u8 = 0xfe;
pub const OFPTT_ALL: u8 = 0xff;

// Flow mod
pub const FLOW_MOD_FIXED_SIZE: usize = 48;
pub const FLOW_MOD_COMMAND_ADD: u8 = 0;
pub const FLOW_MOD_COMMAND_MODIFY: u8 = 1;
pub const FLOW_MOD_COMMAND_MODIFY_STRICT: u8 = 2;
pub const FLOW_MOD_COMMAND_DELETE: u8 = 3;
pub const FLOW_MOD_COMMAND_DELETE_STRICT: u8 = 4;
pub const PACKET_OUT_FIXED_SIZE: usize = 24;

// Error types
pub const ERROR_TYPE_HELLO_FAILED: u16 = 0;
pub const ERROR_TYPE_BAD_REQUEST: u16 = 1;
pub const ERROR_TYPE_BAD_ACTION: u16 = 2;
pub const ERROR_TYPE_BAD_INSTRUCTION: u16 = 3;
pub const ERROR_TYPE_BAD_MATCH: u16 = 4;
pub const ERROR_TYPE_FLOW_MOD_FAILED: u16 = 5;
pub const ERROR_TYPE_GROUP_MOD_FAILED: u16 = 6;
pub const ERROR_TYPE_PORT_MOD_FAILED: u16 = 7;
pub const ERROR_TYPE_TABLE_MOD_FAILED: u16 = 8;
pub const ERROR_TYPE_QUEUE_OP_FAILED: u16 = 9;
pub const ERROR_TYPE_SWITCH_CONFIG_FAILED: u16 = 10;
pub const ERROR_TYPE_ROLE_REQUEST_FAILED: u16 = 11;
pub const ERROR_TYPE_METER_MOD_FAILED: u16 = 12;
pub const ERROR_TYPE_TABLE_FEATURES_FAILED: u16 = 13;
pub const ERROR_TYPE_EXPERIMENTER: u16 = 0xffff;

// Error codes used by the codec when it classifies its own failures
pub const BAD_REQUEST_BAD_VERSION: u16 = 0;
pub const BAD_REQUEST_BAD_TYPE: u16 = 1;
pub const BAD_REQUEST_BAD_MULTIPART: u16 = 2;
pub const BAD_REQUEST_BAD_LEN: u16 = 6;
pub const BAD_REQUEST_BAD_TABLE_ID: u16 = 9;
pub const BAD_REQUEST_BAD_PORT: u16 = 11;
pub const BAD_ACTION_BAD_TYPE: u16 = 0;
pub const BAD_ACTION_BAD_LEN: u16 = 1;
pub const BAD_ACTION_BAD_OUT_PORT: u16 = 4;
pub const BAD_ACTION_BAD_ARGUMENT: u16 = 5;
pub const BAD_ACTION_TOO_MANY: u16 = 7;
pub const BAD_ACTION_BAD_OUT_GROUP: u16 = 9;
pub const BAD_ACTION_BAD_SET_TYPE: u16 = 13;
pub const BAD_ACTION_BAD_SET_ARGUMENT: u16 = 15;
pub const BAD_INSTRUCTION_UNKNOWN_INST: u16 = 0;
pub const BAD_INSTRUCTION_UNSUP_INST: u16 = 1;
pub const BAD_INSTRUCTION_BAD_TABLE_ID: u16 = 2;
pub const BAD_INSTRUCTION_UNSUP_METADATA_MASK: u16 = 4;
pub const BAD_INSTRUCTION_BAD_LEN: u16 = 7;
pub const BAD_MATCH_BAD_TYPE: u16 = 0;
pub const BAD_MATCH_BAD_LEN: u16 = 1;
pub const BAD_MATCH_BAD_WILDCARDS: u16 = 5;
pub const BAD_MATCH_BAD_FIELD: u16 = 6;
pub const BAD_MATCH_BAD_VALUE: u16 = 7;
pub const BAD_MATCH_DUP_FIELD: u16 = 10;
pub const FLOW_MOD_FAILED_BAD_TABLE_ID: u16 = 2;
pub const FLOW_MOD_FAILED_BAD_COMMAND: u16 = 6;
pub const METER_MOD_FAILED_INVALID_METER: u16 = 2;
pub const METER_MOD_FAILED_BAD_COMMAND: u16 = 4;
pub const METER_MOD_FAILED_BAD_RATE: u16 = 6;
pub const METER_MOD_FAILED_BAD_BAND: u16 = 8;
pub const METER_MOD_FAILED_BAD_BAND_VALUE: u16 = 9;
pub const QUEUE_OP_FAILED_BAD_PORT: u16 = 0;
pub const QUEUE_OP_FAILED_BAD_QUEUE: u16 = 1;
pub const TABLE_FEATURES_FAILED_BAD_TABLE: u16 = 0;
pub const TABLE_FEATURES_FAILED_BAD_TYPE: u16 = 2;
pub const TABLE_FEATURES_FAILED_BAD_LEN: u16 = 3;
pub const TABLE_FEATURES_FAILED_BAD_ARGUMENT: u16 = 4;
pub const HELLO_FAILED_INCOMPATIBLE: u16 = 0;

/// First error category reserved to this library; protocol error types are `u16` so every
/// value from here on is disjoint from them.
pub const LIBRARY_ERROR_CATEGORY_BASE: u32 = 0x0001_0000;
pub const LIBRARY_ERROR_BAD_WIRE_VALUE: u32 = LIBRARY_ERROR_CATEGORY_BASE;
pub const LIBRARY_ERROR_BAD_QUEUE_PROPERTY: u32 = LIBRARY_ERROR_CATEGORY_BASE + 1;
pub const LIBRARY_ERROR_BAD_HELLO_ELEMENT: u32 = LIBRARY_ERROR_CATEGORY_BASE + 2;
pub const LIBRARY_CODE_BAD_LENGTH: u16 = 0;
pub const LIBRARY_CODE_BAD_TYPE: u16 = 1;
pub const LIBRARY_CODE_BAD_VALUE: u16 = 2;

/// Data carried by an error message is truncated to this many bytes of the offending request.
pub const ERROR_DATA_MAX_LEN: usize = 64;
