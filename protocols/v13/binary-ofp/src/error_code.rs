//! Error codes exchanged with a peer and their human readable rendering.
//!
//! An [`ErrorCode`] is a `(category, sub_code)` pair. Categories up to `0xffff` are the protocol
//! error types, categories from [`LIBRARY_ERROR_CATEGORY_BASE`] on are reserved to this library
//! for conditions the protocol has no code for (a queue property that is too short, an unknown
//! hello element, ...). The two ranges never overlap.

use alloc::{format, string::String};
use core::{convert::TryFrom, fmt};

use const_ofp::*;

use crate::error::{CategoryId, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode {
    category: u32,
    sub_code: u16,
}

impl ErrorCode {
    pub const fn new(category: u32, sub_code: u16) -> Self {
        Self { category, sub_code }
    }

    pub const fn protocol(error_type: ErrorType, code: u16) -> Self {
        Self::new(error_type as u16 as u32, code)
    }

    pub const fn library(category: LibraryCategory, code: LibraryCode) -> Self {
        Self::new(category as u32, code as u16)
    }

    pub fn category(&self) -> u32 {
        self.category
    }

    pub fn sub_code(&self) -> u16 {
        self.sub_code
    }

    pub fn is_protocol(&self) -> bool {
        self.category <= u16::MAX as u32
    }

    pub fn is_library(&self) -> bool {
        self.category >= LIBRARY_ERROR_CATEGORY_BASE
    }

    /// The protocol error type, `None` for library codes.
    pub fn error_type(&self) -> Option<ErrorType> {
        if self.is_protocol() {
            ErrorType::try_from(self.category as u16).ok()
        } else {
            None
        }
    }

    pub fn category_name(&self) -> Option<&'static str> {
        if let Some(t) = self.error_type() {
            return Some(t.name());
        }
        LibraryCategory::try_from(self.category)
            .ok()
            .map(|c| c.name())
    }

    pub fn sub_code_name(&self) -> Option<&'static str> {
        if let Some(t) = self.error_type() {
            return protocol_code_name(t, self.sub_code);
        }
        match LibraryCategory::try_from(self.category) {
            Ok(_) => LibraryCode::try_from(self.sub_code).ok().map(|c| c.name()),
            Err(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category_name() {
            Some(name) => f.write_str(name)?,
            None => write!(f, "0x{:x}", self.category)?,
        }
        match self.sub_code_name() {
            Some(name) => write!(f, ".{}", name),
            None => write!(f, ".0x{:x}", self.sub_code),
        }
    }
}

/// Renders `code` for humans, optionally followed by what the caller was doing.
pub fn render(code: ErrorCode, context: &str) -> String {
    if context.is_empty() {
        format!("{}", code)
    } else {
        format!("{}: {}", code, context)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorType {
    HelloFailed = ERROR_TYPE_HELLO_FAILED,
    BadRequest = ERROR_TYPE_BAD_REQUEST,
    BadAction = ERROR_TYPE_BAD_ACTION,
    BadInstruction = ERROR_TYPE_BAD_INSTRUCTION,
    BadMatch = ERROR_TYPE_BAD_MATCH,
    FlowModFailed = ERROR_TYPE_FLOW_MOD_FAILED,
    GroupModFailed = ERROR_TYPE_GROUP_MOD_FAILED,
    PortModFailed = ERROR_TYPE_PORT_MOD_FAILED,
    TableModFailed = ERROR_TYPE_TABLE_MOD_FAILED,
    QueueOpFailed = ERROR_TYPE_QUEUE_OP_FAILED,
    SwitchConfigFailed = ERROR_TYPE_SWITCH_CONFIG_FAILED,
    RoleRequestFailed = ERROR_TYPE_ROLE_REQUEST_FAILED,
    MeterModFailed = ERROR_TYPE_METER_MOD_FAILED,
    TableFeaturesFailed = ERROR_TYPE_TABLE_FEATURES_FAILED,
    Experimenter = ERROR_TYPE_EXPERIMENTER,
}

impl ErrorType {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorType::HelloFailed => "HELLO_FAILED",
            ErrorType::BadRequest => "BAD_REQUEST",
            ErrorType::BadAction => "BAD_ACTION",
            ErrorType::BadInstruction => "BAD_INSTRUCTION",
            ErrorType::BadMatch => "BAD_MATCH",
            ErrorType::FlowModFailed => "FLOW_MOD_FAILED",
            ErrorType::GroupModFailed => "GROUP_MOD_FAILED",
            ErrorType::PortModFailed => "PORT_MOD_FAILED",
            ErrorType::TableModFailed => "TABLE_MOD_FAILED",
            ErrorType::QueueOpFailed => "QUEUE_OP_FAILED",
            ErrorType::SwitchConfigFailed => "SWITCH_CONFIG_FAILED",
            ErrorType::RoleRequestFailed => "ROLE_REQUEST_FAILED",
            ErrorType::MeterModFailed => "METER_MOD_FAILED",
            ErrorType::TableFeaturesFailed => "TABLE_FEATURES_FAILED",
            ErrorType::Experimenter => "EXPERIMENTER",
        }
    }
}

impl TryFrom<u16> for ErrorType {
    type Error = u16;

    fn try_from(v: u16) -> Result<ErrorType, u16> {
        match v {
            ERROR_TYPE_HELLO_FAILED => Ok(ErrorType::HelloFailed),
            ERROR_TYPE_BAD_REQUEST => Ok(ErrorType::BadRequest),
            ERROR_TYPE_BAD_ACTION => Ok(ErrorType::BadAction),
            ERROR_TYPE_BAD_INSTRUCTION => Ok(ErrorType::BadInstruction),
            ERROR_TYPE_BAD_MATCH => Ok(ErrorType::BadMatch),
            ERROR_TYPE_FLOW_MOD_FAILED => Ok(ErrorType::FlowModFailed),
            ERROR_TYPE_GROUP_MOD_FAILED => Ok(ErrorType::GroupModFailed),
            ERROR_TYPE_PORT_MOD_FAILED => Ok(ErrorType::PortModFailed),
            ERROR_TYPE_TABLE_MOD_FAILED => Ok(ErrorType::TableModFailed),
            ERROR_TYPE_QUEUE_OP_FAILED => Ok(ErrorType::QueueOpFailed),
            ERROR_TYPE_SWITCH_CONFIG_FAILED => Ok(ErrorType::SwitchConfigFailed),
            ERROR_TYPE_ROLE_REQUEST_FAILED => Ok(ErrorType::RoleRequestFailed),
            ERROR_TYPE_METER_MOD_FAILED => Ok(ErrorType::MeterModFailed),
            ERROR_TYPE_TABLE_FEATURES_FAILED => Ok(ErrorType::TableFeaturesFailed),
            ERROR_TYPE_EXPERIMENTER => Ok(ErrorType::Experimenter),
            v => Err(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LibraryCategory {
    BadWireValue = LIBRARY_ERROR_BAD_WIRE_VALUE,
    BadQueueProperty = LIBRARY_ERROR_BAD_QUEUE_PROPERTY,
    BadHelloElement = LIBRARY_ERROR_BAD_HELLO_ELEMENT,
}

impl LibraryCategory {
    pub fn name(&self) -> &'static str {
        match self {
            LibraryCategory::BadWireValue => "BadWireValue",
            LibraryCategory::BadQueueProperty => "BadQueueProperty",
            LibraryCategory::BadHelloElement => "BadHelloElement",
        }
    }
}

impl TryFrom<u32> for LibraryCategory {
    type Error = u32;

    fn try_from(v: u32) -> Result<LibraryCategory, u32> {
        match v {
            LIBRARY_ERROR_BAD_WIRE_VALUE => Ok(LibraryCategory::BadWireValue),
            LIBRARY_ERROR_BAD_QUEUE_PROPERTY => Ok(LibraryCategory::BadQueueProperty),
            LIBRARY_ERROR_BAD_HELLO_ELEMENT => Ok(LibraryCategory::BadHelloElement),
            v => Err(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum LibraryCode {
    BadLength = LIBRARY_CODE_BAD_LENGTH,
    BadType = LIBRARY_CODE_BAD_TYPE,
    BadValue = LIBRARY_CODE_BAD_VALUE,
}

impl LibraryCode {
    pub fn name(&self) -> &'static str {
        match self {
            LibraryCode::BadLength => "BadLength",
            LibraryCode::BadType => "BadType",
            LibraryCode::BadValue => "BadValue",
        }
    }
}

impl TryFrom<u16> for LibraryCode {
    type Error = u16;

    fn try_from(v: u16) -> Result<LibraryCode, u16> {
        match v {
            LIBRARY_CODE_BAD_LENGTH => Ok(LibraryCode::BadLength),
            LIBRARY_CODE_BAD_TYPE => Ok(LibraryCode::BadType),
            LIBRARY_CODE_BAD_VALUE => Ok(LibraryCode::BadValue),
            v => Err(v),
        }
    }
}

fn protocol_code_name(error_type: ErrorType, code: u16) -> Option<&'static str> {
    let names: &[&'static str] = match error_type {
        ErrorType::HelloFailed => &["INCOMPATIBLE", "EPERM"],
        ErrorType::BadRequest => &[
            "BAD_VERSION",
            "BAD_TYPE",
            "BAD_MULTIPART",
            "BAD_EXPERIMENTER",
            "BAD_EXP_TYPE",
            "EPERM",
            "BAD_LEN",
            "BUFFER_EMPTY",
            "BUFFER_UNKNOWN",
            "BAD_TABLE_ID",
            "IS_SLAVE",
            "BAD_PORT",
            "BAD_PACKET",
            "MULTIPART_BUFFER_OVERFLOW",
        ],
        ErrorType::BadAction => &[
            "BAD_TYPE",
            "BAD_LEN",
            "BAD_EXPERIMENTER",
            "BAD_EXP_TYPE",
            "BAD_OUT_PORT",
            "BAD_ARGUMENT",
            "EPERM",
            "TOO_MANY",
            "BAD_QUEUE",
            "BAD_OUT_GROUP",
            "MATCH_INCONSISTENT",
            "UNSUPPORTED_ORDER",
            "BAD_TAG",
            "BAD_SET_TYPE",
            "BAD_SET_LEN",
            "BAD_SET_ARGUMENT",
        ],
        ErrorType::BadInstruction => &[
            "UNKNOWN_INST",
            "UNSUP_INST",
            "BAD_TABLE_ID",
            "UNSUP_METADATA",
            "UNSUP_METADATA_MASK",
            "BAD_EXPERIMENTER",
            "BAD_EXP_TYPE",
            "BAD_LEN",
            "EPERM",
        ],
        ErrorType::BadMatch => &[
            "BAD_TYPE",
            "BAD_LEN",
            "BAD_TAG",
            "BAD_DL_ADDR_MASK",
            "BAD_NW_ADDR_MASK",
            "BAD_WILDCARDS",
            "BAD_FIELD",
            "BAD_VALUE",
            "BAD_MASK",
            "BAD_PREREQ",
            "DUP_FIELD",
            "EPERM",
        ],
        ErrorType::FlowModFailed => &[
            "UNKNOWN",
            "TABLE_FULL",
            "BAD_TABLE_ID",
            "OVERLAP",
            "EPERM",
            "BAD_TIMEOUT",
            "BAD_COMMAND",
            "BAD_FLAGS",
        ],
        ErrorType::GroupModFailed => &[
            "GROUP_EXISTS",
            "INVALID_GROUP",
            "WEIGHT_UNSUPPORTED",
            "OUT_OF_GROUPS",
            "OUT_OF_BUCKETS",
            "CHAINING_UNSUPPORTED",
            "WATCH_UNSUPPORTED",
            "LOOP",
            "UNKNOWN_GROUP",
            "CHAINED_GROUP",
            "BAD_TYPE",
            "BAD_COMMAND",
            "BAD_BUCKET",
            "BAD_WATCH",
            "EPERM",
        ],
        ErrorType::PortModFailed => &[
            "BAD_PORT",
            "BAD_HW_ADDR",
            "BAD_CONFIG",
            "BAD_ADVERTISE",
            "EPERM",
        ],
        ErrorType::TableModFailed => &["BAD_TABLE", "BAD_CONFIG", "EPERM"],
        ErrorType::QueueOpFailed => &["BAD_PORT", "BAD_QUEUE", "EPERM"],
        ErrorType::SwitchConfigFailed => &["BAD_FLAGS", "BAD_LEN", "EPERM"],
        ErrorType::RoleRequestFailed => &["STALE", "UNSUP", "BAD_ROLE"],
        ErrorType::MeterModFailed => &[
            "UNKNOWN",
            "METER_EXISTS",
            "INVALID_METER",
            "UNKNOWN_METER",
            "BAD_COMMAND",
            "BAD_FLAGS",
            "BAD_RATE",
            "BAD_BURST",
            "BAD_BAND",
            "BAD_BAND_VALUE",
            "OUT_OF_METERS",
            "OUT_OF_BANDS",
        ],
        ErrorType::TableFeaturesFailed => &[
            "BAD_TABLE",
            "BAD_METADATA",
            "BAD_TYPE",
            "BAD_LEN",
            "BAD_ARGUMENT",
            "EPERM",
        ],
        // Experimenter codes are experimenter defined.
        ErrorType::Experimenter => &[],
    };
    names.get(code as usize).copied()
}

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fault {
    Length,
    Type,
    Duplicate,
    Value(u16),
}

enum Target {
    Protocol {
        error_type: ErrorType,
        length: u16,
        kind: u16,
        duplicate: u16,
    },
    Library(LibraryCategory),
}

fn target(category: Option<CategoryId>) -> Target {
    use ErrorType::*;
    let protocol = |error_type, length, kind, duplicate| Target::Protocol {
        error_type,
        length,
        kind,
        duplicate,
    };
    match category {
        Some(CategoryId::Message) => protocol(
            BadRequest,
            BAD_REQUEST_BAD_LEN,
            BAD_REQUEST_BAD_TYPE,
            BAD_REQUEST_BAD_LEN,
        ),
        Some(CategoryId::Action) => protocol(
            BadAction,
            BAD_ACTION_BAD_LEN,
            BAD_ACTION_BAD_TYPE,
            BAD_ACTION_TOO_MANY,
        ),
        Some(CategoryId::Instruction) => protocol(
            BadInstruction,
            BAD_INSTRUCTION_BAD_LEN,
            BAD_INSTRUCTION_UNKNOWN_INST,
            BAD_INSTRUCTION_UNSUP_INST,
        ),
        Some(CategoryId::MatchField) => protocol(
            BadMatch,
            BAD_MATCH_BAD_LEN,
            BAD_MATCH_BAD_FIELD,
            BAD_MATCH_DUP_FIELD,
        ),
        Some(CategoryId::MeterBand) => protocol(
            MeterModFailed,
            METER_MOD_FAILED_BAD_BAND,
            METER_MOD_FAILED_BAD_BAND,
            METER_MOD_FAILED_BAD_BAND_VALUE,
        ),
        Some(CategoryId::TableFeatureProperty) => protocol(
            TableFeaturesFailed,
            TABLE_FEATURES_FAILED_BAD_LEN,
            TABLE_FEATURES_FAILED_BAD_TYPE,
            TABLE_FEATURES_FAILED_BAD_ARGUMENT,
        ),
        Some(CategoryId::QueueProperty) => Target::Library(LibraryCategory::BadQueueProperty),
        Some(CategoryId::HelloElement) => Target::Library(LibraryCategory::BadHelloElement),
        None => Target::Library(LibraryCategory::BadWireValue),
    }
}

/// Error type of the value faults of a message. Length and type faults of any message are
/// `BAD_REQUEST`.
fn message_error_type(message_type: u64) -> ErrorType {
    match u8::try_from(message_type) {
        Ok(MESSAGE_TYPE_HELLO) => ErrorType::HelloFailed,
        Ok(MESSAGE_TYPE_FLOW_MOD) => ErrorType::FlowModFailed,
        Ok(MESSAGE_TYPE_METER_MOD) => ErrorType::MeterModFailed,
        Ok(MESSAGE_TYPE_QUEUE_GET_CONFIG_REQUEST) | Ok(MESSAGE_TYPE_QUEUE_GET_CONFIG_REPLY) => {
            ErrorType::QueueOpFailed
        }
        _ => ErrorType::BadRequest,
    }
}

pub(crate) fn classify(context: Context, fault: Fault) -> ErrorCode {
    if let (Some(CategoryId::Message), Some(tag), Fault::Value(code)) =
        (context.category, context.tag, fault)
    {
        return ErrorCode::protocol(message_error_type(tag), code);
    }
    match target(context.category) {
        Target::Protocol {
            error_type,
            length,
            kind,
            duplicate,
        } => {
            let code = match fault {
                Fault::Length => length,
                Fault::Type => kind,
                Fault::Duplicate => duplicate,
                Fault::Value(code) => code,
            };
            ErrorCode::protocol(error_type, code)
        }
        Target::Library(library) => {
            let code = match fault {
                Fault::Length => LibraryCode::BadLength as u16,
                Fault::Type => LibraryCode::BadType as u16,
                Fault::Duplicate => LibraryCode::BadValue as u16,
                Fault::Value(code) => code,
            };
            ErrorCode::new(library as u32, code)
        }
    }
}
