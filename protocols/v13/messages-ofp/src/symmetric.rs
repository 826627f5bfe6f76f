//! Messages either side may send: hello, error, echo, and the small controller requests whose
//! bodies are empty.

use binary_ofp::{
    render, Decoder, Encoder, Error, ErrorCode, ErrorType, LibraryCategory, LibraryCode, Member,
    Validator, WireValue,
};
use const_ofp::*;
use properties_ofp::{AnyHelloElement, HelloElementList, VersionBitmap};

use crate::error::MessageError;
use crate::header::{
    check_message_length, read_message_header, within_message, write_message_header, Messages,
    XidFactory,
};

macro_rules! empty_message {
    ($(#[$doc:meta])* $name:ident = $tag:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            pub xid: u32,
        }

        impl Member for $name {
            type Category = Messages;
            const TAG: u8 = $tag;
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 = OFP_HEADER_SIZE as u16;
            const FIXED_LENGTH: bool = true;

            fn wire_length(&self) -> usize {
                OFP_HEADER_SIZE
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                write_message_header(dst, self, self.xid);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                let header = read_message_header::<Self>(src)?;
                Ok(Self { xid: header.xid })
            }
        }
    };
}

empty_message!(
    /// Asks the switch for its datapath id and capabilities.
    FeaturesRequest = MESSAGE_TYPE_FEATURES_REQUEST
);
empty_message!(BarrierRequest = MESSAGE_TYPE_BARRIER_REQUEST);
empty_message!(
    /// Sent once every message received before the matching request has been processed.
    BarrierReply = MESSAGE_TYPE_BARRIER_REPLY
);

impl FeaturesRequest {
    pub fn new(xids: &XidFactory) -> Self {
        Self { xid: xids.next() }
    }
}

impl BarrierRequest {
    pub fn new(xids: &XidFactory) -> Self {
        Self { xid: xids.next() }
    }
}

impl BarrierReply {
    pub fn to(request: &BarrierRequest) -> Self {
        Self { xid: request.xid }
    }
}

macro_rules! echo_message {
    ($name:ident = $tag:expr) => {
        /// Liveness check. The payload is arbitrary and echoed back.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub xid: u32,
            pub data: Vec<u8>,
        }

        impl Member for $name {
            type Category = Messages;
            const TAG: u8 = $tag;
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 = OFP_HEADER_SIZE as u16;
            const FIXED_LENGTH: bool = false;

            fn wire_length(&self) -> usize {
                OFP_HEADER_SIZE + self.data.len()
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                write_message_header(dst, self, self.xid);
                dst.put_slice(&self.data);
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                let header = read_message_header::<Self>(src)?;
                Ok(Self {
                    xid: header.xid,
                    data: src.read_bytes(header.body_len())?.to_vec(),
                })
            }

            fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
                check_message_length(self)
            }
        }
    };
}

echo_message!(EchoRequest = MESSAGE_TYPE_ECHO_REQUEST);
echo_message!(EchoReply = MESSAGE_TYPE_ECHO_REPLY);

impl EchoRequest {
    pub fn new(xids: &XidFactory, data: &[u8]) -> Self {
        Self {
            xid: xids.next(),
            data: data.to_vec(),
        }
    }
}

impl EchoReply {
    pub fn to(request: &EchoRequest) -> Self {
        Self {
            xid: request.xid,
            data: request.data.clone(),
        }
    }
}

/// First message on a connection. Elements advertise what the sender supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hello {
    pub xid: u32,
    pub elements: HelloElementList,
}

impl Hello {
    pub fn new(xids: &XidFactory, elements: HelloElementList) -> Self {
        Self {
            xid: xids.next(),
            elements,
        }
    }

    /// A hello with a single version bitmap element.
    pub fn with_versions(xids: &XidFactory, versions: &[u8]) -> Self {
        let mut elements = HelloElementList::new();
        elements.push(VersionBitmap::from_versions(versions));
        Self::new(xids, elements)
    }

    pub fn version_bitmap(&self) -> Option<&VersionBitmap> {
        self.elements.iter().find_map(|e| match e {
            AnyHelloElement::VersionBitmap(v) => Some(v),
            _ => None,
        })
    }

    /// Version both sides speak. Without bitmaps on both sides the highest version each side
    /// announced in its header would be used, which for this library is always its own.
    pub fn negotiate(&self, peer: &Hello) -> Option<u8> {
        match (self.version_bitmap(), peer.version_bitmap()) {
            (Some(ours), Some(theirs)) => ours.highest_common(theirs),
            _ => Some(OFP_VERSION),
        }
    }
}

impl Member for Hello {
    type Category = Messages;
    const TAG: u8 = MESSAGE_TYPE_HELLO;
}

impl WireValue for Hello {
    const MIN_LENGTH: u16 = OFP_HEADER_SIZE as u16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        self.elements.total_wire_length(OFP_HEADER_SIZE)
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_message_header(dst, self, self.xid);
        self.elements.encode(dst);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let header = read_message_header::<Self>(src)?;
        Ok(Self {
            xid: header.xid,
            elements: HelloElementList::decode_bounded(src, header.body_len())?,
        })
    }

    fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
        check_message_length(self)?;
        validator.nested(&self.elements)
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.xid == other.xid && self.elements.equivalent(&other.elements)
    }
}

/// Reports a failed request. `data` holds the start of the offending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMsg {
    pub xid: u32,
    pub error_type: u16,
    pub code: u16,
    pub data: Vec<u8>,
}

impl ErrorMsg {
    pub fn new(xid: u32, error_type: ErrorType, code: u16, data: &[u8]) -> Self {
        Self {
            xid,
            error_type: error_type as u16,
            code,
            data: data.to_vec(),
        }
    }

    /// The reply to the raw `request` that failed with `error`. The reply carries the xid of
    /// the request and at most [`ERROR_DATA_MAX_LEN`] bytes of it.
    ///
    /// Library codes have no wire representation: hello element faults are sent as
    /// `HELLO_FAILED`/`INCOMPATIBLE`, every other library code as `BAD_REQUEST` with
    /// `BAD_TYPE` or `BAD_LEN`.
    pub fn from_error(error: &MessageError, request: &[u8]) -> Self {
        let xid = Decoder::new(request).peek_u32_at(4).unwrap_or(0);
        let (error_type, code) = wire_code(error.code());
        let data = &request[..request.len().min(ERROR_DATA_MAX_LEN)];
        Self::new(xid, error_type, code, data)
    }

    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::new(self.error_type as u32, self.code)
    }

    /// `TYPE.CODE` as text.
    pub fn describe(&self) -> String {
        render(self.error_code(), "")
    }
}

fn wire_code(code: ErrorCode) -> (ErrorType, u16) {
    if let Some(error_type) = code.error_type() {
        return (error_type, code.sub_code());
    }
    let library = LibraryCategory::try_from(code.category()).ok();
    let library_code = LibraryCode::try_from(code.sub_code()).ok();
    match (library, library_code) {
        (Some(LibraryCategory::BadHelloElement), _) => {
            (ErrorType::HelloFailed, HELLO_FAILED_INCOMPATIBLE)
        }
        (_, Some(LibraryCode::BadType)) => (ErrorType::BadRequest, BAD_REQUEST_BAD_TYPE),
        _ => (ErrorType::BadRequest, BAD_REQUEST_BAD_LEN),
    }
}

impl Member for ErrorMsg {
    type Category = Messages;
    const TAG: u8 = MESSAGE_TYPE_ERROR;
}

impl WireValue for ErrorMsg {
    const MIN_LENGTH: u16 = 12;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        12 + self.data.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_message_header(dst, self, self.xid);
        dst.put_u16(self.error_type);
        dst.put_u16(self.code);
        dst.put_slice(&self.data);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let header = read_message_header::<Self>(src)?;
        Ok(Self {
            xid: header.xid,
            error_type: src.read_u16()?,
            code: src.read_u16()?,
            data: src.read_bytes(header.body_len() - 4)?.to_vec(),
        })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        check_message_length(self)?;
        let known = ErrorType::try_from(self.error_type).is_ok();
        within_message::<Self>(if known {
            Ok(())
        } else {
            Err(Error::invalid(BAD_REQUEST_BAD_TYPE, "unknown error type"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnyMessage;
    use binary_ofp::{CategoryId, Recursive, Shallow, Variant};
    use properties_ofp::UnknownElement;

    #[test]
    fn test_echo_reply_copies_request() {
        let xids = XidFactory::starting_at(7);
        let request = EchoRequest::new(&xids, b"ping");
        let reply = EchoReply::to(&request);
        assert_eq!(reply.xid, 7);
        assert_eq!(reply.to_bytes(), vec![4, 3, 0, 12, 0, 0, 0, 7, b'p', b'i', b'n', b'g']);
        assert_eq!(EchoReply::from_bytes(&reply.to_bytes()), Ok(reply));
    }

    #[test]
    fn test_barrier_round_trip() {
        let xids = XidFactory::new();
        let request = BarrierRequest::new(&xids);
        let bytes = request.to_bytes();
        assert_eq!(bytes, vec![4, 20, 0, 8, 0, 0, 0, 1]);
        let message = AnyMessage::from_bytes(&bytes).unwrap();
        assert_eq!(message.xid(), 1);
        assert_eq!(BarrierReply::to(&request).xid, 1);
    }

    #[test]
    fn test_fixed_message_with_body_is_bad_length() {
        let bytes = [4, 5, 0, 12, 0, 0, 0, 1, 0, 0, 0, 0];
        let err = AnyMessage::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err.code(),
            ErrorCode::protocol(ErrorType::BadRequest, BAD_REQUEST_BAD_LEN)
        );
        assert_eq!(err.category(), Some(CategoryId::Message));
    }

    #[test]
    fn test_direct_decode_checks_type() {
        let bytes = FeaturesRequest { xid: 1 }.to_bytes();
        assert!(matches!(
            BarrierRequest::from_bytes(&bytes),
            Err(Error::WrongVariant {
                expected: 20,
                actual: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_hello_with_unknown_element() {
        let xids = XidFactory::new();
        let mut hello = Hello::with_versions(&xids, &[1, 4]);
        hello.elements.push(UnknownElement::new(9, &[1, 2, 3]));
        let bytes = hello.to_bytes();
        assert_eq!(bytes.len(), 8 + 8 + 8);
        let decoded = Hello::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, hello);
        assert!(decoded.version_bitmap().unwrap().supports(OFP_VERSION));
        assert!(decoded.validate(&Recursive).is_ok());

        let peer = Hello::with_versions(&xids, &[1, 2, 3]);
        assert_eq!(hello.negotiate(&peer), Some(1));
        let bare = Hello::new(&xids, HelloElementList::new());
        assert_eq!(hello.negotiate(&bare), Some(OFP_VERSION));
    }

    #[test]
    fn test_error_reply_to_bad_request() {
        let mut request = FeaturesRequest { xid: 42 }.to_bytes();
        request[1] = 99;
        let err = AnyMessage::parse(&request).unwrap_err();
        let reply = ErrorMsg::from_error(&err, &request);
        assert_eq!(reply.xid, 42);
        assert_eq!(reply.error_type, ERROR_TYPE_BAD_REQUEST);
        assert_eq!(reply.code, BAD_REQUEST_BAD_TYPE);
        assert_eq!(reply.data, request);
        assert_eq!(reply.describe(), "BAD_REQUEST.BAD_TYPE");
        assert_eq!(ErrorMsg::from_bytes(&reply.to_bytes()), Ok(reply));
    }

    #[test]
    fn test_error_reply_data_is_capped() {
        let request = EchoRequest::new(&XidFactory::new(), &[0xab; 200]).to_bytes();
        let err = MessageError::from(Error::truncated(1, 0));
        let reply = ErrorMsg::from_error(&err, &request);
        assert_eq!(reply.data.len(), ERROR_DATA_MAX_LEN);
        assert_eq!(reply.error_type, ERROR_TYPE_BAD_REQUEST);
        assert_eq!(reply.code, BAD_REQUEST_BAD_LEN);
    }

    #[test]
    fn test_hello_element_fault_is_incompatible() {
        let xids = XidFactory::new();
        let mut bytes = Hello::with_versions(&xids, &[4]).to_bytes();
        // Version bitmap declaring 6 bytes.
        bytes[11] = 6;
        let err = AnyMessage::parse(&bytes).unwrap_err();
        let reply = ErrorMsg::from_error(&err, &bytes);
        assert_eq!(reply.error_type, ERROR_TYPE_HELLO_FAILED);
        assert_eq!(reply.code, HELLO_FAILED_INCOMPATIBLE);
    }

    #[test]
    fn test_unknown_error_type() {
        let msg = ErrorMsg {
            xid: 1,
            error_type: 0x20,
            code: 0,
            data: vec![],
        };
        assert_eq!(
            msg.validate(&Shallow).unwrap_err().code(),
            ErrorCode::protocol(ErrorType::BadRequest, BAD_REQUEST_BAD_TYPE)
        );
        assert!(AnyMessage::from(msg).is::<ErrorMsg>());
    }

    #[test]
    fn test_echo_longer_than_length_field() {
        let xids = XidFactory::new();
        let request = EchoRequest::new(&xids, &vec![0; 70_000]);
        assert_eq!(request.wire_length(), 70_008);
        let err = request.validate(&Recursive).unwrap_err();
        assert_eq!(
            err.code(),
            ErrorCode::protocol(ErrorType::BadRequest, BAD_REQUEST_BAD_LEN)
        );
        assert_eq!(err.category(), Some(CategoryId::Message));
        assert!(AnyMessage::from(request).validate(&Shallow).is_err());

        let request = EchoRequest::new(&xids, &vec![0; u16::MAX as usize - OFP_HEADER_SIZE]);
        assert_eq!(request.validate(&Recursive), Ok(()));
        assert_eq!(EchoRequest::from_bytes(&request.to_bytes()), Ok(request));
    }
}
