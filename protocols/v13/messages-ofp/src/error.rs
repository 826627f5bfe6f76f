use binary_ofp::{ErrorCode, ErrorType};
use const_ofp::BAD_REQUEST_BAD_TYPE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// The message type has no decoder.
    UnexpectedMessage(u8),
    Codec(binary_ofp::Error),
}

impl MessageError {
    /// The error code a switch would answer with.
    pub fn code(&self) -> ErrorCode {
        match self {
            MessageError::UnexpectedMessage(_) => {
                ErrorCode::protocol(ErrorType::BadRequest, BAD_REQUEST_BAD_TYPE)
            }
            MessageError::Codec(e) => e.code(),
        }
    }
}

impl From<binary_ofp::Error> for MessageError {
    fn from(e: binary_ofp::Error) -> Self {
        MessageError::Codec(e)
    }
}

impl std::fmt::Display for MessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageError::UnexpectedMessage(msg_type) => {
                write!(f, "Unexpected message type: {msg_type}")
            }
            MessageError::Codec(e) => write!(f, "Codec error: {e}"),
        }
    }
}

impl std::error::Error for MessageError {}
