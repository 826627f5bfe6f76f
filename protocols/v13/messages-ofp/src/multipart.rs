//! Table-features multipart messages. A request with tables sets the features of the switch, an
//! empty one only asks for them. Replies longer than one message set
//! [`MULTIPART_FLAG_MORE`] on every part but the last.

use binary_ofp::{CategoryId, Decoder, Encoder, Error, Member, Validator, WireValue};
use const_ofp::*;
use properties_ofp::TableFeatures;

use crate::header::{
    check_message_length, decode_all, read_message_header, write_message_header, Messages,
    XidFactory,
};

const MULTIPART_FIXED_SIZE: usize = 16;

macro_rules! table_features_message {
    ($(#[$doc:meta])* $name:ident = $tag:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub xid: u32,
            pub flags: u16,
            pub pad: [u8; 4],
            pub tables: Vec<TableFeatures>,
        }

        impl $name {
            pub fn has_more(&self) -> bool {
                self.flags & MULTIPART_FLAG_MORE != 0
            }

            fn decode_inner(src: &mut Decoder<'_>) -> Result<Self, Error> {
                let header = read_message_header::<Self>(src)?;
                let mut body = src.take(header.body_len())?;
                if body.read_u16()? != MULTIPART_TYPE_TABLE_FEATURES {
                    return Err(Error::invalid(
                        BAD_REQUEST_BAD_MULTIPART,
                        "unsupported multipart type",
                    ));
                }
                let flags = body.read_u16()?;
                let pad = body.read_array()?;
                Ok(Self {
                    xid: header.xid,
                    flags,
                    pad,
                    tables: decode_all(&mut body)?,
                })
            }
        }

        impl Member for $name {
            type Category = Messages;
            const TAG: u8 = $tag;
        }

        impl WireValue for $name {
            const MIN_LENGTH: u16 = MULTIPART_FIXED_SIZE as u16;
            const FIXED_LENGTH: bool = false;

            fn wire_length(&self) -> usize {
                MULTIPART_FIXED_SIZE + self.tables.iter().map(|t| t.wire_length()).sum::<usize>()
            }

            fn encode(&self, dst: &mut Vec<u8>) {
                write_message_header(dst, self, self.xid);
                dst.put_u16(MULTIPART_TYPE_TABLE_FEATURES);
                dst.put_u16(self.flags);
                dst.put_slice(&self.pad);
                for table in &self.tables {
                    table.encode(dst);
                }
            }

            fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
                Self::decode_inner(src).map_err(|e| e.within(CategoryId::Message, $tag as u64))
            }

            fn validate<V: Validator>(&self, validator: &V) -> Result<(), Error> {
                check_message_length(self)?;
                self.tables.iter().try_for_each(|t| validator.nested(t))
            }

            /// Tables compare in order, each as [`TableFeatures::equivalent`] does.
            fn equivalent(&self, other: &Self) -> bool {
                self.xid == other.xid
                    && self.flags == other.flags
                    && self.tables.len() == other.tables.len()
                    && self
                        .tables
                        .iter()
                        .zip(&other.tables)
                        .all(|(a, b)| a.equivalent(b))
            }
        }
    };
}

table_features_message!(TableFeaturesRequest = MESSAGE_TYPE_MULTIPART_REQUEST);
table_features_message!(TableFeaturesReply = MESSAGE_TYPE_MULTIPART_REPLY);

impl TableFeaturesRequest {
    /// Sets the tables of the switch to `tables`. With no tables, asks for the current ones.
    pub fn new(xids: &XidFactory, tables: Vec<TableFeatures>) -> Self {
        Self {
            xid: xids.next(),
            flags: 0,
            pad: [0; 4],
            tables,
        }
    }
}

impl TableFeaturesReply {
    /// One part of the reply to `request`. `more` is set on every part but the last.
    pub fn to(request: &TableFeaturesRequest, tables: Vec<TableFeatures>, more: bool) -> Self {
        Self {
            xid: request.xid,
            flags: if more { MULTIPART_FLAG_MORE } else { 0 },
            pad: [0; 4],
            tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnyMessage;
    use binary_ofp::{ErrorCode, ErrorType, Recursive, Shallow};
    use properties_ofp::table_features::NextTables;

    fn table(table_id: u8) -> TableFeatures {
        let mut table = TableFeatures::new(table_id, "acl", 1024);
        table.properties.insert(NextTables::new(vec![table_id + 1]));
        table
    }

    #[test]
    fn test_empty_request_asks_for_features() {
        let request = TableFeaturesRequest::new(&XidFactory::starting_at(2), vec![]);
        assert_eq!(
            request.to_bytes(),
            vec![4, 18, 0, 16, 0, 0, 0, 2, 0, 12, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            AnyMessage::from_bytes(&request.to_bytes()),
            Ok(AnyMessage::from(request))
        );
    }

    #[test]
    fn test_reply_parts() {
        let request = TableFeaturesRequest::new(&XidFactory::new(), vec![]);
        let first = TableFeaturesReply::to(&request, vec![table(0), table(1)], true);
        let last = TableFeaturesReply::to(&request, vec![table(2)], false);
        assert!(first.has_more());
        assert!(!last.has_more());

        let bytes = first.to_bytes();
        assert_eq!(bytes.len(), 16 + 2 * (64 + 8));
        let decoded = TableFeaturesReply::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, first);
        assert_eq!(decoded.tables[1].name_bytes(), b"acl");
        assert!(decoded.validate(&Recursive).is_ok());
    }

    #[test]
    fn test_other_multipart_type_is_bad_multipart() {
        let request = TableFeaturesRequest::new(&XidFactory::new(), vec![]);
        let mut bytes = request.to_bytes();
        // Port statistics.
        bytes[9] = 4;
        let err = AnyMessage::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err.code(),
            ErrorCode::protocol(ErrorType::BadRequest, BAD_REQUEST_BAD_MULTIPART)
        );
    }

    #[test]
    fn test_reserved_table_is_refused() {
        let request = TableFeaturesRequest::new(&XidFactory::new(), vec![table(OFPTT_ALL - 1)]);
        assert!(request.validate(&Shallow).is_ok());
        let mut request = request;
        request.tables[0].table_id = OFPTT_ALL;
        assert!(request.validate(&Shallow).is_ok());
        assert_eq!(
            request.validate(&Recursive).unwrap_err().code(),
            ErrorCode::protocol(ErrorType::TableFeaturesFailed, TABLE_FEATURES_FAILED_BAD_TABLE)
        );
    }
}
