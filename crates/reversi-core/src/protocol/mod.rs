//! Protocol module containing the message catalog and the line codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_message, encode_event, encode_move, CodecError};
pub use messages::{MessageKind, ProtocolEvent};
