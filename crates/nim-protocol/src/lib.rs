//! nim-protocol
//!
//! Wire-level encoding/decoding for the Nim server and its clients.
//!
//! - [`wire_types`] : message tags and frame sizes
//! - [`messages`]   : logical frames (`Message`, `Query`, `QueryResponse`)
//! - [`binary_codec`] : fixed-size frames to bytes and back
//! - [`frame_io`]   : reliable whole-frame send/receive over a stream
//! - [`bootstrap`]  : the `host:query_port:play_port` address record

pub mod binary_codec;
pub mod bootstrap;
pub mod frame_io;
pub mod messages;
pub mod wire_types;

pub use binary_codec::{
    decode_board, decode_message, decode_move, decode_query, decode_query_response, encode_board,
    encode_message, encode_move, encode_query, encode_query_response, ProtocolError,
};
pub use bootstrap::{BootstrapError, BootstrapRecord};
pub use frame_io::{FrameError, FrameStream};
pub use messages::{Message, Query, QueryResponse};
pub use wire_types::MessageType;
