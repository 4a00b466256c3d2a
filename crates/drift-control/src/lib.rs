mod client;
pub use client::NativeController;

mod protocol;
pub use protocol::{ProtocolError, Response, decode_response, encode_start};
