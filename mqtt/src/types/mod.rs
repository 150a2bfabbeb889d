//! MQTT data types and representations.
//!
//! These types all map more or less to rust data types directly,
//! and exist as a bridge to the binary-level protocol.
//!
//! | MQTT type | rust type | Read with | Write with |
//! | --------- | --------- | --------- | ---------- |
//! | Byte | [u8] | [ByteCursor::read_u8] | `Vec::push` |
//! | 2 Byte Int | [u16] | [ByteCursor::read_u16] | [push_be_u16] |
//! | 4 Byte Int | [u32] | [ByteCursor::read_u32] | [push_be_u32] |
//! | Variable Byte Int | [u32] | [ByteCursor::read_variable_int] | [VariableByteInteger::encode_into] |
//! | Binary Data | `Vec<u8>` | [ByteCursor::read_binary] | [push_binary] |
//! | UTF-8 String | [String] | [ByteCursor::read_string] | [push_utf8] |
//! | UTF-8 String pair | (String, String) | two string reads | two string writes |
//!
//! # Integers
//! The simpler integer types (`u8`, `u16`, `u32`) will use whatever Endianness the platform is using, however they
//! will always be Big-Endian in their encoded form.

mod codes;
mod cursor;
mod integer;
mod qos;
mod utf8;
mod version;

pub use self::codes::ReasonCode;
pub use self::cursor::{push_be_u16, push_be_u32, push_binary, push_utf8, ByteCursor};
pub use self::integer::VariableByteInteger;
pub use self::qos::QoS;
pub use self::utf8::validate_utf8;
pub use self::version::ProtocolVersion;

/// A data type as defined in the MQTT standard.
pub trait MqttDataType {

    /// Returns the size in number of bytes that this type will use in a binary MQTT packet.
    fn encoded_len(&self) -> usize;
}

/*
  Blanket trait impls for standard rust types.
  These map to MQTT standard types `Byte`, `Two Byte Integer` and `Four Byte Integer`
 */
impl MqttDataType for u8 {
    fn encoded_len(&self) -> usize {
        1
    }
}

impl MqttDataType for u16 {
    fn encoded_len(&self) -> usize {
        2
    }
}

impl MqttDataType for u32 {
    fn encoded_len(&self) -> usize {
        4
    }
}

/// UTF-8 strings carry a two byte length prefix.
impl MqttDataType for str {
    fn encoded_len(&self) -> usize {
        self.len() + 2
    }
}

impl MqttDataType for String {
    fn encoded_len(&self) -> usize {
        self.as_str().encoded_len()
    }
}

/// Binary data carries a two byte length prefix.
impl MqttDataType for [u8] {
    fn encoded_len(&self) -> usize {
        self.len() + 2
    }
}

impl MqttDataType for Vec<u8> {
    fn encoded_len(&self) -> usize {
        self.as_slice().encoded_len()
    }
}
