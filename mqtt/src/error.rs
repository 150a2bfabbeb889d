//! Custom error types used throughout the crate.

use thiserror::Error;

use crate::packet::PacketType;

/// Shorthand for results returned by this crate.
pub type Result<T> = std::result::Result<T, MqttError>;

/// Everything that can go wrong while decoding or encoding a control packet.
///
/// Only [MqttError::Incomplete] is recoverable in the sense that the same packet may decode successfully once more
/// bytes have arrived. Every other variant means the packet in question is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MqttError {

    /// The buffer does not (yet) contain a full packet. `needed` is the minimum number of additional bytes required
    /// before decoding can make progress. This is not a protocol violation.
    #[error("Incomplete packet: at least {needed} more byte(s) required")]
    Incomplete { needed: usize },

    /// A read inside an already delimited region (packet body, property list) ran past its end.
    #[error("Buffer underrun: needed {needed} byte(s) but only {remaining} remain")]
    BufferUnderrun { needed: usize, remaining: usize },

    /// Syntactical error indicating that a control packet could not be fully parsed.
    /// See MQTT standard `1.2` and `4.13`.
    #[error("Malformed Packet: {0}")]
    MalformedPacket(String),

    /// A declared length does not match the number of bytes actually consumed.
    #[error("Framing Error: {0}")]
    FramingError(String),

    /// Used for packets containing invalid or inconsistent data, or values that cannot be represented on the wire.
    /// See MQTT standard `1.2` and `4.13`.
    #[error("Protocol Error: {0}")]
    ProtocolError(String),

    /// A string field is not well-formed UTF-8 (or contains characters MQTT disallows).
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// An MQTT v5 property identifier that is not defined by the standard.
    #[error("Unsupported property identifier: {0:#04x}")]
    UnsupportedProperty(u8),

    /// A buffer could not be allocated.
    #[error("Resource error: {0}")]
    ResourceError(String),
}

impl MqttError {

    pub fn invalid_flags(packet_type: PacketType, first_byte: u8) -> Self {
        MqttError::MalformedPacket(format!("Invalid fixed header flags for {}: {:08b}", packet_type, first_byte))
    }

    pub(crate) fn length_mismatch(what: &str, declared: usize, consumed: usize) -> Self {
        MqttError::FramingError(format!("{} declared {} byte(s) but {} were consumed", what, declared, consumed))
    }

    /// Returns `true` for [MqttError::Incomplete], i.e. the caller should wait for more data and try again.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, MqttError::Incomplete { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            "Malformed Packet: no topic",
            MqttError::MalformedPacket("no topic".into()).to_string()
        );
        assert_eq!(
            "Unsupported property identifier: 0x2b",
            MqttError::UnsupportedProperty(43).to_string()
        );
        assert_eq!(
            "Invalid fixed header flags for SUBSCRIBE: 10000000",
            MqttError::invalid_flags(PacketType::SUBSCRIBE, 0b10000000).to_string()
        );
    }

    #[test]
    fn incomplete_is_recoverable() {
        assert!(MqttError::Incomplete { needed: 3 }.is_incomplete());
        assert!(!MqttError::FramingError("x".into()).is_incomplete());
    }
}
