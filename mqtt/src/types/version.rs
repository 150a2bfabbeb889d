use std::fmt::Display;

use crate::error::MqttError;

/// The protocol profile used on a connection.
///
/// Only CONNECT packets announce their version on the wire. Every other packet has to be decoded with the version
/// that was negotiated when the connection was established, which is why decoding takes this as an argument.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// MQTT 3.1.1, protocol level `4`. No properties, no reason codes outside of CONNACK and SUBACK.
    #[default]
    V311,
    /// MQTT 5.0, protocol level `5`.
    V5,
}

impl ProtocolVersion {

    /// The protocol name every CONNECT packet starts with.
    pub const PROTOCOL_NAME: &'static str = "MQTT";

    /// The numeric protocol level as sent in the CONNECT variable header.
    pub fn level(&self) -> u8 {
        match self {
            ProtocolVersion::V311 => 4,
            ProtocolVersion::V5 => 5,
        }
    }

    /// `true` if packets of this version carry property lists.
    pub fn has_properties(&self) -> bool {
        *self == ProtocolVersion::V5
    }
}

impl TryFrom<u8> for ProtocolVersion {
    type Error = MqttError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            4 => Ok(ProtocolVersion::V311),
            5 => Ok(ProtocolVersion::V5),
            els => Err(MqttError::MalformedPacket(format!("Unsupported protocol level: {}", els))),
        }
    }
}

impl Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolVersion::V311 => write!(f, "MQTT 3.1.1"),
            ProtocolVersion::V5 => write!(f, "MQTT 5.0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(Ok(ProtocolVersion::V311), ProtocolVersion::try_from(4));
        assert_eq!(Ok(ProtocolVersion::V5), ProtocolVersion::try_from(5));
        assert!(ProtocolVersion::try_from(3).is_err());
        assert_eq!(5, ProtocolVersion::V5.level());
        assert_eq!(ProtocolVersion::V311, ProtocolVersion::default());
    }
}
