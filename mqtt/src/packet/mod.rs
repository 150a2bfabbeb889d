//! Representations of MQTT control packets.
//! Includes serialization and deserialization of packets into and from binary.
//!
//! The "API" of these packets all use standard rust data types that map directly to MQTT types. See the
//! [`type` module-level documentation](crate::types).
//!
//! The structs representing the [PacketType]s group fields together as they seem most logical to use from an API
//! perspective. There is no separation into fixed header, variable header and payload in the way the MQTT standard
//! makes these distinctions. It is the internal encoding/decoding logic's responsibility to map them properly.
//!
//! # Decoding
//!
//! ```
//! use mqtt_codec::packet::{decode_packet, Packet};
//! use mqtt_codec::types::ProtocolVersion;
//!
//! let bytes = [0x30, 0x07, 0x00, 0x03, b'a', b'/', b'b', b'h', b'i'];
//! match decode_packet(&bytes, ProtocolVersion::V311).unwrap() {
//!     Packet::Publish(publish) => {
//!         assert_eq!("a/b", publish.topic_name);
//!         assert_eq!(b"hi".to_vec(), publish.payload);
//!     },
//!     other => panic!("unexpected packet {:?}", other),
//! }
//! ```

mod ack;
mod connack;
mod connect;
mod disconnect;
mod header;
mod properties;
mod publish;
mod suback;
mod subscribe;
mod unsuback;
mod unsubscribe;

use std::fmt::Display;

use tracing::{debug, trace};

use crate::error::MqttError;
use crate::types::{ByteCursor, MqttDataType, ProtocolVersion, VariableByteInteger};

pub use self::ack::Ack;
pub use self::connack::Connack;
pub use self::connect::{Connect, ConnectFlags, LastWill};
pub use self::disconnect::Disconnect;
pub use self::header::FixedHeader;
pub use self::properties::{Property, PropertyIdentifier, PropertyList, PropertyType, PropertyValue};
pub use self::publish::Publish;
pub use self::suback::Suback;
pub use self::subscribe::{RetainHandling, Subscribe, TopicFilter};
pub use self::unsuback::Unsuback;
pub use self::unsubscribe::Unsubscribe;

/// MQTT control packet types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PacketType {
    CONNECT = 1,
    CONNACK = 2,
    PUBLISH = 3,
    PUBACK = 4,
    PUBREC = 5,
    PUBREL = 6,
    PUBCOMP = 7,
    SUBSCRIBE = 8,
    SUBACK = 9,
    UNSUBSCRIBE = 10,
    UNSUBACK = 11,
    PINGREQ = 12,
    PINGRESP = 13,
    DISCONNECT = 14,
}

impl PacketType {

    /// The low nibble of the first byte that every packet of this type except PUBLISH must carry.
    pub fn reserved_flags(&self) -> u8 {
        match self {
            PacketType::PUBREL | PacketType::SUBSCRIBE | PacketType::UNSUBSCRIBE => 0b0010,
            _ => 0b0000,
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = MqttError;

    /// Takes the complete first byte of a packet, the flags in the lower four bits are ignored.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let shifted = value >> 4;

        match shifted {
            1 => Ok(PacketType::CONNECT),
            2 => Ok(PacketType::CONNACK),
            3 => Ok(PacketType::PUBLISH),
            4 => Ok(PacketType::PUBACK),
            5 => Ok(PacketType::PUBREC),
            6 => Ok(PacketType::PUBREL),
            7 => Ok(PacketType::PUBCOMP),
            8 => Ok(PacketType::SUBSCRIBE),
            9 => Ok(PacketType::SUBACK),
            10 => Ok(PacketType::UNSUBSCRIBE),
            11 => Ok(PacketType::UNSUBACK),
            12 => Ok(PacketType::PINGREQ),
            13 => Ok(PacketType::PINGRESP),
            14 => Ok(PacketType::DISCONNECT),
            15 => Err(MqttError::MalformedPacket("AUTH packets are not supported".into())),
            _=> Err(MqttError::MalformedPacket(format!("undefined packet type: {}", shifted))),
        }
    }
}

impl Display for PacketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            PacketType::CONNECT => write!(f, "CONNECT"),
            PacketType::CONNACK => write!(f, "CONNACK"),
            PacketType::PUBLISH => write!(f, "PUBLISH"),
            PacketType::PUBACK => write!(f, "PUBACK"),
            PacketType::PUBREC => write!(f, "PUBREC"),
            PacketType::PUBREL => write!(f, "PUBREL"),
            PacketType::PUBCOMP => write!(f, "PUBCOMP"),
            PacketType::SUBSCRIBE => write!(f, "SUBSCRIBE"),
            PacketType::SUBACK => write!(f, "SUBACK"),
            PacketType::UNSUBSCRIBE => write!(f, "UNSUBSCRIBE"),
            PacketType::UNSUBACK => write!(f, "UNSUBACK"),
            PacketType::PINGREQ => write!(f, "PINGREQ"),
            PacketType::PINGRESP => write!(f, "PINGRESP"),
            PacketType::DISCONNECT => write!(f, "DISCONNECT"),
        }
    }
}

/// Common behavior for the bodies of MQTT control packets, i.e. everything following the fixed header.
///
/// Framing (first byte, remaining length) is handled once for all packet types by [Packet].
pub trait MqttControlPacket: Sized {

    /// The lower four bits of the first byte for packets that derive them from their fields, i.e. PUBLISH.
    /// Everything else uses [PacketType::reserved_flags].
    fn flags(&self) -> u8 {
        0
    }

    /// Appends variable header and payload to `target`.
    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError>;

    /// Reads variable header and payload. `body` is bounded by the remaining length of the packet, and decoders are
    /// expected to consume all of it.
    fn decode_body(header: &FixedHeader, body: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError>;
}

/// Any one of the supported MQTT control packets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Connect(Connect),
    Connack(Connack),
    Publish(Publish),
    Puback(Ack),
    Pubrec(Ack),
    Pubrel(Ack),
    Pubcomp(Ack),
    Subscribe(Subscribe),
    Suback(Suback),
    Unsubscribe(Unsubscribe),
    Unsuback(Unsuback),
    Pingreq,
    Pingresp,
    Disconnect(Disconnect),
}

impl Packet {

    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::Connect(_) => PacketType::CONNECT,
            Packet::Connack(_) => PacketType::CONNACK,
            Packet::Publish(_) => PacketType::PUBLISH,
            Packet::Puback(_) => PacketType::PUBACK,
            Packet::Pubrec(_) => PacketType::PUBREC,
            Packet::Pubrel(_) => PacketType::PUBREL,
            Packet::Pubcomp(_) => PacketType::PUBCOMP,
            Packet::Subscribe(_) => PacketType::SUBSCRIBE,
            Packet::Suback(_) => PacketType::SUBACK,
            Packet::Unsubscribe(_) => PacketType::UNSUBSCRIBE,
            Packet::Unsuback(_) => PacketType::UNSUBACK,
            Packet::Pingreq => PacketType::PINGREQ,
            Packet::Pingresp => PacketType::PINGRESP,
            Packet::Disconnect(_) => PacketType::DISCONNECT,
        }
    }

    /// Decodes the first packet in `src` and returns it along with the number of bytes it occupied.
    ///
    /// Bytes following the packet are left alone, so this can be used on a buffer holding more than one packet.
    /// Fails with [MqttError::Incomplete] if `src` does not hold the full packet yet.
    pub fn decode_from(src: &[u8], version: ProtocolVersion) -> Result<(Packet, usize), MqttError> {
        let (header, header_len) = match FixedHeader::parse(src) {
            Ok(parsed) => parsed,
            Err(e) if e.is_incomplete() => return Err(e),
            Err(e) => {
                debug!(error = %e, "failed to parse fixed header");
                return Err(e)
            },
        };
        let frame_len = header.frame_len(header_len);

        match Self::decode_frame(&header, &src[header_len..frame_len], version) {
            Ok(packet) => {
                trace!(packet_type = %header.packet_type, length = frame_len, %version, "decoded packet");
                Ok((packet, frame_len))
            },
            Err(e) => {
                debug!(packet_type = %header.packet_type, error = %e, "failed to decode packet");
                Err(e)
            },
        }
    }

    fn decode_frame(header: &FixedHeader, src: &[u8], version: ProtocolVersion) -> Result<Packet, MqttError> {
        let mut body = ByteCursor::new(src);

        let packet = match header.packet_type {
            PacketType::CONNECT => Packet::Connect(Connect::decode_body(header, &mut body, version)?),
            PacketType::CONNACK => Packet::Connack(Connack::decode_body(header, &mut body, version)?),
            PacketType::PUBLISH => Packet::Publish(Publish::decode_body(header, &mut body, version)?),
            PacketType::PUBACK => Packet::Puback(Ack::decode_body(header, &mut body, version)?),
            PacketType::PUBREC => Packet::Pubrec(Ack::decode_body(header, &mut body, version)?),
            PacketType::PUBREL => Packet::Pubrel(Ack::decode_body(header, &mut body, version)?),
            PacketType::PUBCOMP => Packet::Pubcomp(Ack::decode_body(header, &mut body, version)?),
            PacketType::SUBSCRIBE => Packet::Subscribe(Subscribe::decode_body(header, &mut body, version)?),
            PacketType::SUBACK => Packet::Suback(Suback::decode_body(header, &mut body, version)?),
            PacketType::UNSUBSCRIBE => Packet::Unsubscribe(Unsubscribe::decode_body(header, &mut body, version)?),
            PacketType::UNSUBACK => Packet::Unsuback(Unsuback::decode_body(header, &mut body, version)?),
            PacketType::PINGREQ => Packet::Pingreq,
            PacketType::PINGRESP => Packet::Pingresp,
            PacketType::DISCONNECT => Packet::Disconnect(Disconnect::decode_body(header, &mut body, version)?),
        };

        if !body.is_empty() {
            return Err(MqttError::length_mismatch(
                &header.packet_type.to_string(), header.remaining_length as usize, body.position()))
        }

        Ok(packet)
    }

    /// Serializes the packet: fixed header, remaining length, body.
    pub fn encode(&self) -> Result<Vec<u8>, MqttError> {
        let mut body = Vec::new();
        match self {
            Packet::Connect(p) => p.encode_body(&mut body)?,
            Packet::Connack(p) => p.encode_body(&mut body)?,
            Packet::Publish(p) => p.encode_body(&mut body)?,
            Packet::Puback(p) | Packet::Pubrec(p) | Packet::Pubrel(p) | Packet::Pubcomp(p) => p.encode_body(&mut body)?,
            Packet::Subscribe(p) => p.encode_body(&mut body)?,
            Packet::Suback(p) => p.encode_body(&mut body)?,
            Packet::Unsubscribe(p) => p.encode_body(&mut body)?,
            Packet::Unsuback(p) => p.encode_body(&mut body)?,
            Packet::Pingreq | Packet::Pingresp => (),
            Packet::Disconnect(p) => p.encode_body(&mut body)?,
        }

        let flags = match self {
            Packet::Publish(p) => p.flags(),
            other => other.packet_type().reserved_flags(),
        };

        let remaining_length = VariableByteInteger::from_len(body.len())?;
        let mut packet = Vec::with_capacity(1 + remaining_length.encoded_len() + body.len());
        packet.push(((self.packet_type() as u8) << 4) | flags);
        remaining_length.encode_into(&mut packet)?;
        packet.append(&mut body);

        trace!(packet_type = %self.packet_type(), length = packet.len(), "encoded packet");
        Ok(packet)
    }
}

/// Decodes exactly one packet. `src` must hold the complete packet and nothing else, trailing bytes are a
/// [MqttError::FramingError].
pub fn decode_packet(src: &[u8], version: ProtocolVersion) -> Result<Packet, MqttError> {
    let (packet, consumed) = Packet::decode_from(src, version)?;
    if consumed != src.len() {
        debug!(consumed, available = src.len(), "trailing bytes after packet");
        return Err(MqttError::FramingError(format!(
            "{} trailing byte(s) after {} packet", src.len() - consumed, packet.packet_type())))
    }
    Ok(packet)
}

/// Encodes `packet` into its binary form.
pub fn encode_packet(packet: &Packet) -> Result<Vec<u8>, MqttError> {
    packet.encode()
}

/// Fails unless the packet identifier is non-zero (MQTT-2.2.1-3).
pub(crate) fn check_packet_identifier(packet_identifier: u16, packet_type: PacketType) -> Result<u16, MqttError> {
    if packet_identifier == 0 {
        return Err(MqttError::MalformedPacket(format!("{} must have a non-zero packet identifier", packet_type)))
    }
    Ok(packet_identifier)
}

macro_rules! impl_from_packet {
    ($($variant:ident($inner:ty)),*) => {
        $(
            impl From<$inner> for Packet {
                fn from(p: $inner) -> Self {
                    Packet::$variant(p)
                }
            }
        )*
    };
}

impl_from_packet!(
    Connect(Connect),
    Connack(Connack),
    Publish(Publish),
    Subscribe(Subscribe),
    Suback(Suback),
    Unsubscribe(Unsubscribe),
    Unsuback(Unsuback),
    Disconnect(Disconnect)
);
