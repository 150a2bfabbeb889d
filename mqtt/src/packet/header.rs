use crate::{error::MqttError, types::{QoS, VariableByteInteger}};

use super::PacketType;

/// The fixed header every MQTT control packet starts with: packet type and flags in the first byte, followed by the
/// remaining length as a variable byte integer.
///
/// ```
/// use mqtt_codec::packet::{FixedHeader, PacketType};
/// use mqtt_codec::types::QoS;
///
/// let (header, header_len) = FixedHeader::parse(&[0x3B, 0x03, 0x00, 0x01, b'a']).unwrap();
/// assert_eq!(PacketType::PUBLISH, header.packet_type);
/// assert!(header.dup && header.retain);
/// assert_eq!(QoS::AtLeastOnce, header.qos);
/// assert_eq!(3, header.remaining_length);
/// assert_eq!(5, header.frame_len(header_len));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedHeader {
    pub packet_type: PacketType,
    /// Bit 3. Only meaningful for PUBLISH.
    pub dup: bool,
    /// Bits 2 and 1. Only meaningful for PUBLISH.
    pub qos: QoS,
    /// Bit 0. Only meaningful for PUBLISH.
    pub retain: bool,
    /// Number of bytes following the fixed header that belong to this packet.
    pub remaining_length: u32,
}

impl FixedHeader {

    const DUP_FLAG_MASK: u8 = 0b00001000;
    const RETAIN_FLAG_MASK: u8 = 0b00000001;
    const QOS_SHIFT: u8 = 1;
    const FLAGS_MASK: u8 = 0b00001111;

    /// Smallest possible packet: first byte plus a remaining length of zero.
    const MIN_LEN: usize = 2;

    /// Parses the fixed header at the start of `src` and returns it along with its own length in bytes.
    ///
    /// Succeeds only once the complete packet (header and `remaining_length` bytes of body) is available, otherwise
    /// fails with [MqttError::Incomplete]. Reserved flag bits are validated for every packet type.
    pub fn parse(src: &[u8]) -> Result<(FixedHeader, usize), MqttError> {
        let first_byte = match src.first() {
            Some(b) => *b,
            None => return Err(MqttError::Incomplete { needed: Self::MIN_LEN }),
        };

        let packet_type = PacketType::try_from(first_byte)?;
        let qos = QoS::from_bits(first_byte, Self::QOS_SHIFT)?;
        let dup = first_byte & Self::DUP_FLAG_MASK != 0;
        let retain = first_byte & Self::RETAIN_FLAG_MASK != 0;

        match packet_type {
            PacketType::PUBLISH => {
                if dup && qos == QoS::AtMostOnce {
                    return Err(MqttError::MalformedPacket("DUP flag must not be set for QoS 0 messages".into()))
                }
            },
            other => {
                if first_byte & Self::FLAGS_MASK != other.reserved_flags() {
                    return Err(MqttError::invalid_flags(other, first_byte))
                }
            },
        }

        let (remaining_length, length_bytes) = match VariableByteInteger::decode(&src[1..])? {
            Some((vbi, consumed)) => (vbi.value, consumed),
            None => return Err(MqttError::Incomplete { needed: 1 }),
        };

        let header_len = 1 + length_bytes;
        let available = src.len() - header_len;
        if available < remaining_length as usize {
            return Err(MqttError::Incomplete { needed: remaining_length as usize - available })
        }

        Ok((FixedHeader { packet_type, dup, qos, retain, remaining_length }, header_len))
    }

    /// The lower four bits of the first byte.
    pub fn flags(&self) -> u8 {
        Self::publish_flags(self.dup, self.qos, self.retain)
    }

    /// Packs the PUBLISH flags into the lower nibble of the first byte.
    pub(crate) fn publish_flags(dup: bool, qos: QoS, retain: bool) -> u8 {
        let mut flags = u8::from(qos) << Self::QOS_SHIFT;
        if dup {
            flags |= Self::DUP_FLAG_MASK;
        }
        if retain {
            flags |= Self::RETAIN_FLAG_MASK;
        }
        flags
    }

    /// Length of the whole packet, given the length of this header.
    pub fn frame_len(&self, header_len: usize) -> usize {
        header_len + self.remaining_length as usize
    }
}
