use crate::{error::MqttError, types::{push_be_u16, ByteCursor, ProtocolVersion, ReasonCode}};

use super::{check_packet_identifier, FixedHeader, MqttControlPacket, PacketType, PropertyList};

/// An `UNSUBACK` packet, the server's answer to an [super::Unsubscribe].
///
/// In MQTT 3.1.1 this is just the packet identifier, the same as a [super::Ack]. MQTT 5 adds a property list and one
/// reason code per topic filter of the UNSUBSCRIBE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsuback {
    pub packet_identifier: u16,
    /// MQTT 5 only.
    pub properties: Option<PropertyList>,
    /// MQTT 5 only, empty for 3.1.1.
    pub reason_codes: Vec<ReasonCode>,
}

impl Unsuback {

    /// The MQTT 3.1.1 form.
    pub fn new(packet_identifier: u16) -> Self {
        Unsuback { packet_identifier, properties: None, reason_codes: Vec::new() }
    }

    /// The MQTT 5 form.
    pub fn with_reasons(packet_identifier: u16, reason_codes: Vec<ReasonCode>) -> Self {
        Unsuback { packet_identifier, properties: Some(PropertyList::new()), reason_codes }
    }
}

impl MqttControlPacket for Unsuback {

    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        push_be_u16(self.packet_identifier, target);

        match &self.properties {
            Some(props) => props.encode_into(target)?,
            // reason codes can't go without a property length
            None if !self.reason_codes.is_empty() => target.push(0),
            None => (),
        }

        target.extend(self.reason_codes.iter().map(|code| u8::from(*code)));
        Ok(())
    }

    fn decode_body(_header: &FixedHeader, body: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError> {
        let packet_identifier = check_packet_identifier(body.read_u16()?, PacketType::UNSUBACK)?;

        if version == ProtocolVersion::V311 {
            return Ok(Unsuback::new(packet_identifier))
        }

        let properties = Some(PropertyList::decode(body)?);
        let mut reason_codes = Vec::with_capacity(body.remaining());
        while !body.is_empty() {
            reason_codes.push(ReasonCode::try_from(body.read_u8()?)?);
        }

        Ok(Unsuback { packet_identifier, properties, reason_codes })
    }
}
