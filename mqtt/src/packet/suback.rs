use crate::{error::MqttError, types::{push_be_u16, ByteCursor, ProtocolVersion, ReasonCode}};

use super::{check_packet_identifier, properties, FixedHeader, MqttControlPacket, PacketType, PropertyList};

/// A `SUBACK` packet, the server's answer to a [super::Subscribe]. Contains one return code per requested topic
/// filter, in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suback {
    pub packet_identifier: u16,
    /// MQTT 5 only. Set it to `Some`, even if empty, when encoding for MQTT 5: `None` leaves out the property length
    /// byte and the result only decodes as 3.1.1.
    pub properties: Option<PropertyList>,
    /// Either the granted QoS or an error. MQTT 3.1.1 only allows QoS 0 to 2 and `0x80`.
    pub reason_codes: Vec<ReasonCode>,
}

impl Suback {

    pub fn new(packet_identifier: u16, reason_codes: Vec<ReasonCode>) -> Self {
        Suback { packet_identifier, properties: None, reason_codes }
    }

    fn check_v311(code: ReasonCode) -> Result<ReasonCode, MqttError> {
        match code {
            ReasonCode::Success |
            ReasonCode::GrantedQoS1 |
            ReasonCode::GrantedQoS2 |
            ReasonCode::UnspecifiedError => Ok(code),
            els => Err(MqttError::MalformedPacket(format!("Invalid SUBACK return code for MQTT 3.1.1: {:?}", els))),
        }
    }
}

impl MqttControlPacket for Suback {

    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        if self.reason_codes.is_empty() {
            return Err(MqttError::ProtocolError("SUBACK requires at least one return code".into()))
        }

        push_be_u16(self.packet_identifier, target);
        properties::encode_if(&self.properties, target)?;
        target.extend(self.reason_codes.iter().map(|code| u8::from(*code)));
        Ok(())
    }

    fn decode_body(_header: &FixedHeader, body: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError> {
        let packet_identifier = check_packet_identifier(body.read_u16()?, PacketType::SUBACK)?;
        let properties = properties::decode_if(version.has_properties(), body)?;

        let mut reason_codes = Vec::with_capacity(body.remaining());
        while !body.is_empty() {
            let code = ReasonCode::try_from(body.read_u8()?)?;
            reason_codes.push(match version {
                ProtocolVersion::V311 => Self::check_v311(code)?,
                ProtocolVersion::V5 => code,
            });
        }

        if reason_codes.is_empty() {
            return Err(MqttError::MalformedPacket("SUBACK without return codes".into()))
        }

        Ok(Suback { packet_identifier, properties, reason_codes })
    }
}
