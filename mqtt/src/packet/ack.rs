use crate::{error::MqttError, types::{push_be_u16, ByteCursor, ProtocolVersion, ReasonCode}};

use super::{check_packet_identifier, properties, FixedHeader, MqttControlPacket, PropertyList};

/// The shared shape of `PUBACK`, `PUBREC`, `PUBREL` and `PUBCOMP`, the acknowledgements in the QoS 1 and QoS 2
/// delivery flows. Which one it is follows from the [super::Packet] variant wrapping it.
///
/// MQTT 3.1.1 acknowledgements consist of the packet identifier only. MQTT 5 may add a reason code, and a property
/// list after that. Both are omitted from the wire when they are `None`, and a reason code of
/// [ReasonCode::Success] is written if only the properties are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Identifier of the PUBLISH (or PUBREL) being acknowledged.
    pub packet_identifier: u16,

    /// MQTT 5 only. `None` on the wire means success.
    pub reason_code: Option<ReasonCode>,

    /// MQTT 5 only.
    pub properties: Option<PropertyList>,
}

impl Ack {

    /// The minimal acknowledgement, valid for both protocol versions.
    pub fn new(packet_identifier: u16) -> Self {
        Ack { packet_identifier, reason_code: None, properties: None }
    }

    /// MQTT 5 acknowledgement with an explicit reason code.
    pub fn with_reason(packet_identifier: u16, reason_code: ReasonCode) -> Self {
        Ack { packet_identifier, reason_code: Some(reason_code), properties: None }
    }

    /// The reason code, with an omitted one meaning success.
    pub fn reason(&self) -> ReasonCode {
        self.reason_code.unwrap_or(ReasonCode::Success)
    }
}

impl MqttControlPacket for Ack {

    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        push_be_u16(self.packet_identifier, target);

        match (&self.reason_code, &self.properties) {
            (None, None) => (),
            (Some(code), None) => target.push((*code).into()),
            (_, Some(props)) => {
                target.push(self.reason().into());
                props.encode_into(target)?;
            },
        }

        Ok(())
    }

    fn decode_body(header: &FixedHeader, body: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError> {
        let packet_identifier = check_packet_identifier(body.read_u16()?, header.packet_type)?;

        // anything after the identifier in 3.1.1 is left for the framing check
        if version == ProtocolVersion::V311 || body.is_empty() {
            return Ok(Ack::new(packet_identifier))
        }

        let reason_code = Some(ReasonCode::try_from(body.read_u8()?)?);
        let properties = properties::decode_if(!body.is_empty(), body)?;

        Ok(Ack { packet_identifier, reason_code, properties })
    }
}
