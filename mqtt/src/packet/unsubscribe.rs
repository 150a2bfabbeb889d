use crate::{error::MqttError, types::{push_be_u16, push_utf8, ByteCursor, ProtocolVersion}};

use super::{check_packet_identifier, properties, subscribe::validate_filter, FixedHeader, MqttControlPacket, PacketType, PropertyList};

/// An `UNSUBSCRIBE` packet, removing one or more subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsubscribe {
    pub packet_identifier: u16,
    /// MQTT 5 only. Set it to `Some`, even if empty, when encoding for MQTT 5: `None` leaves out the property length
    /// byte and the result only decodes as 3.1.1.
    pub properties: Option<PropertyList>,
    /// At least one.
    pub topic_filters: Vec<String>,
}

impl Unsubscribe {

    pub fn new(packet_identifier: u16, topic_filters: Vec<String>) -> Self {
        Unsubscribe { packet_identifier, properties: None, topic_filters }
    }
}

impl MqttControlPacket for Unsubscribe {

    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        if self.topic_filters.is_empty() {
            return Err(MqttError::ProtocolError("UNSUBSCRIBE requires at least one topic filter".into()))
        }
        if self.packet_identifier == 0 {
            return Err(MqttError::ProtocolError("UNSUBSCRIBE requires a non-zero packet identifier".into()))
        }

        push_be_u16(self.packet_identifier, target);
        properties::encode_if(&self.properties, target)?;
        for filter in &self.topic_filters {
            validate_filter(filter)?;
            push_utf8(filter, target)?;
        }
        Ok(())
    }

    fn decode_body(_header: &FixedHeader, body: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError> {
        let packet_identifier = check_packet_identifier(body.read_u16()?, PacketType::UNSUBSCRIBE)?;
        let properties = properties::decode_if(version.has_properties(), body)?;

        let mut topic_filters = Vec::new();
        while !body.is_empty() {
            let filter = body.read_string()?;
            validate_filter(&filter)?;
            topic_filters.push(filter);
        }

        if topic_filters.is_empty() {
            return Err(MqttError::MalformedPacket("UNSUBSCRIBE without topic filters".into()))
        }

        Ok(Unsubscribe { packet_identifier, properties, topic_filters })
    }
}
