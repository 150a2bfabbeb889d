use crate::{error::MqttError, types::{push_be_u16, push_utf8, ByteCursor, ProtocolVersion, QoS}};

use super::{check_packet_identifier, properties, FixedHeader, MqttControlPacket, PacketType, PropertyIdentifier, PropertyList};

/// An MQTT `PUBLISH` packet is used to send a specific message to a topic.
///
/// # Examples
///
/// ```
/// use mqtt_codec::packet::{Packet, Publish};
/// use mqtt_codec::types::QoS;
///
/// let mut publish = Publish::new(
///     "/some/topic/name".into(),
///     vec![0, 1, 2, 3, 4],
/// );
/// publish.qos_level = QoS::AtLeastOnce;
/// publish.packet_identifier = Some(1);
///
/// let encoded = Packet::Publish(publish).encode().unwrap();
/// assert_eq!(0b00110010, encoded[0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publish {
    // FIXED HEADER
    /// If `true` this message is considered an attempted re-delivery.
    /// Defaults to `false`, and **must** be so if QoS is `0`.
    pub dup: bool,

    /// QoS for this message.
    pub qos_level: QoS,

    /// Whether the server should keep this message for future subscribers or not.
    /// Defaults to `false`.
    pub retain: bool,

    // VARIABLE HEADER

    /// Name of the topic to publish to. Must not contain wildcards, and may only be empty if a topic alias is set.
    pub topic_name: String,

    /// Present if and only if QoS is > 0, in which case it must be non-zero (MQTT-2.2.1-2, MQTT-2.2.1-3).
    pub packet_identifier: Option<u16>,

    /// MQTT 5 only. Set it to `Some`, even if empty, when encoding for MQTT 5: `None` leaves out the property length
    /// byte and the result only decodes as 3.1.1.
    pub properties: Option<PropertyList>,

    // PAYLOAD

    /// The application message. Its length is whatever remains of the packet after the variable header, it is not
    /// prefixed with a length of its own. It is valid for a PUBLISH packet to contain a zero length payload.
    pub payload: Vec<u8>,
}

impl Publish {

    /// Creates a new Publish packet using sane defaults for everything but the supplied values.
    /// [Publish] doesn't implement `Default` primarily because a "meaningful" topic name is a must.
    pub fn new(topic_name: String, payload: Vec<u8>) -> Self {
        Self {
            dup: false,
            qos_level: QoS::AtMostOnce,
            retain: false,
            topic_name,
            packet_identifier: None,
            properties: None,
            payload,
        }
    }

    /// MQTT-3.3.2-2: no wildcards. An empty topic name requires a topic alias (MQTT 5 only).
    fn validate_topic_name(topic_name: &str, properties: &Option<PropertyList>) -> Result<(), MqttError> {
        if topic_name.contains(['+', '#']) {
            return Err(MqttError::MalformedPacket(format!("Topic name must not contain wildcards: {}", topic_name)))
        }

        if topic_name.is_empty() {
            let has_alias = properties.as_ref().map_or(false, |p| p.contains(PropertyIdentifier::TopicAlias));
            if !has_alias {
                return Err(MqttError::MalformedPacket("Topic name is empty and no topic alias is set".into()))
            }
        }

        Ok(())
    }
}

impl MqttControlPacket for Publish {

    fn flags(&self) -> u8 {
        FixedHeader::publish_flags(self.dup, self.qos_level, self.retain)
    }

    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        Self::validate_topic_name(&self.topic_name, &self.properties)?;

        push_utf8(&self.topic_name, target)?;

        match (self.qos_level, self.packet_identifier) {
            (QoS::AtMostOnce, None) => {
                if self.dup {
                    return Err(MqttError::ProtocolError("DUP must not be set for QoS 0 messages".into()))
                }
            },
            (QoS::AtMostOnce, Some(_)) => {
                return Err(MqttError::ProtocolError("QoS 0 messages must not have a packet identifier".into()))
            },
            (_, Some(0)) | (_, None) => {
                return Err(MqttError::ProtocolError(format!(
                    "{:?} messages require a non-zero packet identifier", self.qos_level)))
            },
            (_, Some(pid)) => push_be_u16(pid, target),
        }

        properties::encode_if(&self.properties, target)?;

        target.extend_from_slice(&self.payload);

        Ok(())
    }

    fn decode_body(header: &FixedHeader, body: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError> {
        let topic_name = body.read_string()?;

        // only present in case QoS is > 0
        let packet_identifier = match header.qos {
            QoS::AtMostOnce => None,
            _ => Some(check_packet_identifier(body.read_u16()?, PacketType::PUBLISH)?),
        };

        let properties = properties::decode_if(version.has_properties(), body)?;
        Self::validate_topic_name(&topic_name, &properties)?;

        let payload = body.read_bytes(body.remaining())?;

        Ok(Self {
            dup: header.dup,
            qos_level: header.qos,
            retain: header.retain,
            topic_name,
            packet_identifier,
            properties,
            payload,
        })
    }
}
