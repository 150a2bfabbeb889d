use crate::{error::MqttError, types::{push_be_u16, push_utf8, ByteCursor, ProtocolVersion, QoS}};

use super::{check_packet_identifier, properties, FixedHeader, MqttControlPacket, PacketType, PropertyList};

/// A `SUBSCRIBE` packet, registering interest in one or more topic filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribe {
    pub packet_identifier: u16,
    /// MQTT 5 only. Set it to `Some`, even if empty, when encoding for MQTT 5: `None` leaves out the property length
    /// byte and the result only decodes as 3.1.1.
    pub properties: Option<PropertyList>,
    /// At least one.
    pub topic_filters: Vec<TopicFilter>,
}

/// A single topic filter of a [Subscribe] along with its subscription options.
///
/// MQTT 3.1.1 only knows the maximum QoS, the remaining options must keep their default values there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFilter {
    pub filter: String,
    /// Maximum QoS the server may use when forwarding messages for this subscription.
    pub maximum_qos: QoS,
    /// Default: `false`
    pub no_local: bool,
    /// Default: `false`
    pub retain_as_published: bool,
    /// Defaults to [RetainHandling::OnSubscribe]
    pub retain_handling: RetainHandling,
}

/// Defines how retained messages are to be dealt with by the server.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum RetainHandling {
    /// Sends retained messages directly on subscribe
    #[default]
    OnSubscribe = 0,
    /// Send only if this subscription does not yet exist
    NewSubOnly = 1,
    /// Self-explanatory
    Never = 2,
}

impl TryFrom<u8> for RetainHandling {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RetainHandling::OnSubscribe),
            1 => Ok(RetainHandling::NewSubOnly),
            2 => Ok(RetainHandling::Never),
            els => Err(MqttError::MalformedPacket(format!("Illegal value for [retain handling]: {}", els))),
        }
    }
}

impl TopicFilter {

    const NO_LOCAL_MASK: u8 = 0b00000100;
    const RETAIN_AS_PUBLISHED_MASK: u8 = 0b00001000;
    const RETAIN_HANDLING_SHIFT: u8 = 4;
    const V311_RESERVED_MASK: u8 = 0b11111100;
    const V5_RESERVED_MASK: u8 = 0b11000000;

    /// Creates a new filter with default options.
    pub fn new(filter: String, maximum_qos: QoS) -> Self {
        TopicFilter {
            filter,
            maximum_qos,
            no_local: false,
            retain_as_published: false,
            retain_handling: RetainHandling::OnSubscribe,
        }
    }

    /// The subscription options byte.
    pub fn options(&self) -> u8 {
        let mut options = u8::from(self.maximum_qos);

        if self.no_local {
            options |= Self::NO_LOCAL_MASK;
        }

        if self.retain_as_published {
            options |= Self::RETAIN_AS_PUBLISHED_MASK;
        }

        options | (self.retain_handling as u8) << Self::RETAIN_HANDLING_SHIFT
    }

    fn encode(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        validate_filter(&self.filter)?;
        push_utf8(&self.filter, target)?;
        target.push(self.options());
        Ok(())
    }

    fn decode(src: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError> {
        let filter = src.read_string()?;
        validate_filter(&filter)?;

        let options = src.read_u8()?;
        let reserved = match version {
            ProtocolVersion::V311 => Self::V311_RESERVED_MASK,
            ProtocolVersion::V5 => Self::V5_RESERVED_MASK,
        };
        if options & reserved != 0 {
            return Err(MqttError::MalformedPacket(format!("Reserved subscription option bits set: {:08b}", options)))
        }

        Ok(Self {
            filter,
            maximum_qos: QoS::from_bits(options, 0)?,
            no_local: options & Self::NO_LOCAL_MASK != 0,
            retain_as_published: options & Self::RETAIN_AS_PUBLISHED_MASK != 0,
            retain_handling: RetainHandling::try_from((options >> Self::RETAIN_HANDLING_SHIFT) & 0b11)?,
        })
    }
}

/// MQTT-4.7.1: filters are non-empty, `#` may only appear as the last level on its own, `+` only as a whole level.
pub(crate) fn validate_filter(filter: &str) -> Result<(), MqttError> {
    if filter.is_empty() {
        return Err(MqttError::MalformedPacket("Topic filter must not be empty".into()))
    }

    let levels: Vec<&str> = filter.split('/').collect();
    for (index, level) in levels.iter().enumerate() {
        let misplaced_multi = level.contains('#') && (*level != "#" || index != levels.len() - 1);
        let misplaced_single = level.contains('+') && *level != "+";
        if misplaced_multi || misplaced_single {
            return Err(MqttError::MalformedPacket(format!("Invalid wildcard placement in topic filter: {}", filter)))
        }
    }

    Ok(())
}

impl Subscribe {

    pub fn new(packet_identifier: u16, topic_filters: Vec<TopicFilter>) -> Self {
        Subscribe { packet_identifier, properties: None, topic_filters }
    }
}

impl MqttControlPacket for Subscribe {

    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        if self.topic_filters.is_empty() {
            return Err(MqttError::ProtocolError("SUBSCRIBE requires at least one topic filter".into()))
        }
        if self.packet_identifier == 0 {
            return Err(MqttError::ProtocolError("SUBSCRIBE requires a non-zero packet identifier".into()))
        }

        push_be_u16(self.packet_identifier, target);
        properties::encode_if(&self.properties, target)?;
        for filter in &self.topic_filters {
            filter.encode(target)?;
        }
        Ok(())
    }

    fn decode_body(_header: &FixedHeader, body: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError> {
        let packet_identifier = check_packet_identifier(body.read_u16()?, PacketType::SUBSCRIBE)?;
        let properties = properties::decode_if(version.has_properties(), body)?;

        let mut topic_filters = Vec::new();
        while !body.is_empty() {
            topic_filters.push(TopicFilter::decode(body, version)?);
        }

        if topic_filters.is_empty() {
            return Err(MqttError::MalformedPacket("SUBSCRIBE without topic filters".into()))
        }

        Ok(Subscribe { packet_identifier, properties, topic_filters })
    }
}
