use crate::{error::MqttError, types::{ByteCursor, ProtocolVersion, ReasonCode}};

use super::{properties, FixedHeader, MqttControlPacket, PropertyIdentifier, PropertyList, PropertyValue};

/// A `CONNACK` MQTT control packet, the server's answer to a [super::Connect].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connack {

    /// Whether this connect/connack exchange resumes an existing session or starts a new one.
    pub session_present: bool,

    /// Indicates whether the connection attempt was successful, and if not why.
    ///
    /// Kept as a raw byte since 3.1.1 return codes (`0x00`-`0x05`) and 5 reason codes (see
    /// [ReasonCode]) assign different meanings to the same values. `0x00` means accepted in both.
    pub return_code: u8,

    /// Properties sent by the server. MQTT 5 only. Set it to `Some`, even if empty, when encoding for MQTT 5: `None` leaves out the property length
    /// byte and the result only decodes as 3.1.1.
    pub properties: Option<PropertyList>,
}

impl Connack {

    const SESSION_PRESENT_MASK: u8 = 0b00000001;

    /// Connection accepted, no session present.
    pub fn new() -> Self {
        Connack { session_present: false, return_code: 0, properties: None }
    }

    /// `true` if the return code signals an accepted connection.
    pub fn is_accepted(&self) -> bool {
        self.return_code == 0
    }

    /// Interprets the return code as an MQTT 5 reason code.
    pub fn reason_code(&self) -> Result<ReasonCode, MqttError> {
        ReasonCode::try_from(self.return_code)
    }

    /// Adds the `Assigned Client Identifier` property, used if the client connected with an empty client id.
    pub fn assign_client_identifier(&mut self, client_id: String) -> Result<(), MqttError> {
        let props = self.properties.get_or_insert_with(PropertyList::new);
        props.push(super::Property::new(PropertyIdentifier::AssignedClientIdentifier, PropertyValue::UTF8(client_id))?)
    }

    /// The server-assigned client identifier, if present.
    pub fn assigned_client_identifier(&self) -> Option<&str> {
        self.properties.as_ref()
            .and_then(|p| p.get(PropertyIdentifier::AssignedClientIdentifier))
            .and_then(|v| v.as_str())
    }
}

impl Default for Connack {
    fn default() -> Self {
        Self::new()
    }
}

impl MqttControlPacket for Connack {

    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        target.push(match self.session_present {
            true => Self::SESSION_PRESENT_MASK,
            false => 0,
        });
        target.push(self.return_code);
        properties::encode_if(&self.properties, target)
    }

    fn decode_body(_header: &FixedHeader, body: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError> {
        let ack_flags = body.read_u8()?;
        if ack_flags & !Self::SESSION_PRESENT_MASK != 0 {
            return Err(MqttError::MalformedPacket(format!("Reserved CONNACK flags must be 0: {:08b}", ack_flags)))
        }
        let session_present = ack_flags & Self::SESSION_PRESENT_MASK != 0;

        let return_code = body.read_u8()?;
        let properties = properties::decode_if(version.has_properties(), body)?;

        Ok(Connack { session_present, return_code, properties })
    }
}
