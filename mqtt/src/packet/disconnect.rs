use crate::{error::MqttError, types::{ByteCursor, ProtocolVersion, ReasonCode}};

use super::{properties, FixedHeader, MqttControlPacket, PropertyList};

/// A `DISCONNECT` packet.
///
/// In MQTT 3.1.1 it consists of the fixed header only. MQTT 5 allows a reason code (defaults to
/// [ReasonCode::Success], "Normal disconnection") and a property list after that, both are omitted from the wire when
/// they are `None`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Disconnect {
    pub reason_code: Option<ReasonCode>,
    pub properties: Option<PropertyList>,
}

impl Disconnect {

    pub fn new() -> Self {
        Self::default()
    }

    /// The reason code, with an omitted one meaning normal disconnection.
    pub fn reason(&self) -> ReasonCode {
        self.reason_code.unwrap_or(ReasonCode::Success)
    }
}

impl MqttControlPacket for Disconnect {

    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
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

    fn decode_body(_header: &FixedHeader, body: &mut ByteCursor<'_>, version: ProtocolVersion) -> Result<Self, MqttError> {
        // 3.1.1 bodies must be empty, which is up to the framing check
        if version == ProtocolVersion::V311 || body.is_empty() {
            return Ok(Disconnect::new())
        }

        let reason_code = Some(ReasonCode::try_from(body.read_u8()?)?);
        let properties = properties::decode_if(!body.is_empty(), body)?;

        Ok(Disconnect { reason_code, properties })
    }
}
