use crate::{
    error::MqttError,
    types::{push_be_u16, push_binary, push_utf8, ByteCursor, ProtocolVersion, QoS},
};

use super::{properties, FixedHeader, MqttControlPacket, PropertyList};

/// A `CONNECT` packet, the first thing a client sends after opening a network connection.
///
/// The connect flags are not stored as such, they are derived from the optional fields when encoding. The protocol
/// version is part of the packet: decoding a CONNECT ignores the version passed in by the caller and uses the
/// protocol level on the wire instead.
///
/// ```
/// use mqtt_codec::packet::{Connect, LastWill, Packet};
///
/// let mut connect = Connect::new("sensor-1".into());
/// connect.username = Some("user".into());
/// connect.password = Some(b"secret".to_vec());
/// connect.will = Some(LastWill::new("sensors/1/status".into(), b"offline".to_vec()));
///
/// let encoded = Packet::Connect(connect).encode().unwrap();
/// assert_eq!(0b11000110, encoded[9]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect {
    /// Selects whether properties are present. Defaults to [ProtocolVersion::V311].
    pub protocol_version: ProtocolVersion,

    /// `Clean Session` in 3.1.1, `Clean Start` in 5.
    pub clean_session: bool,

    /// Maximum time interval in seconds between two control packets sent by the client. `0` disables keep alive.
    pub keep_alive: u16,

    /// MQTT 5 only. Encoded as an empty list for 5 if `None`.
    pub properties: Option<PropertyList>,

    /// May be empty, in which case the server has to assign one.
    pub client_id: String,

    /// Message the server publishes on the client's behalf if the connection is lost.
    pub will: Option<LastWill>,

    pub username: Option<String>,

    /// Only allowed if [Connect::username] is set as well.
    pub password: Option<Vec<u8>>,
}

/// Will message of a [Connect].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastWill {
    pub qos: QoS,
    pub retain: bool,
    pub topic: String,
    pub payload: Vec<u8>,
    /// MQTT 5 only, see [Connect::properties].
    pub properties: Option<PropertyList>,
}

/// The connect flags byte, bit by bit.
///
/// | bit | 7 | 6 | 5 | 4-3 | 2 | 1 | 0 |
/// | --- | - | - | - | --- | - | - | - |
/// | | username | password | will retain | will QoS | will | clean session | reserved |
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ConnectFlags {
    pub username: bool,
    pub password: bool,
    pub will_retain: bool,
    pub will_qos: QoS,
    pub will: bool,
    pub clean_session: bool,
}

impl ConnectFlags {
    const USERNAME_MASK: u8 = 0b10000000;
    const PASSWORD_MASK: u8 = 0b01000000;
    const WILL_RETAIN_MASK: u8 = 0b00100000;
    const WILL_QOS_SHIFT: u8 = 3;
    const WILL_MASK: u8 = 0b00000100;
    const CLEAN_SESSION_MASK: u8 = 0b00000010;
    const RESERVED_MASK: u8 = 0b00000001;
}

impl TryFrom<u8> for ConnectFlags {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value & Self::RESERVED_MASK != 0 {
            return Err(MqttError::MalformedPacket("Reserved connect flag must be 0".into()))
        }

        let flags = ConnectFlags {
            username: value & Self::USERNAME_MASK != 0,
            password: value & Self::PASSWORD_MASK != 0,
            will_retain: value & Self::WILL_RETAIN_MASK != 0,
            will_qos: QoS::from_bits(value, Self::WILL_QOS_SHIFT)?,
            will: value & Self::WILL_MASK != 0,
            clean_session: value & Self::CLEAN_SESSION_MASK != 0,
        };

        if !flags.will && (flags.will_retain || flags.will_qos != QoS::AtMostOnce) {
            return Err(MqttError::MalformedPacket(format!(
                "Will QoS and Will Retain must be 0 without a will: {:08b}", value)))
        }

        if flags.password && !flags.username {
            return Err(MqttError::MalformedPacket("Password flag set without username flag".into()))
        }

        Ok(flags)
    }
}

impl From<ConnectFlags> for u8 {
    fn from(flags: ConnectFlags) -> Self {
        let mut byte = u8::from(flags.will_qos) << ConnectFlags::WILL_QOS_SHIFT;
        if flags.username {
            byte |= ConnectFlags::USERNAME_MASK;
        }
        if flags.password {
            byte |= ConnectFlags::PASSWORD_MASK;
        }
        if flags.will_retain {
            byte |= ConnectFlags::WILL_RETAIN_MASK;
        }
        if flags.will {
            byte |= ConnectFlags::WILL_MASK;
        }
        if flags.clean_session {
            byte |= ConnectFlags::CLEAN_SESSION_MASK;
        }
        byte
    }
}

impl LastWill {

    /// QoS 0, not retained.
    pub fn new(topic: String, payload: Vec<u8>) -> Self {
        LastWill { qos: QoS::AtMostOnce, retain: false, topic, payload, properties: None }
    }
}

impl Connect {

    /// MQTT 3.1.1, clean session, a keep alive of 60 seconds and no credentials or will.
    pub fn new(client_id: String) -> Self {
        Connect {
            protocol_version: ProtocolVersion::V311,
            clean_session: true,
            keep_alive: 60,
            properties: None,
            client_id,
            will: None,
            username: None,
            password: None,
        }
    }

    /// `true` if the client left it to the server to assign a client identifier.
    pub fn requires_assigned_client_id(&self) -> bool {
        self.client_id.is_empty()
    }

    /// Derives the flags byte from the packet's fields.
    pub fn connect_flags(&self) -> ConnectFlags {
        ConnectFlags {
            username: self.username.is_some(),
            password: self.password.is_some(),
            will_retain: self.will.as_ref().map_or(false, |w| w.retain),
            will_qos: self.will.as_ref().map_or(QoS::AtMostOnce, |w| w.qos),
            will: self.will.is_some(),
            clean_session: self.clean_session,
        }
    }

    fn encode_properties(&self, properties: &Option<PropertyList>, target: &mut Vec<u8>) -> Result<(), MqttError> {
        match (self.protocol_version, properties) {
            (ProtocolVersion::V5, Some(props)) => props.encode_into(target)?,
            (ProtocolVersion::V5, None) => target.push(0),
            (ProtocolVersion::V311, Some(_)) => {
                return Err(MqttError::ProtocolError("CONNECT properties require MQTT 5".into()))
            },
            (ProtocolVersion::V311, None) => (),
        }
        Ok(())
    }
}

impl MqttControlPacket for Connect {

    fn encode_body(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        if self.password.is_some() && self.username.is_none() {
            return Err(MqttError::ProtocolError("A password requires a username".into()))
        }

        // variable header
        push_utf8(ProtocolVersion::PROTOCOL_NAME, target)?;
        target.push(self.protocol_version.level());
        target.push(self.connect_flags().into());
        push_be_u16(self.keep_alive, target);
        self.encode_properties(&self.properties, target)?;

        // payload
        push_utf8(&self.client_id, target)?;

        if let Some(will) = &self.will {
            self.encode_properties(&will.properties, target)?;
            push_utf8(&will.topic, target)?;
            push_binary(&will.payload, target)?;
        }

        if let Some(username) = &self.username {
            push_utf8(username, target)?;
        }

        if let Some(password) = &self.password {
            push_binary(password, target)?;
        }

        Ok(())
    }

    fn decode_body(_header: &FixedHeader, body: &mut ByteCursor<'_>, _version: ProtocolVersion) -> Result<Self, MqttError> {
        let protocol_name = body.read_string()?;
        if protocol_name != ProtocolVersion::PROTOCOL_NAME {
            return Err(MqttError::MalformedPacket(format!("Unsupported protocol name: {}", protocol_name)))
        }

        let protocol_version = ProtocolVersion::try_from(body.read_u8()?)?;
        let flags = ConnectFlags::try_from(body.read_u8()?)?;
        let keep_alive = body.read_u16()?;
        let properties = properties::decode_if(protocol_version.has_properties(), body)?;

        let client_id = body.read_string()?;

        let will = match flags.will {
            true => {
                let will_properties = properties::decode_if(protocol_version.has_properties(), body)?;
                let topic = body.read_string()?;
                let payload = body.read_binary()?;
                Some(LastWill {
                    qos: flags.will_qos,
                    retain: flags.will_retain,
                    topic,
                    payload,
                    properties: will_properties,
                })
            },
            false => None,
        };

        let username = match flags.username {
            true => Some(body.read_string()?),
            false => None,
        };

        let password = match flags.password {
            true => Some(body.read_binary()?),
            false => None,
        };

        Ok(Connect {
            protocol_version,
            clean_session: flags.clean_session,
            keep_alive,
            properties,
            client_id,
            will,
            username,
            password,
        })
    }
}
