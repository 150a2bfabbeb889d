use crate::error::MqttError;

/// Quality of Service levels.
/// See [the MQTT standard](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901234).
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub enum QoS {
    /// 0
    #[default]
    AtMostOnce = 0,
    /// 1
    AtLeastOnce = 1,
    /// 2
    ExactlyOnce = 2,
}

impl QoS {

    /// Extracts the QoS from the two bits starting at `shift`, e.g. `1` for the fixed header or `3` for the will QoS
    /// in the connect flags.
    pub(crate) fn from_bits(byte: u8, shift: u8) -> Result<Self, MqttError> {
        QoS::try_from((byte >> shift) & 0b11)
    }
}

impl TryFrom<u8> for QoS {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            _=> Err(MqttError::MalformedPacket(format!("Illegal value for QoS: {}", value))),
        }
    }
}

impl From<QoS> for u8 {
    fn from(qos: QoS) -> Self {
        qos as u8
    }
}
