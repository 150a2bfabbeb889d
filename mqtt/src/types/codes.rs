use crate::error::MqttError;

use super::MqttDataType;

/// MQTT-2.4: Reason Codes, a single byte numeric value.
/// Anything at or above 0x80 is considered an error.
///
/// Several codes share a numeric value with different meanings depending on the packet (`0x00` is "Success",
/// "Normal disconnection" and "Granted QoS 0"). They map to a single variant here.
///
/// MQTT 3.1.1 SUBACK return codes (`0x00`, `0x01`, `0x02`, `0x80`) are a subset and decode to the same variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReasonCode {
    /// 0x00, also "Normal disconnection" and "Granted QoS 0"
    Success = 0x00,
    /// 0x01
    GrantedQoS1 = 0x01,
    /// 0x02
    GrantedQoS2 = 0x02,
    /// 0x04
    DisconnectWithWill = 0x04,
    /// 0x10
    NoMatchingSubscribers = 0x10,
    /// 0x11
    NoSubscriptionExisted = 0x11,
    /// 0x18
    ContinueAuthentication = 0x18,
    /// 0x19
    ReAuthenticate = 0x19,
    /// 0x80
    UnspecifiedError = 0x80,
    /// 0x81
    MalformedPacket = 0x81,
    /// 0x82
    ProtocolError = 0x82,
    /// 0x83
    ImplementationSpecificError = 0x83,
    /// 0x84
    UnsupportedProtocolVersion = 0x84,
    /// 0x85
    ClientIdentifierInvalid = 0x85,
    /// 0x86
    BadUserNameOrPassword = 0x86,
    /// 0x87
    NotAuthorized = 0x87,
    /// 0x88
    ServerUnavailable = 0x88,
    /// 0x89
    ServerBusy = 0x89,
    /// 0x8A
    Banned = 0x8A,
    /// 0x8B
    ServerShuttingDown = 0x8B,
    /// 0x8C
    BadAuthenticationMethod = 0x8C,
    /// 0x8D
    KeepAliveTimeout = 0x8D,
    /// 0x8E
    SessionTakenOver = 0x8E,
    /// 0x8F
    TopicFilterInvalid = 0x8F,
    /// 0x90
    TopicNameInvalid = 0x90,
    /// 0x91
    PacketIdentifierInUse = 0x91,
    /// 0x92
    PacketIdentifierNotFound = 0x92,
    /// 0x93
    ReceiveMaximumExceeded = 0x93,
    /// 0x94
    TopicAliasInvalid = 0x94,
    /// 0x95
    PacketTooLarge = 0x95,
    /// 0x96
    MessageRateTooHigh = 0x96,
    /// 0x97
    QuotaExceeded = 0x97,
    /// 0x98
    AdministrativeAction = 0x98,
    /// 0x99
    PayloadFormatInvalid = 0x99,
    /// 0x9A
    RetainNotSupported = 0x9A,
    /// 0x9B
    QoSNotSupported = 0x9B,
    /// 0x9C
    UseAnotherServer = 0x9C,
    /// 0x9D
    ServerMoved = 0x9D,
    /// 0x9E
    SharedSubscriptionsNotSupported = 0x9E,
    /// 0x9F
    ConnectionRateExceeded = 0x9F,
    /// 0xA0
    MaximumConnectTime = 0xA0,
    /// 0xA1
    SubscriptionIdentifiersNotSupported = 0xA1,
    /// 0xA2
    WildcardSubscriptionsNotSupported = 0xA2,
}

impl ReasonCode {

    /// Returns `true` if the reason code has a numeric value of 0x80 or higher.
    pub fn is_err(&self) -> bool {
        u8::from(*self) >= 0x80
    }

    /// The SUBACK code granting `qos`.
    pub fn granted(qos: crate::types::QoS) -> Self {
        match qos {
            crate::types::QoS::AtMostOnce => ReasonCode::Success,
            crate::types::QoS::AtLeastOnce => ReasonCode::GrantedQoS1,
            crate::types::QoS::ExactlyOnce => ReasonCode::GrantedQoS2,
        }
    }
}

impl MqttDataType for ReasonCode {
    fn encoded_len(&self) -> usize {
        1
    }
}

impl From<ReasonCode> for u8 {
    fn from(code: ReasonCode) -> Self {
        code as u8
    }
}

impl TryFrom<u8> for ReasonCode {
    type Error = MqttError;

    /// Converts numeric values to a reason code enum, or returns an error if the code is undefined
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Success),
            0x01 => Ok(Self::GrantedQoS1),
            0x02 => Ok(Self::GrantedQoS2),
            0x04 => Ok(Self::DisconnectWithWill),
            0x10 => Ok(Self::NoMatchingSubscribers),
            0x11 => Ok(Self::NoSubscriptionExisted),
            0x18 => Ok(Self::ContinueAuthentication),
            0x19 => Ok(Self::ReAuthenticate),
            0x80 => Ok(Self::UnspecifiedError),
            0x81 => Ok(Self::MalformedPacket),
            0x82 => Ok(Self::ProtocolError),
            0x83 => Ok(Self::ImplementationSpecificError),
            0x84 => Ok(Self::UnsupportedProtocolVersion),
            0x85 => Ok(Self::ClientIdentifierInvalid),
            0x86 => Ok(Self::BadUserNameOrPassword),
            0x87 => Ok(Self::NotAuthorized),
            0x88 => Ok(Self::ServerUnavailable),
            0x89 => Ok(Self::ServerBusy),
            0x8A => Ok(Self::Banned),
            0x8B => Ok(Self::ServerShuttingDown),
            0x8C => Ok(Self::BadAuthenticationMethod),
            0x8D => Ok(Self::KeepAliveTimeout),
            0x8E => Ok(Self::SessionTakenOver),
            0x8F => Ok(Self::TopicFilterInvalid),
            0x90 => Ok(Self::TopicNameInvalid),
            0x91 => Ok(Self::PacketIdentifierInUse),
            0x92 => Ok(Self::PacketIdentifierNotFound),
            0x93 => Ok(Self::ReceiveMaximumExceeded),
            0x94 => Ok(Self::TopicAliasInvalid),
            0x95 => Ok(Self::PacketTooLarge),
            0x96 => Ok(Self::MessageRateTooHigh),
            0x97 => Ok(Self::QuotaExceeded),
            0x98 => Ok(Self::AdministrativeAction),
            0x99 => Ok(Self::PayloadFormatInvalid),
            0x9A => Ok(Self::RetainNotSupported),
            0x9B => Ok(Self::QoSNotSupported),
            0x9C => Ok(Self::UseAnotherServer),
            0x9D => Ok(Self::ServerMoved),
            0x9E => Ok(Self::SharedSubscriptionsNotSupported),
            0x9F => Ok(Self::ConnectionRateExceeded),
            0xA0 => Ok(Self::MaximumConnectTime),
            0xA1 => Ok(Self::SubscriptionIdentifiersNotSupported),
            0xA2 => Ok(Self::WildcardSubscriptionsNotSupported),
            _=> Err(MqttError::MalformedPacket(format!("Undefined Reason Code: {}", value))),
        }
    }
}

#[cfg(test)]
mod tests {

    use crate::types::QoS;

    use super::*;

    #[test]
    fn test_reason_code_conversions() {
        assert_eq!(Ok(ReasonCode::Success), ReasonCode::try_from(0));
        assert_eq!(Ok(ReasonCode::ServerBusy), ReasonCode::try_from(137));
        assert_eq!(Ok(ReasonCode::TopicNameInvalid), ReasonCode::try_from(144));
        assert_eq!(Ok(ReasonCode::ProtocolError), ReasonCode::try_from(130));
        assert_eq!(Ok(ReasonCode::Banned), ReasonCode::try_from(138));
        assert_eq!(Ok(ReasonCode::PacketIdentifierNotFound), ReasonCode::try_from(0x92));

        let err1 = ReasonCode::try_from(0xFF);
        assert_eq!(Some(MqttError::MalformedPacket("Undefined Reason Code: 255".to_string())), err1.err());

        let err2 = ReasonCode::try_from(0xBA);
        assert_eq!(Some(MqttError::MalformedPacket("Undefined Reason Code: 186".to_string())), err2.err());
    }

    #[test]
    fn is_err() {
        assert!(!ReasonCode::Success.is_err());
        assert!(!ReasonCode::NoMatchingSubscribers.is_err());
        assert!(ReasonCode::UnspecifiedError.is_err());
        assert!(ReasonCode::WildcardSubscriptionsNotSupported.is_err());
    }

    #[test]
    fn granted() {
        assert_eq!(ReasonCode::Success, ReasonCode::granted(QoS::AtMostOnce));
        assert_eq!(ReasonCode::GrantedQoS2, ReasonCode::granted(QoS::ExactlyOnce));
    }
}
