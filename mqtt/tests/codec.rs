use mqtt_codec::packet::{
    Ack, Connack, Connect, Disconnect, FixedHeader, LastWill, PacketType, PropertyIdentifier, PropertyList,
    PropertyValue, Publish, Suback, Subscribe, TopicFilter, Unsuback, Unsubscribe,
};
use mqtt_codec::types::{validate_utf8, QoS, ReasonCode, VariableByteInteger};
use mqtt_codec::{decode_packet, encode_packet, generate_client_id, MqttError, Packet, ProtocolVersion};
use proptest::prelude::*;

fn round_trip(packet: Packet, version: ProtocolVersion) {
    let encoded = encode_packet(&packet).unwrap();
    let decoded = decode_packet(&encoded, version).unwrap();
    assert_eq!(packet, decoded);
    assert_eq!(encoded, encode_packet(&decoded).unwrap());
}

#[test]
fn connect_with_credentials_and_no_will() {
    let bytes: Vec<u8> = vec![
        0x10, 28,
        0, 4, b'M', b'Q', b'T', b'T', 4, 0b11000010, 0, 10,
        0, 4, b'd', b'e', b'v', b'1',
        0, 5, b'a', b'l', b'i', b'c', b'e',
        0, 3, 0x00, 0xFF, 0x10,
    ];

    match decode_packet(&bytes, ProtocolVersion::V311).unwrap() {
        Packet::Connect(connect) => {
            assert!(connect.will.is_none());
            assert_eq!(Some("alice"), connect.username.as_deref());
            assert_eq!(Some(&[0x00, 0xFF, 0x10][..]), connect.password.as_deref());
        },
        other => panic!("expected CONNECT, got {:?}", other),
    }
}

#[test]
fn publish_qos_0_has_no_packet_identifier() {
    let bytes: Vec<u8> = vec![0x30, 13, 0, 5, b't', b'e', b'm', b'p', b's', b'2', b'1', b'.', b'5', b'C', b'!'];
    let (header, _) = FixedHeader::parse(&bytes).unwrap();

    match decode_packet(&bytes, ProtocolVersion::V311).unwrap() {
        Packet::Publish(publish) => {
            assert_eq!(None, publish.packet_identifier);
            assert_eq!(header.remaining_length as usize - (2 + publish.topic_name.len()), publish.payload.len());
            assert_eq!(b"21.5C!".to_vec(), publish.payload);
        },
        other => panic!("expected PUBLISH, got {:?}", other),
    }
}

#[test]
fn publish_qos_1_round_trip() {
    let mut publish = Publish::new("a/b".into(), b"hi".to_vec());
    publish.qos_level = QoS::AtLeastOnce;
    publish.packet_identifier = Some(7);

    let encoded = encode_packet(&Packet::Publish(publish)).unwrap();
    match decode_packet(&encoded, ProtocolVersion::V311).unwrap() {
        Packet::Publish(decoded) => {
            assert_eq!("a/b", decoded.topic_name);
            assert_eq!(b"hi".to_vec(), decoded.payload);
            assert_eq!(Some(7), decoded.packet_identifier);
        },
        other => panic!("expected PUBLISH, got {:?}", other),
    }
}

#[test]
fn subscribe_without_topics_is_malformed() {
    for version in [ProtocolVersion::V311, ProtocolVersion::V5] {
        let bytes: &[u8] = match version {
            ProtocolVersion::V311 => &[0x82, 2, 0, 1],
            ProtocolVersion::V5 => &[0x82, 3, 0, 1, 0],
        };
        assert!(matches!(decode_packet(bytes, version), Err(MqttError::MalformedPacket(_))));
    }
}

#[test]
fn remaining_length_of_five_bytes() {
    let res = VariableByteInteger::decode(&[0x80, 0x80, 0x80, 0x80, 0x01]);
    assert!(matches!(res, Err(MqttError::ProtocolError(_))));

    let res = decode_packet(&[0x30, 0xFF, 0xFF, 0xFF, 0xFF, 0x01], ProtocolVersion::V311);
    assert!(matches!(res, Err(MqttError::ProtocolError(_))));
}

#[test]
fn utf8_validation() {
    assert!(validate_utf8("Hello, 世界!".as_bytes()).is_ok());
    assert!(matches!(validate_utf8(&[0xFF, 0xFE, 0xFD]), Err(MqttError::InvalidEncoding(_))));
}

#[test]
fn incomplete_input_waits_for_more() {
    let full = encode_packet(&Packet::Publish(Publish::new("x/y".into(), vec![1; 300]))).unwrap();

    for len in 0..full.len() {
        match Packet::decode_from(&full[..len], ProtocolVersion::V311) {
            Err(e) => assert!(e.is_incomplete(), "{} bytes: {:?}", len, e),
            Ok(p) => panic!("decoded {:?} from {} of {} bytes", p, len, full.len()),
        }
    }

    let (_, consumed) = Packet::decode_from(&full, ProtocolVersion::V311).unwrap();
    assert_eq!(full.len(), consumed);
}

#[test]
fn every_packet_type_round_trips_v311() {
    let mut will = LastWill::new("last/words".into(), b"bye".to_vec());
    will.qos = QoS::AtLeastOnce;
    let mut connect = Connect::new("client".into());
    connect.will = Some(will);
    connect.username = Some("u".into());
    connect.password = Some(b"p".to_vec());

    let packets = vec![
        Packet::Connect(connect),
        Packet::Connack(Connack { session_present: true, return_code: 0, properties: None }),
        Packet::Publish(Publish::new("t".into(), vec![])),
        Packet::Puback(Ack::new(1)),
        Packet::Pubrec(Ack::new(2)),
        Packet::Pubrel(Ack::new(3)),
        Packet::Pubcomp(Ack::new(4)),
        Packet::Subscribe(Subscribe::new(5, vec![TopicFilter::new("a/#".into(), QoS::ExactlyOnce)])),
        Packet::Suback(Suback::new(5, vec![ReasonCode::GrantedQoS2])),
        Packet::Unsubscribe(Unsubscribe::new(6, vec!["a/#".into()])),
        Packet::Unsuback(Unsuback::new(6)),
        Packet::Pingreq,
        Packet::Pingresp,
        Packet::Disconnect(Disconnect::new()),
    ];

    let types: Vec<PacketType> = packets.iter().map(|p| p.packet_type()).collect();
    assert_eq!(14, types.len());

    for packet in packets {
        round_trip(packet, ProtocolVersion::V311);
    }
}

#[test]
fn every_packet_type_round_trips_v5() {
    let user = || PropertyList::new()
        .with(PropertyIdentifier::UserProperty, PropertyValue::UTF8Pair("trace".into(), "abc".into())).unwrap();

    let mut connect = Connect::new(String::new());
    connect.protocol_version = ProtocolVersion::V5;
    connect.properties = Some(user());

    let mut connack = Connack::new();
    connack.assign_client_identifier(generate_client_id()).unwrap();

    let mut publish = Publish::new("t".into(), b"payload".to_vec());
    publish.qos_level = QoS::ExactlyOnce;
    publish.packet_identifier = Some(99);
    publish.properties = Some(user());

    let mut subscribe = Subscribe::new(5, vec![TopicFilter::new("a/+".into(), QoS::AtLeastOnce)]);
    subscribe.properties = Some(user());

    let mut suback = Suback::new(5, vec![ReasonCode::TopicFilterInvalid]);
    suback.properties = Some(PropertyList::new());

    let mut unsubscribe = Unsubscribe::new(6, vec!["a/+".into()]);
    unsubscribe.properties = Some(PropertyList::new());

    let packets = vec![
        Packet::Connect(connect),
        Packet::Connack(connack),
        Packet::Publish(publish),
        Packet::Puback(Ack::new(1)),
        Packet::Pubrec(Ack::with_reason(2, ReasonCode::QuotaExceeded)),
        Packet::Pubrel(Ack { packet_identifier: 3, reason_code: Some(ReasonCode::Success), properties: Some(user()) }),
        Packet::Pubcomp(Ack::with_reason(4, ReasonCode::PacketIdentifierNotFound)),
        Packet::Subscribe(subscribe),
        Packet::Suback(suback),
        Packet::Unsubscribe(unsubscribe),
        Packet::Unsuback(Unsuback::with_reasons(6, vec![ReasonCode::NoSubscriptionExisted])),
        Packet::Pingreq,
        Packet::Pingresp,
        Packet::Disconnect(Disconnect { reason_code: Some(ReasonCode::AdministrativeAction), properties: Some(user()) }),
    ];

    for packet in packets {
        round_trip(packet, ProtocolVersion::V5);
    }
}

#[test]
fn packets_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Packet>();
    assert_send_sync::<MqttError>();
}

fn topic_name() -> impl Strategy<Value = String> {
    "[a-z0-9/]{1,40}"
}

proptest! {
    #[test]
    fn prop_publish_round_trip(
        topic in topic_name(),
        payload in prop::collection::vec(any::<u8>(), 0..2048),
        qos in 0u8..=2,
        packet_identifier in 1u16..,
        retain in any::<bool>(),
    ) {
        let mut publish = Publish::new(topic, payload);
        publish.qos_level = QoS::try_from(qos).unwrap();
        publish.retain = retain;
        if qos > 0 {
            publish.packet_identifier = Some(packet_identifier);
        }

        let packet = Packet::Publish(publish);
        let encoded = encode_packet(&packet).unwrap();
        let (decoded, consumed) = Packet::decode_from(&encoded, ProtocolVersion::V311).unwrap();
        prop_assert_eq!(encoded.len(), consumed);
        prop_assert_eq!(packet, decoded);
    }

    #[test]
    fn prop_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64), v5 in any::<bool>()) {
        let version = if v5 { ProtocolVersion::V5 } else { ProtocolVersion::V311 };
        let _ = decode_packet(&bytes, version);
    }
}
