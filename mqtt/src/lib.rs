//! A library representing the MQTT protocol with a focus on encoding to and decoding from bytes.
//!
//! Supports MQTT 3.1.1 and MQTT 5, selected at runtime with [types::ProtocolVersion]. Whenever documentation in this
//! crate refers to section numbers such as `MQTT-3.3.2-2`, these are from the official
//! [OASIS MQTTv5 standard](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html).
//!
//! The crate does no I/O. It is handed the bytes of a packet and returns a [packet::Packet], or the other way round:
//!
//! ```
//! use mqtt_codec::{decode_packet, encode_packet, Packet, ProtocolVersion};
//! use mqtt_codec::packet::Publish;
//! use mqtt_codec::types::QoS;
//!
//! let mut publish = Publish::new("a/b".into(), b"hi".to_vec());
//! publish.qos_level = QoS::AtLeastOnce;
//! publish.packet_identifier = Some(7);
//!
//! let bytes = encode_packet(&Packet::Publish(publish.clone())).unwrap();
//! assert_eq!(Packet::Publish(publish), decode_packet(&bytes, ProtocolVersion::V311).unwrap());
//! ```
//!
//! Decoding and encoding emit `tracing` events at `trace` and `debug` level, installing a subscriber is up to the
//! application.

pub mod client_id;
pub mod error;
pub mod packet;
pub mod types;

pub use client_id::generate_client_id;
pub use error::{MqttError, Result};
pub use packet::{decode_packet, encode_packet, Packet};
pub use types::ProtocolVersion;
