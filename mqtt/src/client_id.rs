//! Client identifiers for clients that connect without one.
//!
//! A [Connect](crate::packet::Connect) with an empty client id asks the server to pick one. The server returns it
//! with the `Assigned Client Identifier` property of its [Connack](crate::packet::Connack), see
//! [Connack::assign_client_identifier](crate::packet::Connack::assign_client_identifier).

use rand::{distributions::Alphanumeric, Rng};

/// Prefix of every generated identifier.
pub const ASSIGNED_CLIENT_ID_PREFIX: &str = "auto-";

/// MQTT 3.1.1 servers only have to accept identifiers of up to 23 bytes (MQTT-3.1.3-5).
pub const ASSIGNED_CLIENT_ID_LEN: usize = 23;

/// Generates a random identifier of [ASSIGNED_CLIENT_ID_LEN] alphanumeric characters, starting with
/// [ASSIGNED_CLIENT_ID_PREFIX].
///
/// ```
/// let id = mqtt_codec::generate_client_id();
/// assert_eq!(23, id.len());
/// assert!(id.starts_with("auto-"));
/// ```
pub fn generate_client_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ASSIGNED_CLIENT_ID_LEN - ASSIGNED_CLIENT_ID_PREFIX.len())
        .map(char::from)
        .collect();

    format!("{}{}", ASSIGNED_CLIENT_ID_PREFIX, suffix)
}
