//! MQTT 5 properties, which can occur in almost any control packet as well as the last will.
//!
//! On the wire a property list is a variable byte integer holding the length of the list, followed by that many bytes
//! of `identifier, value` entries. The shape of each value is fixed by its identifier. Lists are kept in wire order.

use crate::{
    error::MqttError,
    types::{push_be_u16, push_be_u32, push_binary, push_utf8, ByteCursor, MqttDataType, VariableByteInteger},
};

/// Numeric IDs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PropertyIdentifier {
    PayloadFormatIndicator = 1,
    MessageExpiryInterval = 2,
    ContentType = 3,
    ResponseTopic = 8,
    CorrelationData = 9,
    SubscriptionIdentifier = 11,
    SessionExpiryInterval = 17,
    AssignedClientIdentifier = 18,
    ServerKeepAlive = 19,
    AuthenticationMethod = 21,
    AuthenticationData = 22,
    RequestProblemInformation = 23,
    WillDelayInterval = 24,
    RequestResponseInformation = 25,
    ResponseInformation = 26,
    ServerReference = 28,
    ReasonString = 31,
    ReceiveMaximum = 33,
    TopicAliasMaximum = 34,
    TopicAlias = 35,
    MaximumQos = 36,
    RetainAvailable = 37,
    UserProperty = 38,
    MaximumPacketSize = 39,
    WildcardSubscriptionAvailable = 40,
    SubscriptionIdentifierAvailable = 41,
    SharedSubscriptionAvailable = 42,
}

/// The data type a property value is encoded as.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PropertyType {
    Byte,
    TwoByteInt,
    FourByteInt,
    VariableByteInt,
    UTF8,
    BinaryData,
    UTF8Pair,
}

/// The value of a single property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// Single byte value
    Byte(u8),

    /// Unsigned 16-bit integer
    TwoByteInt(u16),

    /// Unsigned 32-bit integer
    FourByteInt(u32),

    /// Variable Byte Integer, see `MQTT 1.5.5`
    VariableByteInt(u32),

    /// UTF-8 String, with 16-bit length info.
    UTF8(String),

    /// Binary data, with preceding 16-bit length info.
    BinaryData(Vec<u8>),

    /// Key-value pair
    UTF8Pair(String, String),
}

/// A single identifier-tagged property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    /// One of the defined IDs.
    pub identifier: PropertyIdentifier,

    /// The actual data, its variant must match [PropertyIdentifier::value_type].
    pub value: PropertyValue,
}

/// An ordered list of properties as attached to an MQTT 5 packet.
///
/// ```
/// use mqtt_codec::packet::{PropertyIdentifier, PropertyList, PropertyValue};
///
/// let properties = PropertyList::new()
///     .with(PropertyIdentifier::SessionExpiryInterval, PropertyValue::FourByteInt(120)).unwrap()
///     .with(PropertyIdentifier::UserProperty, PropertyValue::UTF8Pair("k".into(), "v".into())).unwrap();
///
/// assert_eq!(2, properties.len());
/// assert_eq!(Some(120), properties.get(PropertyIdentifier::SessionExpiryInterval).and_then(|v| v.as_u32()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyList {
    properties: Vec<Property>,
}

impl PropertyIdentifier {

    /// Returns how values of this property are encoded.
    pub fn value_type(&self) -> PropertyType {
        match self {
            PropertyIdentifier::PayloadFormatIndicator |
            PropertyIdentifier::RequestProblemInformation |
            PropertyIdentifier::RequestResponseInformation |
            PropertyIdentifier::MaximumQos |
            PropertyIdentifier::RetainAvailable |
            PropertyIdentifier::WildcardSubscriptionAvailable |
            PropertyIdentifier::SubscriptionIdentifierAvailable |
            PropertyIdentifier::SharedSubscriptionAvailable => PropertyType::Byte,
            PropertyIdentifier::ServerKeepAlive |
            PropertyIdentifier::ReceiveMaximum |
            PropertyIdentifier::TopicAliasMaximum |
            PropertyIdentifier::TopicAlias => PropertyType::TwoByteInt,
            PropertyIdentifier::MessageExpiryInterval |
            PropertyIdentifier::SessionExpiryInterval |
            PropertyIdentifier::MaximumPacketSize |
            PropertyIdentifier::WillDelayInterval => PropertyType::FourByteInt,
            PropertyIdentifier::SubscriptionIdentifier => PropertyType::VariableByteInt,
            PropertyIdentifier::ContentType |
            PropertyIdentifier::ResponseTopic |
            PropertyIdentifier::AssignedClientIdentifier |
            PropertyIdentifier::AuthenticationMethod |
            PropertyIdentifier::ResponseInformation |
            PropertyIdentifier::ServerReference |
            PropertyIdentifier::ReasonString => PropertyType::UTF8,
            PropertyIdentifier::CorrelationData |
            PropertyIdentifier::AuthenticationData => PropertyType::BinaryData,
            PropertyIdentifier::UserProperty => PropertyType::UTF8Pair,
        }
    }

    /// Only user properties and subscription identifiers may occur more than once in the same list.
    pub fn allows_multiple(&self) -> bool {
        matches!(self, PropertyIdentifier::UserProperty | PropertyIdentifier::SubscriptionIdentifier)
    }
}

impl TryFrom<u8> for PropertyIdentifier {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let result: PropertyIdentifier = match value {
            1 => Self::PayloadFormatIndicator,
            2 => Self::MessageExpiryInterval,
            3 => Self::ContentType,
            8 => Self::ResponseTopic,
            9 => Self::CorrelationData,
            11 => Self::SubscriptionIdentifier,
            17 => Self::SessionExpiryInterval,
            18 => Self::AssignedClientIdentifier,
            19 => Self::ServerKeepAlive,
            21 => Self::AuthenticationMethod,
            22 => Self::AuthenticationData,
            23 => Self::RequestProblemInformation,
            24 => Self::WillDelayInterval,
            25 => Self::RequestResponseInformation,
            26 => Self::ResponseInformation,
            28 => Self::ServerReference,
            31 => Self::ReasonString,
            33 => Self::ReceiveMaximum,
            34 => Self::TopicAliasMaximum,
            35 => Self::TopicAlias,
            36 => Self::MaximumQos,
            37 => Self::RetainAvailable,
            38 => Self::UserProperty,
            39 => Self::MaximumPacketSize,
            40 => Self::WildcardSubscriptionAvailable,
            41 => Self::SubscriptionIdentifierAvailable,
            42 => Self::SharedSubscriptionAvailable,
            els => return Err(MqttError::UnsupportedProperty(els)),
        };

        Ok(result)
    }
}

impl MqttDataType for PropertyIdentifier {
    fn encoded_len(&self) -> usize {
        1 // all values are < 128, so the variable byte integer is always a single byte
    }
}

impl PropertyValue {

    pub fn value_type(&self) -> PropertyType {
        match self {
            PropertyValue::Byte(_) => PropertyType::Byte,
            PropertyValue::TwoByteInt(_) => PropertyType::TwoByteInt,
            PropertyValue::FourByteInt(_) => PropertyType::FourByteInt,
            PropertyValue::VariableByteInt(_) => PropertyType::VariableByteInt,
            PropertyValue::UTF8(_) => PropertyType::UTF8,
            PropertyValue::BinaryData(_) => PropertyType::BinaryData,
            PropertyValue::UTF8Pair(_, _) => PropertyType::UTF8Pair,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            PropertyValue::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            PropertyValue::TwoByteInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns four byte and variable byte integers.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            PropertyValue::FourByteInt(v) | PropertyValue::VariableByteInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::UTF8(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PropertyValue::BinaryData(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    fn decode(value_type: PropertyType, src: &mut ByteCursor<'_>) -> Result<Self, MqttError> {
        let value = match value_type {
            PropertyType::Byte => PropertyValue::Byte(src.read_u8()?),
            PropertyType::TwoByteInt => PropertyValue::TwoByteInt(src.read_u16()?),
            PropertyType::FourByteInt => PropertyValue::FourByteInt(src.read_u32()?),
            PropertyType::VariableByteInt => PropertyValue::VariableByteInt(src.read_variable_int()?),
            PropertyType::UTF8 => PropertyValue::UTF8(src.read_string()?),
            PropertyType::BinaryData => PropertyValue::BinaryData(src.read_binary()?),
            PropertyType::UTF8Pair => PropertyValue::UTF8Pair(src.read_string()?, src.read_string()?),
        };
        Ok(value)
    }

    fn encode(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        match self {
            PropertyValue::Byte(b) => target.push(*b),
            PropertyValue::TwoByteInt(i) => push_be_u16(*i, target),
            PropertyValue::FourByteInt(i) => push_be_u32(*i, target),
            PropertyValue::VariableByteInt(i) => {
                VariableByteInteger::new(*i)?.encode_into(target)?;
            },
            PropertyValue::UTF8(s) => push_utf8(s, target)?,
            PropertyValue::BinaryData(b) => push_binary(b, target)?,
            PropertyValue::UTF8Pair(k, v) => {
                push_utf8(k, target)?;
                push_utf8(v, target)?;
            },
        }
        Ok(())
    }
}

impl MqttDataType for PropertyValue {
    fn encoded_len(&self) -> usize {
        match self {
            PropertyValue::Byte(v) => v.encoded_len(),
            PropertyValue::TwoByteInt(v) => v.encoded_len(),
            PropertyValue::FourByteInt(v) => v.encoded_len(),
            PropertyValue::VariableByteInt(v) => VariableByteInteger { value: *v }.encoded_len(),
            PropertyValue::UTF8(v) => v.encoded_len(),
            PropertyValue::BinaryData(v) => v.encoded_len(),
            PropertyValue::UTF8Pair(k, v) => k.encoded_len() + v.encoded_len(),
        }
    }
}

impl Property {

    /// Fails with [MqttError::ProtocolError] if the value's data type is not the one defined for `identifier`.
    pub fn new(identifier: PropertyIdentifier, value: PropertyValue) -> Result<Self, MqttError> {
        let property = Property { identifier, value };
        property.check_type()?;
        Ok(property)
    }

    fn check_type(&self) -> Result<(), MqttError> {
        if self.identifier.value_type() != self.value.value_type() {
            return Err(MqttError::ProtocolError(format!(
                "{:?} must be encoded as {:?}, got {:?}",
                self.identifier, self.identifier.value_type(), self.value.value_type())))
        }
        Ok(())
    }

    fn decode(src: &mut ByteCursor<'_>) -> Result<Self, MqttError> {
        let identifier = PropertyIdentifier::try_from(src.read_u8()?)?;
        let value = PropertyValue::decode(identifier.value_type(), src)?;
        Ok(Property { identifier, value })
    }

    fn encode(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        self.check_type()?;
        target.push(self.identifier as u8);
        self.value.encode(target)
    }
}

impl MqttDataType for Property {
    fn encoded_len(&self) -> usize {
        self.identifier.encoded_len() + self.value.encoded_len()
    }
}

impl PropertyList {

    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property, checking its data type and that it does not duplicate a single-occurrence property.
    pub fn push(&mut self, property: Property) -> Result<(), MqttError> {
        property.check_type()?;
        if !property.identifier.allows_multiple() && self.get(property.identifier).is_some() {
            return Err(MqttError::ProtocolError(format!(
                "{:?} must not be included more than once", property.identifier)))
        }
        self.properties.push(property);
        Ok(())
    }

    /// Builder-style version of [PropertyList::push].
    pub fn with(mut self, identifier: PropertyIdentifier, value: PropertyValue) -> Result<Self, MqttError> {
        self.push(Property::new(identifier, value)?)?;
        Ok(self)
    }

    /// The first value for `identifier`, if any.
    pub fn get(&self, identifier: PropertyIdentifier) -> Option<&PropertyValue> {
        self.properties.iter().find(|p| p.identifier == identifier).map(|p| &p.value)
    }

    /// All values for `identifier`, in wire order.
    pub fn get_all(&self, identifier: PropertyIdentifier) -> impl Iterator<Item = &PropertyValue> {
        self.properties.iter().filter(move |p| p.identifier == identifier).map(|p| &p.value)
    }

    /// Key-value pairs of all user properties, in wire order.
    pub fn user_properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.get_all(PropertyIdentifier::UserProperty).filter_map(|v| match v {
            PropertyValue::UTF8Pair(k, v) => Some((k.as_str(), v.as_str())),
            _ => None,
        })
    }

    pub fn contains(&self, identifier: PropertyIdentifier) -> bool {
        self.get(identifier).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Number of bytes the entries take up, without the leading length.
    pub fn properties_len(&self) -> usize {
        self.properties.iter().map(|p| p.encoded_len()).sum()
    }

    /// Reads the property length and then exactly that many bytes of properties.
    ///
    /// A list that claims more bytes than are available, or an entry that extends past the declared end, is a
    /// [MqttError::FramingError]. Unknown identifiers fail with [MqttError::UnsupportedProperty].
    pub fn decode(src: &mut ByteCursor<'_>) -> Result<Self, MqttError> {
        let declared = src.read_variable_int()? as usize;
        let available = src.remaining();
        let mut range = src.take(declared)
            .map_err(|_| MqttError::FramingError(format!(
                "property list declared {} byte(s) but only {} are available", declared, available)))?;

        let mut result = PropertyList::new();
        while !range.is_empty() {
            let start = range.position();
            let property = Property::decode(&mut range).map_err(|e| match e {
                MqttError::BufferUnderrun { .. } => MqttError::FramingError(format!(
                    "property at offset {} extends past the declared property length {}", start, declared)),
                els => els,
            })?;
            result.push(property)?;
        }

        Ok(result)
    }

    /// Writes the variable byte integer length followed by all properties.
    pub fn encode_into(&self, target: &mut Vec<u8>) -> Result<(), MqttError> {
        let length = VariableByteInteger::from_len(self.properties_len())?;
        target.reserve(length.encoded_len() + length.value as usize);
        length.encode_into(target)?;
        for property in &self.properties {
            property.encode(target)?;
        }
        Ok(())
    }
}

impl MqttDataType for PropertyList {
    /// Includes the leading length.
    fn encoded_len(&self) -> usize {
        let len = self.properties_len();
        VariableByteInteger { value: len as u32 }.encoded_len() + len
    }
}

impl TryFrom<Vec<Property>> for PropertyList {
    type Error = MqttError;

    fn try_from(properties: Vec<Property>) -> Result<Self, Self::Error> {
        let mut result = PropertyList::new();
        for property in properties {
            result.push(property)?;
        }
        Ok(result)
    }
}

impl<'a> IntoIterator for &'a PropertyList {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

/// Decodes a property list if `present`, i.e. if the packet is MQTT 5.
pub(crate) fn decode_if(present: bool, src: &mut ByteCursor<'_>) -> Result<Option<PropertyList>, MqttError> {
    match present {
        true => Ok(Some(PropertyList::decode(src)?)),
        false => Ok(None),
    }
}

/// Encodes `properties` if there are any to encode.
pub(crate) fn encode_if(properties: &Option<PropertyList>, target: &mut Vec<u8>) -> Result<(), MqttError> {
    if let Some(props) = properties {
        props.encode_into(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn encode_property() {
        test_encode(PropertyIdentifier::PayloadFormatIndicator, PropertyValue::Byte(1), vec![1, 1]);
        test_encode(PropertyIdentifier::MessageExpiryInterval, PropertyValue::FourByteInt(600), vec![2, 0, 0, 2, 88]);
        test_encode(PropertyIdentifier::AuthenticationMethod, PropertyValue::UTF8("basic".into()), vec![21, 0, 5, 98, 97, 115, 105, 99]);
        test_encode(
            PropertyIdentifier::AuthenticationData,
            PropertyValue::BinaryData(vec![2, 4, 6, 8, 10, 1, 3, 5, 7, 9]),
            vec![22, 0, 10, 2, 4, 6, 8, 10, 1, 3, 5, 7, 9]
        );
        test_encode(PropertyIdentifier::SubscriptionIdentifier, PropertyValue::VariableByteInt(200), vec![11, 0xC8, 0x01]);
        test_encode(
            PropertyIdentifier::UserProperty,
            PropertyValue::UTF8Pair("debug".into(), "true".into()),
            vec![38, 0, 5, 100, 101, 98, 117, 103, 0, 4, 116, 114, 117, 101]
        );
    }

    #[test]
    fn encode_list() {
        let props = PropertyList::new()
            .with(PropertyIdentifier::PayloadFormatIndicator, PropertyValue::Byte(1)).unwrap()
            .with(PropertyIdentifier::TopicAlias, PropertyValue::TwoByteInt(334)).unwrap()
            .with(PropertyIdentifier::UserProperty, PropertyValue::UTF8Pair("debug".into(), "true".into())).unwrap();

        let mut actual = Vec::new();
        props.encode_into(&mut actual).unwrap();

        let expect: Vec<u8> = vec![19,1,1,35,1,78,38,0,5,100,101,98,117,103,0,4,116,114,117,101];
        assert_eq!(expect, actual);
        assert_eq!(expect.len(), props.encoded_len());
    }

    #[test]
    fn encode_empty_list() {
        let mut actual = Vec::new();
        PropertyList::new().encode_into(&mut actual).unwrap();
        assert_eq!(vec![0_u8], actual);
        assert_eq!(1, PropertyList::new().encoded_len());
    }

    #[test]
    fn decode_list() {
        let src: Vec<u8> = vec![15, 17, 0, 0, 0, 180, 31, 0, 7, 98, 101, 99, 97, 117, 115, 101, 0xAA];
        let mut cursor = ByteCursor::new(&src);
        let props = PropertyList::decode(&mut cursor).unwrap();

        assert_eq!(16, cursor.position());
        assert_eq!(2, props.len());
        assert_eq!(Some(180), props.get(PropertyIdentifier::SessionExpiryInterval).and_then(|v| v.as_u32()));
        assert_eq!(Some("because"), props.get(PropertyIdentifier::ReasonString).and_then(|v| v.as_str()));

        let order: Vec<PropertyIdentifier> = props.iter().map(|p| p.identifier).collect();
        assert_eq!(vec![PropertyIdentifier::SessionExpiryInterval, PropertyIdentifier::ReasonString], order);
    }

    #[test]
    fn decode_user_properties_keep_order() {
        let src: Vec<u8> = vec![14, 38, 0, 1, b'b', 0, 1, b'2', 38, 0, 1, b'a', 0, 1, b'1'];
        let props = PropertyList::decode(&mut ByteCursor::new(&src)).unwrap();
        let pairs: Vec<(&str, &str)> = props.user_properties().collect();
        assert_eq!(vec![("b", "2"), ("a", "1")], pairs);
    }

    #[test]
    fn decode_empty_list() {
        let src = [0];
        let props = PropertyList::decode(&mut ByteCursor::new(&src)).unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn decode_unknown_identifier() {
        let src = [2, 0x2B, 1];
        let res = PropertyList::decode(&mut ByteCursor::new(&src));
        assert_eq!(Err(MqttError::UnsupportedProperty(0x2B)), res);
    }

    #[test]
    fn decode_entry_overruns_declared_length() {
        // declares 3 bytes, but the four byte integer needs 5
        let src = [3, 17, 0, 0, 0, 180];
        let res = PropertyList::decode(&mut ByteCursor::new(&src));
        assert!(matches!(res, Err(MqttError::FramingError(_))));
    }

    #[test]
    fn decode_declared_length_exceeds_buffer() {
        let src = [10, 1, 1];
        let res = PropertyList::decode(&mut ByteCursor::new(&src));
        assert!(matches!(res, Err(MqttError::FramingError(_))));
    }

    #[test]
    fn decode_duplicate() {
        let src = [4, 1, 1, 1, 0];
        let res = PropertyList::decode(&mut ByteCursor::new(&src));
        assert!(matches!(res, Err(MqttError::ProtocolError(_))));
    }

    #[test]
    fn type_mismatch() {
        let res = Property::new(PropertyIdentifier::ReasonString, PropertyValue::Byte(1));
        assert!(matches!(res, Err(MqttError::ProtocolError(_))));

        // bypassing the constructor is caught when encoding
        let prop = Property { identifier: PropertyIdentifier::TopicAlias, value: PropertyValue::FourByteInt(1) };
        assert!(prop.encode(&mut Vec::new()).is_err());
    }

    #[test]
    fn round_trip() {
        let props = PropertyList::new()
            .with(PropertyIdentifier::ContentType, PropertyValue::UTF8("application/json".into())).unwrap()
            .with(PropertyIdentifier::CorrelationData, PropertyValue::BinaryData(vec![0, 1, 2])).unwrap()
            .with(PropertyIdentifier::SubscriptionIdentifier, PropertyValue::VariableByteInt(268_435_455)).unwrap()
            .with(PropertyIdentifier::SubscriptionIdentifier, PropertyValue::VariableByteInt(1)).unwrap();

        let mut encoded = Vec::new();
        props.encode_into(&mut encoded).unwrap();
        let decoded = PropertyList::decode(&mut ByteCursor::new(&encoded)).unwrap();
        assert_eq!(props, decoded);
    }

    fn test_encode(identifier: PropertyIdentifier, value: PropertyValue, expected: Vec<u8>) {
        let prop = Property::new(identifier, value).unwrap();
        let mut encoded = Vec::new();
        prop.encode(&mut encoded).unwrap();
        assert_eq!(expected.len(), prop.encoded_len());
        assert_eq!(expected, encoded);
    }
}
