use crate::error::MqttError;

use super::MqttDataType;

/// MQTT-1.5.5: an unsigned integer of up to 28 bits, encoded in one to four bytes using seven bits per byte. The most
/// significant bit of each byte signals that another byte follows.
///
/// Used for the remaining length of every packet and, in MQTT 5, for property list lengths and the subscription
/// identifier property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableByteInteger {
    pub value: u32,
}

impl VariableByteInteger {

    /// The largest value that fits into four bytes: 268,435,455.
    pub const MAX: u32 = 268_435_455;

    const MAX_BYTES: usize = 4;
    const CONTINUATION_BIT: u8 = 0b10000000;
    const VALUE_MASK: u8 = 0b01111111;

    /// Returns a [MqttError::ProtocolError] if `value` exceeds [VariableByteInteger::MAX].
    pub fn new(value: u32) -> Result<Self, MqttError> {
        if value > Self::MAX {
            return Err(MqttError::ProtocolError(format!(
                "{} exceeds the maximum variable byte integer {}", value, Self::MAX)))
        }
        Ok(VariableByteInteger { value })
    }

    /// Converts a `usize` length, failing if it cannot be represented.
    pub fn from_len(len: usize) -> Result<Self, MqttError> {
        match u32::try_from(len) {
            Ok(value) => Self::new(value),
            Err(_) => Err(MqttError::ProtocolError(format!("length {} does not fit a variable byte integer", len))),
        }
    }

    /// Appends the canonical (shortest) encoding to `target` and returns the number of bytes written.
    pub fn encode_into(&self, target: &mut Vec<u8>) -> Result<usize, MqttError> {
        let mut val = Self::new(self.value)?.value;
        let mut written = 0;

        loop {
            let mut byte = (val % 128) as u8;
            val /= 128;
            if val > 0 {
                byte |= Self::CONTINUATION_BIT;
            }
            target.push(byte);
            written += 1;

            if val == 0 {
                break
            }
        }

        Ok(written)
    }

    /// Attempts to read a value from the start of `src`.
    ///
    /// Returns `Ok(None)` if `src` ends before the final byte of the integer, leaving it to the caller to decide
    /// whether that means "wait for more data" or "ran past the end of a region". On success the second element is
    /// the number of bytes consumed.
    ///
    /// Fails with [MqttError::ProtocolError] if more than four bytes would be needed, and with
    /// [MqttError::MalformedPacket] if the encoding is not the shortest possible one (MQTT-1.5.5-1).
    pub fn decode(src: &[u8]) -> Result<Option<(Self, usize)>, MqttError> {
        let mut value: u32 = 0;
        let mut multiplier: u32 = 1;

        for (index, byte) in src.iter().enumerate() {
            value += (byte & Self::VALUE_MASK) as u32 * multiplier;

            // stop at the first byte where the MSB is not set
            if byte & Self::CONTINUATION_BIT == 0 {
                let consumed = index + 1;
                if consumed > 1 && *byte == 0 {
                    return Err(MqttError::MalformedPacket(format!(
                        "variable byte integer {} uses {} bytes, more than necessary", value, consumed)))
                }
                return Ok(Some((VariableByteInteger { value }, consumed)))
            }

            if index + 1 == Self::MAX_BYTES {
                return Err(MqttError::ProtocolError("length too long".into()))
            }
            multiplier *= 128;
        }

        Ok(None)
    }
}

impl MqttDataType for VariableByteInteger {
    fn encoded_len(&self) -> usize {
        match self.value {
            x if x <= 127 => 1,
            x if x <= 16_383 => 2,
            x if x <= 2_097_151 => 3,
            _=> 4,
        }
    }
}

impl TryFrom<VariableByteInteger> for Vec<u8> {
    type Error = MqttError;

    fn try_from(src: VariableByteInteger) -> Result<Self, Self::Error> {
        let mut result = Vec::with_capacity(src.encoded_len());
        src.encode_into(&mut result)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn encode_vbi() {
        do_test_encode_vbi(0, vec![0]);
        do_test_encode_vbi(16, vec![16]);
        do_test_encode_vbi(127, vec![0x7F]);
        do_test_encode_vbi(128, vec![128, 1]);
        do_test_encode_vbi(129, vec![129, 1]);
        do_test_encode_vbi(16_383, vec![0xFF, 0x7F]);
        do_test_encode_vbi(16_384, vec![0x80, 0x80, 0x01]);
        do_test_encode_vbi(2_097_151, vec![0xFF, 0xFF, 0x7F]);
        do_test_encode_vbi(2_097_152, vec![0x80, 0x80, 0x80, 0x01]);
        do_test_encode_vbi(268_435_455, vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn encode_too_large() {
        let res: Result<Vec<u8>, MqttError> = VariableByteInteger { value: 268_435_456 }.try_into();
        assert!(matches!(res, Err(MqttError::ProtocolError(_))));
        assert!(VariableByteInteger::new(u32::MAX).is_err());
    }

    #[test]
    fn decode_vbi() {
        do_test_decode_vbi(&[78], 78, 1);
        do_test_decode_vbi(&[129, 1], 129, 2);
        do_test_decode_vbi(&[0x80, 0x80, 0x80, 0x01], 2_097_152, 4);
        do_test_decode_vbi(&[0xFF, 0xFF, 0xFF, 0x7F], 268_435_455, 4);
        // trailing bytes belong to whatever comes next
        do_test_decode_vbi(&[0x05, 0xFF, 0xFF], 5, 1);
    }

    #[test]
    fn decode_five_bytes() {
        let res = VariableByteInteger::decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
        assert_eq!(Err(MqttError::ProtocolError("length too long".into())), res);

        let res = VariableByteInteger::decode(&[0x80, 0x80, 0x80, 0x80, 0x80]);
        assert!(matches!(res, Err(MqttError::ProtocolError(_))));
    }

    #[test]
    fn decode_needs_more() {
        assert_eq!(Ok(None), VariableByteInteger::decode(&[]));
        assert_eq!(Ok(None), VariableByteInteger::decode(&[0x80]));
        assert_eq!(Ok(None), VariableByteInteger::decode(&[0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn decode_non_minimal() {
        assert!(matches!(VariableByteInteger::decode(&[0x80, 0x00]), Err(MqttError::MalformedPacket(_))));
        assert!(matches!(VariableByteInteger::decode(&[0x85, 0x80, 0x00]), Err(MqttError::MalformedPacket(_))));
    }

    #[test]
    fn vbi_size() {
        assert_eq!(1, VariableByteInteger{value: 0}.encoded_len());
        assert_eq!(1, VariableByteInteger{value: 127}.encoded_len());
        assert_eq!(2, VariableByteInteger{value: 128}.encoded_len());
        assert_eq!(2, VariableByteInteger{value: 16383}.encoded_len());
        assert_eq!(3, VariableByteInteger{value: 16384}.encoded_len());
        assert_eq!(3, VariableByteInteger{value: 2097151}.encoded_len());
        assert_eq!(4, VariableByteInteger{value: 2097152}.encoded_len());
        assert_eq!(4, VariableByteInteger{value: 268435455}.encoded_len());
    }

    proptest! {
        #[test]
        fn prop_round_trip(value in 0u32..=VariableByteInteger::MAX) {
            let vbi = VariableByteInteger::new(value).unwrap();
            let encoded: Vec<u8> = vbi.try_into().unwrap();

            prop_assert_eq!(vbi.encoded_len(), encoded.len());

            let (decoded, consumed) = VariableByteInteger::decode(&encoded).unwrap().unwrap();
            prop_assert_eq!(value, decoded.value);
            prop_assert_eq!(encoded.len(), consumed);
        }

        #[test]
        fn prop_encoding_is_minimal(value in 0u32..=VariableByteInteger::MAX) {
            let encoded: Vec<u8> = VariableByteInteger { value }.try_into().unwrap();
            let minimal = match value {
                0..=127 => 1,
                128..=16_383 => 2,
                16_384..=2_097_151 => 3,
                _ => 4,
            };
            prop_assert_eq!(minimal, encoded.len());
            // only the last byte may lack the continuation bit
            prop_assert!(encoded[..encoded.len() - 1].iter().all(|b| b & 0x80 != 0));
            prop_assert_eq!(0, encoded[encoded.len() - 1] & 0x80);
        }
    }

    fn do_test_encode_vbi(value: u32, expect: Vec<u8>) {
        let actual: Vec<u8> = VariableByteInteger{ value }.try_into().unwrap();
        assert_eq!(expect, actual, "error trying to encode {}", value);
    }

    fn do_test_decode_vbi(bytes: &[u8], expect: u32, consumed: usize) {
        let (actual, used) = VariableByteInteger::decode(bytes).unwrap().unwrap();
        assert_eq!(expect, actual.value, "error trying to decode into {}", expect);
        assert_eq!(consumed, used);
    }
}
