use crate::error::MqttError;

/// Checks that `bytes` consists only of well-formed UTF-8 sequences of one to four bytes.
///
/// Each lead byte determines the sequence length, and every continuation byte must match `10xxxxxx`. Overlong
/// forms, UTF-16 surrogates and code points above U+10FFFF are rejected, as is a sequence cut short by the end of the
/// input. U+0000 is well-formed UTF-8 and passes here, string fields reject it when they are read.
///
/// ```
/// use mqtt_codec::types::validate_utf8;
///
/// assert!(validate_utf8("Hello, 世界!".as_bytes()).is_ok());
/// assert!(validate_utf8(&[0xFF, 0xFE, 0xFD]).is_err());
/// ```
pub fn validate_utf8(bytes: &[u8]) -> Result<(), MqttError> {
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        // allowed range of the first continuation byte
        let (width, second) = match lead {
            0x00..=0x7F => (1, 0x80..=0xBF),
            0xC2..=0xDF => (2, 0x80..=0xBF),
            0xE0 => (3, 0xA0..=0xBF),
            0xED => (3, 0x80..=0x9F),
            0xE1..=0xEF => (3, 0x80..=0xBF),
            0xF0 => (4, 0x90..=0xBF),
            0xF4 => (4, 0x80..=0x8F),
            0xF1..=0xF3 => (4, 0x80..=0xBF),
            els => return Err(MqttError::InvalidEncoding(format!("invalid lead byte {:#04x} at offset {}", els, i))),
        };

        if i + width > bytes.len() {
            return Err(MqttError::InvalidEncoding(format!("truncated sequence at offset {}", i)));
        }

        if width > 1 && !second.contains(&bytes[i + 1]) {
            return Err(MqttError::InvalidEncoding(format!("invalid continuation byte at offset {}", i + 1)));
        }

        if let Some(pos) = bytes[i + 1..i + width].iter().position(|b| b & 0xC0 != 0x80) {
            return Err(MqttError::InvalidEncoding(format!("invalid continuation byte at offset {}", i + 1 + pos)));
        }

        i += width;
    }

    Ok(())
}
