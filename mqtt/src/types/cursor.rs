use crate::error::MqttError;

use super::{validate_utf8, MqttDataType, VariableByteInteger};

const MAX_LENGTH: usize = u16::MAX as usize;

/// A read position within an immutable byte slice.
///
/// Every read checks the number of remaining bytes first and fails with [MqttError::BufferUnderrun] instead of
/// reading past the end, so a cursor over a packet body can never stray into the next packet.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {

    pub fn new(buf: &'a [u8]) -> Self {
        ByteCursor { buf, pos: 0 }
    }

    /// Number of bytes read so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Splits off the next `len` bytes as a separate cursor and advances this one past them.
    /// Used to bound nested regions such as property lists.
    pub fn take(&mut self, len: usize) -> Result<ByteCursor<'a>, MqttError> {
        Ok(ByteCursor::new(self.read_slice(len)?))
    }

    /// Borrows the next `len` bytes without copying.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], MqttError> {
        self.ensure(len)?;
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Borrows everything up to the end of the buffer.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }

    pub fn read_u8(&mut self) -> Result<u8, MqttError> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    pub fn read_u16(&mut self) -> Result<u16, MqttError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, MqttError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Reads a variable byte integer. Running out of bytes mid-integer is a [MqttError::BufferUnderrun].
    pub fn read_variable_int(&mut self) -> Result<u32, MqttError> {
        match VariableByteInteger::decode(&self.buf[self.pos..])? {
            Some((vbi, consumed)) => {
                self.pos += consumed;
                Ok(vbi.value)
            },
            None => Err(MqttError::BufferUnderrun { needed: self.remaining() + 1, remaining: self.remaining() }),
        }
    }

    /// Copies the next `len` bytes into a freshly allocated buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, MqttError> {
        let slice = self.read_slice(len)?;
        let mut result = Vec::new();
        if let Err(e) = result.try_reserve_exact(len) {
            return Err(MqttError::ResourceError(format!("unable to allocate {} bytes: {}", len, e)))
        }
        result.extend_from_slice(slice);
        Ok(result)
    }

    /// Reads binary data: a two byte length followed by that many bytes.
    pub fn read_binary(&mut self) -> Result<Vec<u8>, MqttError> {
        let len = self.read_u16()? as usize;
        self.read_bytes(len)
    }

    /// Reads a UTF-8 string: a two byte length followed by that many bytes of UTF-8.
    ///
    /// Fails with [MqttError::InvalidEncoding] if the bytes are not well-formed UTF-8 or contain the null character,
    /// which MQTT does not permit (MQTT-1.5.4-2).
    pub fn read_string(&mut self) -> Result<String, MqttError> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_bytes(len)?;
        validate_utf8(&bytes)?;

        if bytes.contains(&0) {
            return Err(MqttError::InvalidEncoding("string contains the null character U+0000".into()))
        }

        String::from_utf8(bytes).map_err(|e| MqttError::InvalidEncoding(format!("{}", e.utf8_error())))
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], MqttError> {
        let mut result = [0; N];
        result.copy_from_slice(self.read_slice(N)?);
        Ok(result)
    }

    fn ensure(&self, needed: usize) -> Result<(), MqttError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(MqttError::BufferUnderrun { needed, remaining })
        }
        Ok(())
    }
}

/// Converts `val` into two Big-Endian bytes and appends them to `vec`.
pub fn push_be_u16(val: u16, vec: &mut Vec<u8>) {
    vec.extend_from_slice(&val.to_be_bytes())
}

/// Converts `val` into four Big-Endian bytes and appends them to `vec`.
pub fn push_be_u32(val: u32, vec: &mut Vec<u8>) {
    vec.extend_from_slice(&val.to_be_bytes())
}

/// Appends a two byte length followed by `bytes`. Fails if `bytes` is longer than 65,535.
pub fn push_binary(bytes: &[u8], vec: &mut Vec<u8>) -> Result<(), MqttError> {
    if bytes.len() > MAX_LENGTH {
        return Err(MqttError::ProtocolError(format!(
            "Max length for binary elements is 65535, got {}", bytes.len())))
    }
    vec.reserve(bytes.encoded_len());
    push_be_u16(bytes.len() as u16, vec);
    vec.extend_from_slice(bytes);
    Ok(())
}

/// Appends a UTF-8 string with its two byte length. Fails if the string is longer than 65,535 bytes (not characters!).
pub fn push_utf8(val: &str, vec: &mut Vec<u8>) -> Result<(), MqttError> {
    if val.len() > MAX_LENGTH {
        return Err(MqttError::ProtocolError(format!(
            "Max length for UTF-8 strings is 65535 bytes, got {}", val.len())))
    }
    push_binary(val.as_bytes(), vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_integers() {
        let src = [0xA5, 0xA5, 0xB6, 0xA5, 0xB6, 0xC7, 0xD8];
        let mut cursor = ByteCursor::new(&src);
        assert_eq!(0xA5, cursor.read_u8().unwrap());
        assert_eq!(0xA5B6, cursor.read_u16().unwrap());
        assert_eq!(0xA5B6C7D8, cursor.read_u32().unwrap());
        assert_eq!(7, cursor.position());
        assert!(cursor.is_empty());
    }

    #[test]
    fn underrun() {
        let src = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&src);
        assert_eq!(Err(MqttError::BufferUnderrun { needed: 4, remaining: 3 }), cursor.read_u32());
        // a failed read must not move the cursor
        assert_eq!(0, cursor.position());
        assert_eq!(0x0102, cursor.read_u16().unwrap());
        assert!(cursor.read_u16().is_err());
        assert_eq!(0x03, cursor.read_u8().unwrap());
        assert!(cursor.read_u8().is_err());
    }

    #[test]
    fn read_string() {
        let src: Vec<u8> = vec![0, 4, 77, 81, 84, 84, 99];
        let mut cursor = ByteCursor::new(&src);
        assert_eq!("MQTT", cursor.read_string().unwrap());
        assert_eq!(6, cursor.position());
    }

    #[test]
    fn read_empty_string() {
        let src = [0, 0];
        let mut cursor = ByteCursor::new(&src);
        assert_eq!("", cursor.read_string().unwrap());
        assert!(cursor.is_empty());
    }

    #[test]
    fn read_string_length_exceeds_buffer() {
        let src = [0, 6, 129, 90, 3];
        let mut cursor = ByteCursor::new(&src);
        assert_eq!(Err(MqttError::BufferUnderrun { needed: 6, remaining: 3 }), cursor.read_string());
    }

    #[test]
    fn read_string_invalid_utf8() {
        let src = [0, 3, 0xFF, 0xFE, 0xFD];
        let mut cursor = ByteCursor::new(&src);
        assert!(matches!(cursor.read_string(), Err(MqttError::InvalidEncoding(_))));
    }

    #[test]
    fn read_string_null_character() {
        let src = [0, 3, b'a', 0, b'b'];
        let mut cursor = ByteCursor::new(&src);
        assert!(matches!(cursor.read_string(), Err(MqttError::InvalidEncoding(_))));
    }

    #[test]
    fn read_binary() {
        let src = [0, 5, 129, 90, 3, 240, 7];
        let mut cursor = ByteCursor::new(&src);
        assert_eq!(vec![129, 90, 3, 240, 7], cursor.read_binary().unwrap());
    }

    #[test]
    fn read_variable_int() {
        let src = [0x80, 0x01, 0x05];
        let mut cursor = ByteCursor::new(&src);
        assert_eq!(128, cursor.read_variable_int().unwrap());
        assert_eq!(5, cursor.read_variable_int().unwrap());
        assert!(matches!(cursor.read_variable_int(), Err(MqttError::BufferUnderrun { .. })));

        let truncated = [0x80];
        assert!(matches!(ByteCursor::new(&truncated).read_variable_int(), Err(MqttError::BufferUnderrun { .. })));
    }

    #[test]
    fn take_bounds_nested_reads() {
        let src = [1, 2, 3, 4, 5];
        let mut cursor = ByteCursor::new(&src);
        let mut nested = cursor.take(2).unwrap();
        assert_eq!(2, cursor.position());
        assert_eq!(0x0102, nested.read_u16().unwrap());
        assert!(nested.read_u8().is_err());
        assert_eq!(&[3, 4, 5], cursor.read_rest());
        assert!(cursor.take(1).is_err());
    }

    #[test]
    fn write() {
        let mut vec = Vec::new();
        push_be_u16(0xA5B6, &mut vec);
        push_be_u32(0xA5B6C7D8, &mut vec);
        push_utf8("MQTT", &mut vec).unwrap();
        push_binary(&[9, 8], &mut vec).unwrap();
        assert_eq!(vec![0xA5, 0xB6, 0xA5, 0xB6, 0xC7, 0xD8, 0, 4, 77, 81, 84, 84, 0, 2, 9, 8], vec);
    }

    #[test]
    fn write_exceeding_max_length() {
        let mut vec = Vec::new();
        assert!(push_binary(&vec![1; 65535], &mut vec).is_ok());
        assert!(matches!(push_binary(&vec![1; 65536], &mut Vec::new()), Err(MqttError::ProtocolError(_))));
        assert!(push_utf8(&"a".repeat(65536), &mut Vec::new()).is_err());
    }
}
