use super::error::SetupError;

pub struct SetupReader<'a> {
    bytes: &'a [u8],
}

impl<'a> SetupReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), SetupError> {
        if self.bytes.len() < needed {
            return Err(SetupError::TooShort {
                needed,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, SetupError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or(SetupError::TooShort {
                needed: offset + 1,
                actual: self.bytes.len(),
            })
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, SetupError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(SetupError::TooShort {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&self, range: std::ops::Range<usize>) -> Result<u32, SetupError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 4 {
            return Err(SetupError::TooShort {
                needed: 4,
                actual: bytes.len(),
            });
        }
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], SetupError> {
        self.bytes
            .get(range.clone())
            .ok_or(SetupError::TooShort {
                needed: range.end,
                actual: self.bytes.len(),
            })
    }
}
