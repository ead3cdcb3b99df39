use crate::record::RecordError;

/// Bounds-checked reads over the captured bytes of one frame.
///
/// Offsets are absolute within the captured slice; any read past its end
/// yields `RecordError::Truncated` instead of touching uncaptured bytes.
pub struct FrameReader<'a> {
    frame: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(frame: &'a [u8]) -> Self {
        Self { frame }
    }

    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    pub fn require(&self, offset: usize, needed: usize) -> Result<(), RecordError> {
        let end = offset.saturating_add(needed);
        if self.frame.len() < end {
            return Err(RecordError::Truncated {
                needed: end,
                actual: self.frame.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, RecordError> {
        self.frame.get(offset).copied().ok_or(RecordError::Truncated {
            needed: offset + 1,
            actual: self.frame.len(),
        })
    }

    pub fn read_u16_be(&self, offset: usize) -> Result<u16, RecordError> {
        let bytes = self.read_slice(offset, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_be(&self, offset: usize) -> Result<u32, RecordError> {
        let bytes = self.read_slice(offset, 4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_slice(&self, offset: usize, len: usize) -> Result<&'a [u8], RecordError> {
        let end = offset.saturating_add(len);
        self.frame.get(offset..end).ok_or(RecordError::Truncated {
            needed: end,
            actual: self.frame.len(),
        })
    }

    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], RecordError> {
        let slice = self.read_slice(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }
}
