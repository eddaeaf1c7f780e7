use crc32fast::Hasher as Crc32Hasher;

use crate::engine::errors::FormatError;

/// Header flag: the frame carries an explicit `is_empty` byte after the buffer.
pub const FLAG_STRICT: u16 = 0b0000_0001;
pub const KNOWN_FLAGS: u16 = FLAG_STRICT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryHeader {
    pub magic: [u8; 8],
    pub version: u16,
    pub flags: u16,
    pub reserved: u32,
    pub header_crc32: u32,
}

impl BinaryHeader {
    pub const LEN_WITHOUT_CRC: usize = 8 + 2 + 2 + 4;
    pub const TOTAL_LEN: usize = Self::LEN_WITHOUT_CRC + 4;

    pub fn new(magic: [u8; 8], version: u16, flags: u16) -> Self {
        let mut header = Self {
            magic,
            version,
            flags,
            reserved: 0,
            header_crc32: 0,
        };
        header.header_crc32 = header.compute_crc32();
        header
    }

    fn compute_crc32(&self) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(&self.magic);
        hasher.update(&self.version.to_le_bytes());
        hasher.update(&self.flags.to_le_bytes());
        hasher.update(&self.reserved.to_le_bytes());
        hasher.finalize()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.magic);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.reserved.to_le_bytes());
        out.extend_from_slice(&self.header_crc32.to_le_bytes());
    }

    /// Parses the header at the start of `data`. Only the CRC is checked here;
    /// magic and version are checked by [`FrameKind::read_and_validate_header`].
    pub fn read_from(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < Self::TOTAL_LEN {
            return Err(FormatError::ShortHeader { len: data.len() });
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&data[0..8]);
        let version = u16::from_le_bytes([data[8], data[9]]);
        let flags = u16::from_le_bytes([data[10], data[11]]);
        let reserved = u32::from_le_bytes([data[12], data[13], data[14], data[15]]);
        let header_crc32 = u32::from_le_bytes([data[16], data[17], data[18], data[19]]);

        let hdr = Self {
            magic,
            version,
            flags,
            reserved,
            header_crc32,
        };
        let expected = hdr.compute_crc32();
        if expected != header_crc32 {
            return Err(FormatError::HeaderCrcMismatch {
                stored: header_crc32,
                computed: expected,
            });
        }
        Ok(hdr)
    }

    pub fn is_strict(&self) -> bool {
        self.flags & FLAG_STRICT != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    ConcatState,
    ConcatPartial,
}

impl FrameKind {
    pub const VERSION: u16 = 1;

    pub const fn magic(&self) -> [u8; 8] {
        match self {
            FrameKind::ConcatState => *b"GCONCAT\0",
            FrameKind::ConcatPartial => *b"GCPARTL\0",
        }
    }

    pub fn header(&self, flags: u16) -> BinaryHeader {
        BinaryHeader::new(self.magic(), Self::VERSION, flags)
    }

    pub fn read_and_validate_header(&self, data: &[u8]) -> Result<BinaryHeader, FormatError> {
        let header = BinaryHeader::read_from(data)?;
        if header.magic != self.magic() {
            return Err(FormatError::BadMagic {
                found: header.magic,
            });
        }
        if header.version != Self::VERSION {
            return Err(FormatError::UnsupportedVersion(header.version));
        }
        if header.flags & !KNOWN_FLAGS != 0 {
            return Err(FormatError::UnknownFlags(header.flags));
        }
        Ok(header)
    }
}
