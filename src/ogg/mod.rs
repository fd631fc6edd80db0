// Ogg container framing
//
// Ogg page structure (RFC 3533):
// - Page Header (27 bytes)
//   - Capture Pattern: "OggS" (4 bytes)
//   - Version: 0 (1 byte)
//   - Header Type: 1=continuation, 2=bos, 4=eos (1 byte)
//   - Granule Position (8 bytes, little-endian)
//   - Bitstream Serial Number (4 bytes, little-endian)
//   - Page Sequence Number (4 bytes, little-endian)
//   - CRC Checksum (4 bytes, little-endian)
//   - Number of Page Segments (1 byte)
// - Segment Table (one byte per segment)
// - Payload data
//
// The CRC covers the entire page (header, segment table, payload) with the
// checksum field itself set to zero during computation.

pub mod crc;
pub mod page;

pub use page::{OggPage, OggPageHeader};

// Ogg signature
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

// Ogg page header types
pub const OGG_HEADER_TYPE_NORMAL: u8 = 0x00;
#[allow(dead_code)]
pub const OGG_HEADER_TYPE_CONTINUATION: u8 = 0x01;
pub const OGG_HEADER_TYPE_BOS: u8 = 0x02; // Beginning of Stream
pub const OGG_HEADER_TYPE_EOS: u8 = 0x04; // End of Stream

/// Size of the fixed page header, before the segment table.
pub const OGG_PAGE_HEADER_SIZE: usize = 27;

/// Byte offset of the CRC field within the page header.
pub const OGG_CRC_OFFSET: usize = 22;

/// Maximum number of entries in one segment table.
pub const OGG_MAX_SEGMENTS: usize = 255;
