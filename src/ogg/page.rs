use std::io::{Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{MuxError, Result};
use crate::ogg::{
    crc, OGG_CRC_OFFSET, OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_EOS, OGG_MAX_SEGMENTS,
    OGG_PAGE_HEADER_SIZE, OGG_SIGNATURE,
};

/// Largest packet payload that fits in a single page.
///
/// A packet of length n uses n/255 + 1 lacing values (the last one marks the
/// packet boundary), and a page holds at most 255 of them.
pub const MAX_PAGE_PAYLOAD: usize = OGG_MAX_SEGMENTS * 255 - 1;

/// Ogg page header
#[derive(Debug, Clone)]
pub struct OggPageHeader {
    pub version: u8,
    pub header_type: u8,
    pub granule_position: u64,
    pub bitstream_serial: u32,
    pub page_sequence: u32,
    pub crc: u32,
    pub segment_count: u8,
    pub segment_table: Vec<u8>,
}

/// Ogg page
#[derive(Debug, Clone)]
pub struct OggPage {
    pub header: OggPageHeader,
    pub payload: Vec<u8>,
}

/// Build the lacing table for one packet payload.
///
/// Each lacing value covers up to 255 payload bytes; the final value is
/// always below 255, so a payload that is an exact multiple of 255 ends in
/// an explicit zero lace marking the packet boundary.
fn lacing_table(payload_len: usize) -> Result<Vec<u8>> {
    let count = payload_len / 255 + 1;
    if count > OGG_MAX_SEGMENTS {
        return Err(MuxError::PacketTooLarge {
            size: payload_len,
            max: MAX_PAGE_PAYLOAD,
        });
    }

    let mut table = Vec::with_capacity(count);
    for _ in 0..payload_len / 255 {
        table.push(255);
    }
    table.push((payload_len % 255) as u8);
    Ok(table)
}

impl OggPageHeader {
    /// Read an Ogg page header from a reader
    pub fn read<R: Read>(reader: &mut R) -> Option<Self> {
        let mut header = [0u8; OGG_PAGE_HEADER_SIZE];
        if reader.read_exact(&mut header).is_err() {
            return None;
        }

        // Check Ogg signature
        if &header[0..4] != OGG_SIGNATURE {
            return None;
        }

        let version = header[4];
        if version != 0 {
            return None;
        }

        let header_type = header[5];
        let granule_position = u64::from_le_bytes(header[6..14].try_into().unwrap());
        let bitstream_serial = u32::from_le_bytes(header[14..18].try_into().unwrap());
        let page_sequence = u32::from_le_bytes(header[18..22].try_into().unwrap());
        let crc = u32::from_le_bytes(header[22..26].try_into().unwrap());
        let segment_count = header[26];

        // Read segment table
        let mut segment_table = vec![0u8; segment_count as usize];
        if reader.read_exact(&mut segment_table).is_err() {
            return None;
        }

        Some(OggPageHeader {
            version,
            header_type,
            granule_position,
            bitstream_serial,
            page_sequence,
            crc,
            segment_count,
            segment_table,
        })
    }

    /// Calculate total page payload size from the segment table
    pub fn payload_size(&self) -> usize {
        self.segment_table.iter().map(|&x| x as usize).sum()
    }

    /// Check if this is the beginning of a stream
    pub fn is_bos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_BOS != 0
    }

    /// Check if this is the end of a stream
    pub fn is_eos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_EOS != 0
    }
}

impl OggPage {
    /// Frame one logical packet into a page.
    ///
    /// Fails with [`MuxError::PacketTooLarge`] if the payload does not fit in
    /// a single page; packets never span pages here, so the continuation
    /// flag is never set.
    pub fn new(
        payload: Vec<u8>,
        header_type: u8,
        granule_position: u64,
        bitstream_serial: u32,
        page_sequence: u32,
    ) -> Result<Self> {
        let segment_table = lacing_table(payload.len())?;
        Ok(OggPage {
            header: OggPageHeader {
                version: 0,
                header_type,
                granule_position,
                bitstream_serial,
                page_sequence,
                crc: 0,
                segment_count: segment_table.len() as u8,
                segment_table,
            },
            payload,
        })
    }

    /// Read an Ogg page from a reader
    pub fn read<R: Read>(reader: &mut R) -> Option<Self> {
        let header = OggPageHeader::read(reader)?;

        let payload_size = header.payload_size();
        let mut payload = vec![0u8; payload_size];
        if reader.read_exact(&mut payload).is_err() {
            return None;
        }

        Some(OggPage { header, payload })
    }

    /// Serialize the page with its checksum patched in.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = &self.header;
        let total =
            OGG_PAGE_HEADER_SIZE + header.segment_table.len() + self.payload.len();
        let mut buf = Vec::with_capacity(total);

        buf.write_all(OGG_SIGNATURE).expect("write to Vec cannot fail");
        buf.write_u8(header.version).expect("write to Vec cannot fail");
        buf.write_u8(header.header_type)
            .expect("write to Vec cannot fail");
        buf.write_u64::<LittleEndian>(header.granule_position)
            .expect("write to Vec cannot fail");
        buf.write_u32::<LittleEndian>(header.bitstream_serial)
            .expect("write to Vec cannot fail");
        buf.write_u32::<LittleEndian>(header.page_sequence)
            .expect("write to Vec cannot fail");
        // CRC placeholder, patched below once the full page is assembled
        buf.write_u32::<LittleEndian>(0).expect("write to Vec cannot fail");
        buf.write_u8(header.segment_count)
            .expect("write to Vec cannot fail");
        buf.write_all(&header.segment_table)
            .expect("write to Vec cannot fail");
        buf.write_all(&self.payload).expect("write to Vec cannot fail");

        let checksum = crc::crc32(&buf);
        buf[OGG_CRC_OFFSET..OGG_CRC_OFFSET + 4].copy_from_slice(&checksum.to_le_bytes());
        buf
    }
}
