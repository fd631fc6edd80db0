// Ogg page checksum
//
// Ogg does not use the common reflected CRC-32 (as found in zlib). It uses
// the forward variant from libogg: polynomial 0x04C11DB7, initial value 0,
// no bit reflection, no final XOR. See RFC 3533 section 6 and
// https://github.com/xiph/ogg/blob/master/src/framing.c

const OGG_CRC_POLY: u32 = 0x04C11DB7;

const CRC_TABLE: [u32; 256] = build_crc_table();

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 24;
        let mut j = 0;
        while j < 8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ OGG_CRC_POLY
            } else {
                crc << 1
            };
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute the Ogg CRC-32 of a buffer.
///
/// For page checksums the caller passes the complete page bytes with the
/// 4-byte CRC field zeroed.
pub fn crc32(buf: &[u8]) -> u32 {
    let mut crc: u32 = 0;
    for &byte in buf {
        crc = (crc << 8) ^ CRC_TABLE[((crc >> 24) as u8 ^ byte) as usize];
    }
    crc
}
