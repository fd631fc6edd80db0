// Opus control packets for the Ogg container
//
// Ogg Opus file structure (RFC 7845):
// - Identification header: "OpusHead" packet, alone on the first page
// - Comment header: "OpusTags" packet with a Vorbis-style comment block,
//   alone on the second page
// - Audio data pages
//
// Reference:
// - https://wiki.xiph.org/OggOpus
// - RFC 7845: Ogg Encapsulation for the Opus Audio Codec

use byteorder::{LittleEndian, WriteBytesExt};
use serde::Serialize;

use crate::config::AudioConfig;

pub const OPUS_SIGNATURE: &[u8; 8] = b"OpusHead";
pub const OPUS_TAGS: &[u8; 8] = b"OpusTags";

/// Size of the identification packet in bytes.
pub const OPUS_HEAD_SIZE: usize = 19;

/// Decoder pre-skip in 48 kHz samples. A conservative static default for
/// encoder delay, not measured per input.
pub const OPUS_PRE_SKIP: u16 = 3840;

/// Vendor string written into the comment packet.
pub const VENDOR_STRING: &str = concat!("opusmux ", env!("CARGO_PKG_VERSION"));

/// Build the 19-byte "OpusHead" identification packet.
pub fn opus_head(config: &AudioConfig) -> Vec<u8> {
    let mut packet = Vec::with_capacity(OPUS_HEAD_SIZE);
    packet.extend_from_slice(OPUS_SIGNATURE);
    packet.push(1); // version
    packet.push(config.channels);
    packet
        .write_u16::<LittleEndian>(OPUS_PRE_SKIP)
        .expect("write to Vec cannot fail");
    packet
        .write_u32::<LittleEndian>(config.sample_rate)
        .expect("write to Vec cannot fail");
    packet
        .write_i16::<LittleEndian>(0) // output gain
        .expect("write to Vec cannot fail");
    packet.push(0); // channel mapping family
    packet
}

/// Build the "OpusTags" comment packet with the fixed vendor string and an
/// empty user comment list.
pub fn opus_tags() -> Vec<u8> {
    let vendor = VENDOR_STRING.as_bytes();
    let mut packet = Vec::with_capacity(8 + 4 + vendor.len() + 4);
    packet.extend_from_slice(OPUS_TAGS);
    packet
        .write_u32::<LittleEndian>(vendor.len() as u32)
        .expect("write to Vec cannot fail");
    packet.extend_from_slice(vendor);
    packet
        .write_u32::<LittleEndian>(0) // user comment count
        .expect("write to Vec cannot fail");
    packet
}

/// Parsed "OpusHead" identification packet.
#[derive(Debug, Clone, Serialize)]
pub struct OpusHead {
    pub version: u8,
    pub channels: u8,
    pub pre_skip: u16,
    pub sample_rate: u32,
    pub output_gain: i16,
    pub mapping_family: u8,
}

impl OpusHead {
    /// Parse an identification packet, typically the first page's payload.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < OPUS_HEAD_SIZE || &data[0..8] != OPUS_SIGNATURE {
            return None;
        }
        Some(OpusHead {
            version: data[8],
            channels: data[9],
            pre_skip: u16::from_le_bytes(data[10..12].try_into().unwrap()),
            sample_rate: u32::from_le_bytes(data[12..16].try_into().unwrap()),
            output_gain: i16::from_le_bytes(data[16..18].try_into().unwrap()),
            mapping_family: data[18],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opus_head_layout() {
        let config = AudioConfig::default();
        let packet = opus_head(&config);

        assert_eq!(packet.len(), OPUS_HEAD_SIZE);
        assert_eq!(&packet[0..8], b"OpusHead");
        assert_eq!(packet[8], 1);
        assert_eq!(packet[9], 1);
        assert_eq!(u16::from_le_bytes(packet[10..12].try_into().unwrap()), 3840);
        assert_eq!(
            u32::from_le_bytes(packet[12..16].try_into().unwrap()),
            16000
        );
        assert_eq!(i16::from_le_bytes(packet[16..18].try_into().unwrap()), 0);
        assert_eq!(packet[18], 0);
    }

    #[test]
    fn test_opus_head_round_trip() {
        let config = AudioConfig {
            sample_rate: 48000,
            channels: 2,
            ..AudioConfig::default()
        };
        let head = OpusHead::parse(&opus_head(&config)).expect("valid packet");
        assert_eq!(head.channels, 2);
        assert_eq!(head.sample_rate, 48000);
        assert_eq!(head.pre_skip, OPUS_PRE_SKIP);
    }

    #[test]
    fn test_opus_tags_layout() {
        let packet = opus_tags();
        let vendor = VENDOR_STRING.as_bytes();

        assert_eq!(&packet[0..8], b"OpusTags");
        assert_eq!(
            u32::from_le_bytes(packet[8..12].try_into().unwrap()) as usize,
            vendor.len()
        );
        assert_eq!(&packet[12..12 + vendor.len()], vendor);
        // empty user comment list terminates the packet
        assert_eq!(
            u32::from_le_bytes(packet[12 + vendor.len()..].try_into().unwrap()),
            0
        );
    }
}
