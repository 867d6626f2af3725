use super::SetupPacket;
use super::error::SetupError;
use super::layout;
use super::reader::SetupReader;

/// Decode an 8-byte control request (little-endian fields).
///
/// Trailing bytes beyond the request are ignored. The returned packet never
/// has its `received` strobe set; only the decoder raises it.
pub fn parse_setup(bytes: &[u8]) -> Result<SetupPacket, SetupError> {
    let reader = SetupReader::new(bytes);
    reader.require_len(layout::SETUP_PACKET_LEN)?;

    Ok(SetupPacket {
        request_type: reader.read_u8(layout::REQUEST_TYPE_OFFSET)?,
        request: reader.read_u8(layout::REQUEST_OFFSET)?,
        value: reader.read_u16_le(layout::VALUE_RANGE)?,
        index: reader.read_u16_le(layout::INDEX_RANGE)?,
        length: reader.read_u16_le(layout::LENGTH_RANGE)?,
        received: false,
    })
}

/// Split an 8-byte control request into the two stream words that carry it.
pub fn setup_words(bytes: &[u8]) -> Result<(u32, u32), SetupError> {
    let reader = SetupReader::new(bytes);
    reader.require_len(layout::SETUP_PACKET_LEN)?;
    Ok((
        reader.read_u32_le(layout::WORD0_RANGE)?,
        reader.read_u32_le(layout::WORD1_RANGE)?,
    ))
}
