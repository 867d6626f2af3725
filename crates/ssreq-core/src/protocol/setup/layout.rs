use std::ops::Range;

pub const SETUP_PACKET_LEN: usize = 8;

pub const REQUEST_TYPE_OFFSET: usize = 0;
pub const REQUEST_OFFSET: usize = 1;
pub const VALUE_RANGE: Range<usize> = 2..4;
pub const INDEX_RANGE: Range<usize> = 4..6;
pub const LENGTH_RANGE: Range<usize> = 6..8;

/// Bytes 0..4 travel in the first stream word, bytes 4..8 in the second.
pub const WORD0_RANGE: Range<usize> = 0..4;
pub const WORD1_RANGE: Range<usize> = 4..8;

pub const DIRECTION_MASK: u8 = 0x80;
pub const KIND_MASK: u8 = 0x60;
pub const KIND_SHIFT: u32 = 5;
pub const RECIPIENT_MASK: u8 = 0x1f;
