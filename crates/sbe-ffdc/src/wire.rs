//! Wire constants and big-endian word helpers shared by the frame and chain decoders.

/// Size in bytes of one FIFO word.
pub const WORD_BYTES: usize = 4;

/// Smallest response the engine can produce: payload-free frame padded to four words.
pub const MIN_RESPONSE_LEN: usize = 0x10;

/// Size of the fixed status frame (frame header, status word, distance word).
pub const STATUS_FRAME_BYTES: usize = 3 * WORD_BYTES;

/// Mask selecting the sentinel half of the frame header word.
pub const FRAME_MAGIC_MASK: u32 = 0xFFFF_0000;

/// Sentinel expected in the upper half of the frame header word.
pub const FRAME_MAGIC: u32 = 0xC0DE_0000;

/// Sentinel opening every FFDC record.
pub const FFDC_MAGIC: u16 = 0xFBAD;

/// Size in bytes of the fixed FFDC record header.
pub const FFDC_HEADER_BYTES: usize = 16;

/// Size in words of the fixed FFDC record header.
pub const FFDC_HEADER_WORDS: u16 = 4;

/// Reads a big-endian `u16` at `offset`, or `None` when it would run past `bytes`.
#[inline]
#[must_use]
pub fn read_u16_be(bytes: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    let raw: [u8; 2] = bytes.get(offset..end)?.try_into().ok()?;
    Some(u16::from_be_bytes(raw))
}

/// Reads a big-endian `u32` at `offset`, or `None` when it would run past `bytes`.
#[inline]
#[must_use]
pub fn read_u32_be(bytes: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(WORD_BYTES)?;
    let raw: [u8; 4] = bytes.get(offset..end)?.try_into().ok()?;
    Some(u32::from_be_bytes(raw))
}

/// Returns `true` when the upper half of `word` carries the frame sentinel.
#[inline]
#[must_use]
pub const fn is_frame_magic(word: u32) -> bool {
    word & FRAME_MAGIC_MASK == FRAME_MAGIC
}

/// Returns `true` when `bytes` opens with the FFDC record sentinel.
///
/// Callers use this to decide whether a chip-op payload is itself an FFDC
/// chain that should be fed back into the chain decoder.
#[must_use]
pub fn starts_with_ffdc_magic(bytes: &[u8]) -> bool {
    read_u16_be(bytes, 0) == Some(FFDC_MAGIC)
}
