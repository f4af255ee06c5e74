//! Consistent-overhead byte stuffing with a NUL frame delimiter.
//!
//! An encoded frame is a run of non-zero bytes terminated by exactly one
//! `0x00`, so a receiver can resynchronize on the delimiter no matter what
//! noise precedes it. The encoded stream is partitioned into groups: a group
//! header holds the distance to the next header, and a header of `0xFF`
//! (the block marker) means 254 data bytes follow with no zero implied at
//! the boundary.

use bytes::{Bytes, BytesMut};

/// Longest run of data bytes a single group header can cover.
const MAX_GROUP_LEN: usize = 254;

/// Group header value for a length-terminated (block) group.
const BLOCK_MARKER: u8 = 0xFF;

/// Worst-case encoded size for `len` input bytes: one overhead byte, one
/// delimiter, and one extra marker per 254-byte zero-free run.
pub const fn max_encoded_len(len: usize) -> usize {
    len + len.div_ceil(MAX_GROUP_LEN) + 2
}

/// Encode `input` into a delimited frame.
///
/// Returns `None` for empty input. The output contains no `0x00` except the
/// final byte, which is always `0x00`.
pub fn encode(input: &[u8]) -> Option<Bytes> {
    if input.is_empty() {
        return None;
    }

    let mut output = BytesMut::zeroed(max_encoded_len(input.len()));

    // marker_index is the reserved slot for the current group's header; it is
    // patched once the group's length is known.
    let mut marker_index = 0usize;
    let mut output_index = 1usize;
    for &byte in input {
        if byte == 0x00 {
            output[marker_index] = (output_index - marker_index) as u8;
            marker_index = output_index;
            output_index += 1;
        } else if output_index - marker_index > MAX_GROUP_LEN {
            // 254 data bytes since the last header: emit a block marker and
            // open a fresh group. No zero is implied at this boundary.
            output[marker_index] = BLOCK_MARKER;
            marker_index = output_index;
            output_index += 1;
            output[output_index] = byte;
            output_index += 1;
        } else {
            output[output_index] = byte;
            output_index += 1;
        }
    }

    output[marker_index] = (output_index - marker_index) as u8;
    output[output_index] = 0x00;
    output_index += 1;

    output.truncate(output_index);
    Some(output.freeze())
}

/// Decode one frame. `input` must not include the trailing `0x00` delimiter.
///
/// Returns `None` for any malformed input: a frame shorter than two bytes, a
/// zero group header, a header pointing past the end of the buffer, or a
/// stray `0x00` inside the encoded content. No input panics or reads out of
/// bounds.
pub fn decode(input: &[u8]) -> Option<Bytes> {
    // A one-byte frame is impossible: the overhead byte would point at a
    // data byte that does not exist.
    if input.len() <= 1 {
        return None;
    }
    if input[0] == 0x00 {
        return None;
    }
    if input[0] as usize > input.len() {
        return None;
    }

    let mut output = BytesMut::zeroed(input.len() - 1);

    let mut output_index = 0usize;
    let mut next_marker_index = input[0] as usize;
    let mut was_block_marker = input[0] == BLOCK_MARKER;

    for (i, &byte) in input.iter().enumerate().skip(1) {
        if byte == 0x00 {
            return None;
        }
        if i == next_marker_index {
            if !was_block_marker {
                output[output_index] = 0x00;
                output_index += 1;
            }
            next_marker_index = i + byte as usize;
            if next_marker_index > input.len() {
                return None;
            }
            was_block_marker = byte == BLOCK_MARKER;
        } else {
            output[output_index] = byte;
            output_index += 1;
        }
    }

    output.truncate(output_index);
    Some(output.freeze())
}
