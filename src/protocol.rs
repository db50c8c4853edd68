//! Fixed binary pose datagram codec.
//!
//! One pose per packet: six 64-bit IEEE-754 values, little-endian, in the
//! order `[x, y, z, pitch, roll, yaw]`, 48 bytes total. No versioning, no
//! checksum. The layout matches the UDP input of the opentrack head
//! tracking suite and must stay bit-exact for interoperability.

use crate::constants::{POSE_CHANNELS, POSE_PACKET_BYTES};
use crate::head::HeadPose;
use crate::{Error, Result};

/// Pack a pose into the 48-byte wire layout
#[must_use]
pub fn encode(pose: &HeadPose) -> [u8; POSE_PACKET_BYTES] {
    let channels = [pose.x, pose.y, pose.z, pose.pitch, pose.roll, pose.yaw];
    let mut buf = [0u8; POSE_PACKET_BYTES];
    for (chunk, value) in buf.chunks_exact_mut(8).zip(channels) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    buf
}

/// Exact inverse of [`encode`]
///
/// # Errors
///
/// Returns `MalformedPacket` unless the buffer is exactly 48 bytes
pub fn decode(buf: &[u8]) -> Result<HeadPose> {
    if buf.len() != POSE_PACKET_BYTES {
        return Err(Error::MalformedPacket {
            expected: POSE_PACKET_BYTES,
            got: buf.len(),
        });
    }

    let mut channels = [0.0_f64; POSE_CHANNELS];
    for (value, chunk) in channels.iter_mut().zip(buf.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        *value = f64::from_le_bytes(bytes);
    }

    let [x, y, z, pitch, roll, yaw] = channels;
    Ok(HeadPose {
        x,
        y,
        z,
        pitch,
        roll,
        yaw,
    })
}
