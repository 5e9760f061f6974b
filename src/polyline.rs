//! Encoded-polyline codec (standard 5-decimal-precision format).
//!
//! Coordinates are stored as deltas against a running accumulator, zig-zag
//! mapped to unsigned, and emitted as base-63-offset ASCII in 5-bit chunks.
//! The format is the widely implemented public one, so encoded strings are
//! portable across client libraries.

use thiserror::Error;

use crate::geo::GeoCoordinate;

/// Fixed precision of the format: 5 decimal degrees (~1.1 cm).
const SCALE: f64 = 1e5;

/// Decoding failures. These indicate corrupt stored text, not transient
/// conditions, and must surface to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// The byte stream ended while a chunk still had its continuation bit set,
    /// or a latitude arrived without its longitude.
    #[error("truncated polyline at byte offset {0}")]
    Truncated(usize),
    /// A byte below the base-63 offset, which no encoder produces.
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },
    /// A continuation run longer than one 64-bit value can hold.
    #[error("overlong polyline value at byte offset {0}")]
    Overlong(usize),
}

/// Encodes an ordered coordinate sequence to polyline text.
///
/// The empty sequence encodes to the empty string. Latitude is emitted before
/// longitude for each point.
pub fn encode(points: &[GeoCoordinate]) -> String {
    let mut out = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for point in points {
        let lat = scale(point.latitude);
        let lng = scale(point.longitude);
        write_value(lat - prev_lat, &mut out);
        write_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

/// Decodes polyline text back into coordinates.
///
/// `decode(&encode(p))` reproduces `p` within 1e-5 degrees; `decode("")` is
/// the empty sequence. Malformed text is a hard error, never a silently
/// shortened result.
pub fn decode(text: &str) -> Result<Vec<GeoCoordinate>, PolylineError> {
    let bytes = text.as_bytes();
    let mut points = Vec::new();
    let mut offset = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while offset < bytes.len() {
        let (delta_lat, after_lat) = read_value(bytes, offset)?;
        if after_lat >= bytes.len() {
            return Err(PolylineError::Truncated(after_lat));
        }
        let (delta_lng, after_lng) = read_value(bytes, after_lat)?;

        lat += delta_lat;
        lng += delta_lng;
        points.push(GeoCoordinate::new(lat as f64 / SCALE, lng as f64 / SCALE));
        offset = after_lng;
    }

    Ok(points)
}

fn scale(degrees: f64) -> i64 {
    (degrees * SCALE).round() as i64
}

/// Zig-zag maps the signed delta, then emits it LSB-first in 5-bit chunks,
/// setting 0x20 on every chunk except the last.
fn write_value(delta: i64, out: &mut String) {
    let mut value = ((delta << 1) ^ (delta >> 63)) as u64;
    loop {
        let mut chunk = (value & 0x1f) as u8;
        value >>= 5;
        if value > 0 {
            chunk |= 0x20;
        }
        out.push(char::from(chunk + 63));
        if value == 0 {
            break;
        }
    }
}

fn read_value(bytes: &[u8], start: usize) -> Result<(i64, usize), PolylineError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut offset = start;

    loop {
        let Some(&byte) = bytes.get(offset) else {
            return Err(PolylineError::Truncated(offset));
        };
        if byte < 63 {
            return Err(PolylineError::InvalidByte { byte, offset });
        }
        // 13 chunks exhaust a u64; a longer run cannot come from an encoder
        // and would otherwise shift past the value width.
        if shift > 63 {
            return Err(PolylineError::Overlong(offset));
        }
        let chunk = u64::from(byte - 63);
        value |= (chunk & 0x1f) << shift;
        offset += 1;
        if chunk & 0x20 == 0 {
            break;
        }
        shift += 5;
    }

    let delta = if value & 1 == 0 {
        (value >> 1) as i64
    } else {
        !((value >> 1) as i64)
    };
    Ok((delta, offset))
}
