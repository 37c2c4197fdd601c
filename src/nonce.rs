//! Nonce codec: numeric nonces and their fixed-length little-endian byte form.
//!
//! A nonce is logically a `u32`. On the wire it is a buffer of at least
//! [`MIN_NONCE_LENGTH`] bytes holding the value little-endian in the first four bytes,
//! with every trailing byte zero on encode and ignored on decode.
use crate::error::{ConfigError, Error, Result};
use crate::types::hex_bytes;
use serde::{Deserialize, Serialize};

/// Smallest accepted nonce buffer; also the default `nonce_length`.
pub const MIN_NONCE_LENGTH: usize = 4;

/// A caller-supplied nonce, either the bare integer or an already encoded buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nonce {
    Value(u32),
    Bytes(#[serde(with = "hex_bytes")] Vec<u8>),
}

impl Default for Nonce {
    fn default() -> Self {
        Nonce::Value(1)
    }
}

impl From<u32> for Nonce {
    fn from(value: u32) -> Self {
        Nonce::Value(value)
    }
}

impl From<Vec<u8>> for Nonce {
    fn from(bytes: Vec<u8>) -> Self {
        Nonce::Bytes(bytes)
    }
}

impl From<&[u8]> for Nonce {
    fn from(bytes: &[u8]) -> Self {
        Nonce::Bytes(bytes.to_vec())
    }
}

impl Nonce {
    /// The 32-bit value carried by this nonce.
    pub fn value(&self) -> Result<u32> {
        match self {
            Nonce::Value(value) => Ok(*value),
            Nonce::Bytes(bytes) => decode(bytes),
        }
    }

    /// Length of the buffer form, if this nonce was supplied as bytes.
    pub fn buffer_len(&self) -> Option<usize> {
        match self {
            Nonce::Value(_) => None,
            Nonce::Bytes(bytes) => Some(bytes.len()),
        }
    }

    /// Canonical byte form. Integer nonces are encoded into `length` bytes; buffers
    /// are returned as-is once their 32-bit prefix is readable.
    pub fn to_bytes(&self, length: usize) -> Result<Vec<u8>> {
        match self {
            Nonce::Value(value) => encode(*value, length),
            Nonce::Bytes(bytes) => {
                decode(bytes)?;
                Ok(bytes.clone())
            }
        }
    }
}

/// Write `value` little-endian into the first four bytes of a zeroed `length`-byte buffer.
pub fn encode(value: u32, length: usize) -> Result<Vec<u8>> {
    if length < MIN_NONCE_LENGTH {
        return Err(ConfigError::NonceLengthTooSmall(length).into());
    }
    let mut out = vec![0u8; length];
    out[..MIN_NONCE_LENGTH].copy_from_slice(&value.to_le_bytes());
    Ok(out)
}

/// Read the little-endian `u32` held in the first four bytes of `buffer`.
pub fn decode(buffer: &[u8]) -> Result<u32> {
    let prefix: [u8; MIN_NONCE_LENGTH] = buffer
        .get(..MIN_NONCE_LENGTH)
        .and_then(|head| head.try_into().ok())
        .ok_or_else(|| {
            Error::MalformedNonce(format!(
                "nonce buffer must be at least {MIN_NONCE_LENGTH} bytes, got {}",
                buffer.len()
            ))
        })?;
    Ok(u32::from_le_bytes(prefix))
}

/// Nonce buffers covered by a search of `max_nonces` attempts starting at `start`.
///
/// Only the 32-bit prefix is incremented; trailing bytes are carried unchanged. The
/// window stops at `u32::MAX` rather than wrapping.
pub fn search_window(start: &[u8], max_nonces: u64) -> Result<SearchWindow> {
    let first = decode(start)?;
    Ok(SearchWindow {
        next: Some(first),
        remaining: max_nonces,
        template: start.to_vec(),
    })
}

/// Iterator returned by [`search_window`].
#[derive(Debug, Clone)]
pub struct SearchWindow {
    next: Option<u32>,
    remaining: u64,
    template: Vec<u8>,
}

impl Iterator for SearchWindow {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = current.checked_add(1);
        let mut buffer = self.template.clone();
        buffer[..MIN_NONCE_LENGTH].copy_from_slice(&current.to_le_bytes());
        Some(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn encode_decode_round_trip(value in any::<u32>(), length in 4usize..64) {
            let encoded = encode(value, length).unwrap();
            prop_assert_eq!(encoded.len(), length);
            prop_assert!(encoded[4..].iter().all(|b| *b == 0));
            prop_assert_eq!(decode(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn encode_is_little_endian() {
        let encoded = encode(0x0403_0201, 6).expect("encode");
        assert_eq!(encoded, vec![1, 2, 3, 4, 0, 0]);
    }

    #[test]
    fn encode_rejects_short_length() {
        let err = encode(1, 3).expect_err("length 3 must be rejected");
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigError::NonceLengthTooSmall(3))
        ));
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        assert_eq!(decode(&[7, 0, 0, 0, 0xff, 0xff]).expect("decode"), 7);
    }

    #[test]
    fn decode_rejects_short_buffer() {
        let err = decode(&[1, 2, 3]).expect_err("3-byte buffer must be rejected");
        assert!(matches!(err, Error::MalformedNonce(_)));
    }

    #[test]
    fn nonce_to_bytes_uses_requested_length_for_values() {
        let bytes = Nonce::Value(258).to_bytes(8).expect("to_bytes");
        assert_eq!(bytes, vec![2, 1, 0, 0, 0, 0, 0, 0]);
        let buffer = Nonce::Bytes(vec![9, 0, 0, 0, 5]);
        assert_eq!(buffer.to_bytes(4).expect("to_bytes"), vec![9, 0, 0, 0, 5]);
        assert_eq!(buffer.value().expect("value"), 9);
    }

    #[test]
    fn search_window_increments_prefix_and_keeps_tail() {
        let window: Vec<_> = search_window(&[0xfe, 0, 0, 0, 0xaa], 3)
            .expect("window")
            .collect();
        assert_eq!(
            window,
            vec![
                vec![0xfe, 0, 0, 0, 0xaa],
                vec![0xff, 0, 0, 0, 0xaa],
                vec![0, 1, 0, 0, 0xaa],
            ]
        );
    }

    #[test]
    fn search_window_stops_at_u32_max() {
        let start = encode(u32::MAX - 1, 4).expect("encode");
        let window: Vec<_> = search_window(&start, 10).expect("window").collect();
        assert_eq!(window.len(), 2);
        assert_eq!(decode(&window[1]).expect("decode"), u32::MAX);
    }

    #[test]
    fn nonce_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Nonce::Value(5)).unwrap(), "5");
        assert_eq!(
            serde_json::to_string(&Nonce::Bytes(vec![1, 0, 0, 0])).unwrap(),
            "\"01000000\""
        );
        let back: Nonce = serde_json::from_str("\"01000000\"").unwrap();
        assert_eq!(back, Nonce::Bytes(vec![1, 0, 0, 0]));
    }
}
