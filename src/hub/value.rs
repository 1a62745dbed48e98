//! Broadcast values and the frames that carry them
//!
//! One value is drawn per tick and rendered once; every fanout task of that
//! tick receives a clone of the same [`Frame`].

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest value the station ever broadcasts
pub const MAX_VALUE: u8 = 254;

/// A value in the range `0..=254`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BroadcastValue(u8);

impl BroadcastValue {
    /// Wrap a raw byte, rejecting 255
    pub fn new(value: u8) -> Option<Self> {
        (value <= MAX_VALUE).then_some(Self(value))
    }

    /// The raw value
    pub fn get(self) -> u8 {
        self.0
    }

    /// Two lowercase, zero-padded hex digits ("00" through "fe")
    pub fn render(self) -> String {
        format!("{:02x}", self.0)
    }
}

impl std::fmt::Display for BroadcastValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

/// Payload of one tick
///
/// Cheap to clone: the rendered body is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    value: BroadcastValue,
    body: Bytes,
}

impl Frame {
    /// Render a frame for the given value
    pub fn new(value: BroadcastValue) -> Self {
        Self {
            value,
            body: Bytes::from(value.render()),
        }
    }

    /// The value this frame carries
    pub fn value(&self) -> BroadcastValue {
        self.value
    }

    /// Wire body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Wire body as text
    pub fn as_str(&self) -> &str {
        // Body is always two ASCII hex digits.
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

/// Source of broadcast values, owned by the hub
pub trait ValueSource: Send + 'static {
    /// Draw the next value, uniformly from `0..=254`
    fn next_value(&mut self) -> BroadcastValue;
}

/// [`ValueSource`] backed by a `StdRng`
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    /// Deterministic source: the same seed yields the same sequence
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, entropy-seeded otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl ValueSource for SeededSource {
    fn next_value(&mut self) -> BroadcastValue {
        BroadcastValue(self.rng.gen_range(0..=MAX_VALUE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_rejects_255() {
        assert!(BroadcastValue::new(255).is_none());
        assert_eq!(BroadcastValue::new(254).map(BroadcastValue::get), Some(254));
        assert_eq!(BroadcastValue::new(0).map(BroadcastValue::get), Some(0));
    }

    #[test]
    fn test_render_zero_padded_lowercase() {
        let cases = [(0u8, "00"), (9, "09"), (10, "0a"), (171, "ab"), (254, "fe")];

        for (raw, expected) in cases {
            let value = BroadcastValue::new(raw).unwrap();
            assert_eq!(value.render(), expected);
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn test_frame_body_matches_value() {
        let frame = Frame::new(BroadcastValue::new(0x2c).unwrap());

        assert_eq!(frame.as_str(), "2c");
        assert_eq!(frame.body().as_ref(), b"2c");
        assert_eq!(frame.value().get(), 0x2c);
    }

    #[test]
    fn test_frame_clone_shares_body() {
        let frame = Frame::new(BroadcastValue::new(7).unwrap());
        let clone = frame.clone();

        assert_eq!(frame.body().as_ptr(), clone.body().as_ptr());
    }

    #[test]
    fn test_seeded_source_is_deterministic() {
        let mut a = SeededSource::from_seed(42);
        let mut b = SeededSource::from_seed(42);

        let seq_a: Vec<_> = (0..64).map(|_| a.next_value()).collect();
        let seq_b: Vec<_> = (0..64).map(|_| b.next_value()).collect();

        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_source_stays_in_range() {
        let mut source = SeededSource::from_seed(7);

        for _ in 0..10_000 {
            let value = source.next_value();
            assert!(value.get() <= MAX_VALUE);

            let text = value.render();
            assert_eq!(text.len(), 2);
            assert!(text.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
            assert_ne!(text, "ff");
        }
    }
}
