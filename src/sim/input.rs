//! Tilt input sampling
//!
//! The motion sensor is an external feed polled once per tick with
//! last-known-value semantics. Nothing here blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;

/// Source of the latest tilt reading
pub trait InputSampler {
    /// Most recent tilt sample, `None` until the first one arrives
    fn latest_tilt(&self) -> Option<Vec2>;
}

/// A host that already holds the sample can pass it directly
impl InputSampler for Option<Vec2> {
    fn latest_tilt(&self) -> Option<Vec2> {
        *self
    }
}

/// Sentinel for "no sample yet" (both halves NaN, never a stored sample)
const NO_SAMPLE: u64 = u64::MAX;

#[inline]
fn pack(tilt: Vec2) -> u64 {
    ((tilt.x.to_bits() as u64) << 32) | tilt.y.to_bits() as u64
}

#[inline]
fn unpack(bits: u64) -> Vec2 {
    Vec2::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
}

/// Last tilt sample shared between a sensor thread and the simulation
///
/// Both components live in one atomic word so a reader never observes
/// half of an update.
#[derive(Debug, Clone)]
pub struct SharedTilt {
    bits: Arc<AtomicU64>,
}

impl Default for SharedTilt {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedTilt {
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(NO_SAMPLE)),
        }
    }

    /// Publish a new sample. Non-finite samples are dropped.
    pub fn publish(&self, tilt: Vec2) -> bool {
        if !tilt.is_finite() {
            log::debug!("Dropping non-finite tilt sample {:?}", tilt);
            return false;
        }
        self.bits.store(pack(tilt), Ordering::Release);
        true
    }
}

impl InputSampler for SharedTilt {
    fn latest_tilt(&self) -> Option<Vec2> {
        match self.bits.load(Ordering::Acquire) {
            NO_SAMPLE => None,
            bits => Some(unpack(bits)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sample_before_first_publish() {
        let tilt = SharedTilt::new();
        assert_eq!(tilt.latest_tilt(), None);
    }

    #[test]
    fn test_last_sample_wins() {
        let tilt = SharedTilt::new();
        tilt.publish(Vec2::new(0.1, 0.2));
        tilt.publish(Vec2::new(-0.5, 0.25));
        assert_eq!(tilt.latest_tilt(), Some(Vec2::new(-0.5, 0.25)));
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let tilt = SharedTilt::new();
        tilt.publish(Vec2::new(0.3, 0.0));
        assert!(!tilt.publish(Vec2::new(f32::NAN, 0.0)));
        assert_eq!(tilt.latest_tilt(), Some(Vec2::new(0.3, 0.0)));
    }

    #[test]
    fn test_clones_share_the_sample() {
        let writer = SharedTilt::new();
        let reader = writer.clone();
        let handle = std::thread::spawn(move || {
            writer.publish(Vec2::new(0.75, -1.0));
        });
        handle.join().unwrap();
        assert_eq!(reader.latest_tilt(), Some(Vec2::new(0.75, -1.0)));
    }

    #[test]
    fn test_negative_zero_round_trips() {
        let tilt = SharedTilt::new();
        tilt.publish(Vec2::new(-0.0, 1.0));
        let sample = tilt.latest_tilt().unwrap();
        assert!(sample.x.is_sign_negative());
    }
}
