//! Shake detection over raw accelerometer samples.
//!
//! The browser delivers `devicemotion` readings far faster than the game needs,
//! so the detector throttles to one accepted sample per 100 ms and compares the
//! summed axes of consecutive accepted samples. The per-millisecond change,
//! scaled to a convenient range, is the shake "speed"; only speeds above a
//! fixed threshold count as shakes.

/// Minimum spacing between accepted samples.
const THROTTLE_MS: f64 = 100.0;

/// Speeds at or below this are ordinary handling noise, not shakes.
const SHAKE_THRESHOLD: f64 = 800.0;

/// Scale factor applied to the per-millisecond axis delta.
const SPEED_SCALE: f64 = 10_000.0;

/// One raw accelerometer reading (acceleration including gravity). Axes are
/// optional because the browser reports null on devices without a full sensor.
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub timestamp_ms: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, z: f64, timestamp_ms: f64) -> Self {
        Sample {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            timestamp_ms,
        }
    }
}

/// A detected abrupt acceleration change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShakeEvent {
    pub magnitude: f64,
}

/// Stateful detector turning a sample stream into discrete shake events.
///
/// Reset (recreate) at every session start so a stale baseline from a previous
/// session cannot produce a phantom first shake.
#[derive(Debug, Default)]
pub struct ShakeDetector {
    last_axes: Option<(f64, f64, f64)>,
    last_accepted_ms: Option<f64>,
}

impl ShakeDetector {
    pub fn new() -> Self {
        ShakeDetector::default()
    }

    /// Feed one sample; returns a shake event when the movement since the last
    /// accepted sample is violent enough.
    ///
    /// Samples inside the throttle window are dropped. Samples with any
    /// missing axis are dropped without advancing the throttle window or the
    /// axis baseline; the next complete sample still measures against the
    /// last complete one.
    pub fn process(&mut self, sample: &Sample) -> Option<ShakeEvent> {
        let elapsed = match self.last_accepted_ms {
            Some(last) => {
                let elapsed = sample.timestamp_ms - last;
                if elapsed < THROTTLE_MS {
                    return None;
                }
                Some(elapsed)
            }
            None => None,
        };

        let (x, y, z) = match (sample.x, sample.y, sample.z) {
            (Some(x), Some(y), Some(z)) => (x, y, z),
            _ => return None,
        };

        self.last_accepted_ms = Some(sample.timestamp_ms);
        let previous = self.last_axes.replace((x, y, z));

        let (last_x, last_y, last_z) = previous?;
        let elapsed = elapsed?;

        let delta = (x + y + z - (last_x + last_y + last_z)).abs();
        let speed = delta / elapsed * SPEED_SCALE;
        if speed > SHAKE_THRESHOLD {
            Some(ShakeEvent { magnitude: speed })
        } else {
            None
        }
    }
}
