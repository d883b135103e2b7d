//! Turning a bolt into the sound of thunder at a set of listeners.
//!
//! Every point along the channel emits a sharp pressure wave at the same
//! instant. Sound from near parts of the bolt arrives first and loudest,
//! sound from far parts later and quieter. [`Thunder`] captures this per
//! listener ("ear"):
//!
//! 1. [`Thunder::start`] measures how far each segment's endpoints are from
//!    each ear and sorts the result by the nearer distance.
//! 2. [`Thunder::render_audio`] lays every segment down as a ramp in time,
//!    from its near arrival to its far arrival, with loudness following the
//!    inverse-square law. Overlapping ramps add up.
//!
//! The time axis starts when the first sound reaches the closest ear; the
//! silence before that is not rendered. [`Thunder::onset_delay`] reports how
//! long it was.
//!
//! # Example
//!
//! ```
//! use thunderclap::{LightningBolt, Point3, Thunder};
//!
//! let ears = [Point3::new(2500.0, 0.1, 0.0), Point3::new(2500.0, -0.1, 0.0)];
//! let mut bolt = LightningBolt::new(100, 1);
//! let mut thunder = Thunder::new(&ears, 100);
//!
//! bolt.generate(3000.0, 1000.0, 1.0).unwrap();
//! thunder.start(&bolt).unwrap();
//! let audio = thunder.render_audio(44_100);
//! assert_eq!(audio.channels(), 2);
//! ```

use crate::bolt::LightningBolt;
use crate::buffer::AudioBuffer;
use crate::error::{LightningError, Result};
use crate::geometry::{distance, Point3};

/// Meters per second at sea level, 20 °C.
pub const SPEED_OF_SOUND_IN_AIR: f64 = 343.0;

/// Loudest contribution a single endpoint may make.
///
/// A listener sitting exactly on the bolt would otherwise divide by zero.
pub const MAX_AMPLITUDE: f64 = 1.0e12;

/// Inverse-square amplitude at `distance` meters, clamped to [`MAX_AMPLITUDE`].
#[inline]
pub fn amplitude(distance: f64) -> f64 {
    let amp = 1.0 / (distance * distance);
    if amp.is_finite() {
        amp.min(MAX_AMPLITUDE)
    } else {
        MAX_AMPLITUDE
    }
}

/// Distances from one ear to both ends of one segment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DistancePair {
    near: f64,
    far: f64,
}

impl DistancePair {
    /// Build a pair from two endpoint distances in either order.
    #[inline]
    pub fn new(d1: f64, d2: f64) -> Self {
        if d1 <= d2 {
            Self { near: d1, far: d2 }
        } else {
            Self { near: d2, far: d1 }
        }
    }

    #[inline]
    pub fn near(&self) -> f64 {
        self.near
    }

    #[inline]
    pub fn far(&self) -> f64 {
        self.far
    }
}

/// Per-ear acoustic model of the most recently started bolt.
#[derive(Clone, Debug)]
pub struct Thunder {
    ears: Vec<Point3>,
    max_segments: usize,
    tables: Vec<Vec<DistancePair>>,
    /// Nearest and farthest distance over every ear and segment.
    range: Option<(f64, f64)>,
}

impl Thunder {
    /// Create a renderer for a fixed set of ears and bolts of up to
    /// `max_segments` segments.
    pub fn new(ears: &[Point3], max_segments: usize) -> Self {
        Self {
            ears: ears.to_vec(),
            max_segments,
            tables: ears.iter().map(|_| Vec::with_capacity(max_segments)).collect(),
            range: None,
        }
    }

    #[inline]
    pub fn num_ears(&self) -> usize {
        self.ears.len()
    }

    #[inline]
    pub fn ears(&self) -> &[Point3] {
        &self.ears
    }

    #[inline]
    pub fn max_segments(&self) -> usize {
        self.max_segments
    }

    /// Sorted distance table for one ear.
    ///
    /// # Panics
    ///
    /// Panics if `ear >= num_ears()`.
    pub fn segments(&self, ear: usize) -> &[DistancePair] {
        &self.tables[ear]
    }

    /// Sorted distance table for one ear, or `None` for an unknown ear.
    pub fn try_segments(&self, ear: usize) -> Option<&[DistancePair]> {
        self.tables.get(ear).map(Vec::as_slice)
    }

    /// Nearest and farthest endpoint distance seen by any ear.
    ///
    /// `None` until a bolt with at least one segment has been started.
    #[inline]
    pub fn distance_range(&self) -> Option<(f64, f64)> {
        self.range
    }

    /// Seconds between the strike and the first sound reaching any ear.
    ///
    /// [`render_audio`](Self::render_audio) drops this much leading silence.
    pub fn onset_delay(&self) -> Option<f64> {
        self.range.map(|(min, _)| min / SPEED_OF_SOUND_IN_AIR)
    }

    /// Rebuild every ear's distance table from `bolt`.
    ///
    /// Fails without touching the current tables if the bolt can hold more
    /// segments than this renderer was sized for.
    pub fn start<R>(&mut self, bolt: &LightningBolt<R>) -> Result<()> {
        if bolt.max_segments() > self.max_segments {
            log::warn!(
                "rejecting bolt with {} segments, thunder sized for {}",
                bolt.max_segments(),
                self.max_segments
            );
            return Err(LightningError::CapacityExceeded {
                bolt: bolt.max_segments(),
                renderer: self.max_segments,
            });
        }

        let mut range: Option<(f64, f64)> = None;
        for (ear, table) in self.ears.iter().zip(self.tables.iter_mut()) {
            table.clear();
            for seg in bolt.segments() {
                let pair = DistancePair::new(distance(*ear, seg.a), distance(*ear, seg.b));
                range = Some(match range {
                    None => (pair.near, pair.far),
                    Some((lo, hi)) => (lo.min(pair.near), hi.max(pair.far)),
                });
                table.push(pair);
            }
            // sort_unstable does not allocate
            table.sort_unstable_by(|x, y| x.near.total_cmp(&y.near));
            log::trace!("ear at {:?}: {} distance pairs", ear, table.len());
        }
        self.range = range;

        match self.range {
            Some((lo, hi)) => log::debug!("thunder started: distances {:.1} m to {:.1} m", lo, hi),
            None => log::debug!("thunder started with an empty bolt"),
        }
        Ok(())
    }

    /// Number of frames needed to render the current tables.
    pub fn frame_count(&self, sample_rate_hz: u32) -> usize {
        match self.range {
            Some((lo, hi)) if lo < hi => {
                let seconds = (hi - lo) / SPEED_OF_SOUND_IN_AIR;
                (sample_rate_hz as f64 * seconds).ceil() as usize
            }
            _ => 0,
        }
    }

    /// Render the thunder heard at every ear, one channel per ear.
    ///
    /// Sample values are raw inverse-square amplitudes and are not
    /// normalized. With no ears the result is an empty mono buffer.
    pub fn render_audio(&self, sample_rate_hz: u32) -> AudioBuffer {
        let mut buffer = AudioBuffer::silent(0, self.num_ears().max(1));
        self.fill(sample_rate_hz, &mut buffer);
        buffer
    }

    /// Like [`render_audio`](Self::render_audio), but reuse `out`'s storage.
    pub fn render_audio_into(&self, sample_rate_hz: u32, out: &mut AudioBuffer) {
        self.fill(sample_rate_hz, out);
    }

    fn fill(&self, sample_rate_hz: u32, out: &mut AudioBuffer) {
        let channels = self.num_ears().max(1);
        let frames = if self.ears.is_empty() { 0 } else { self.frame_count(sample_rate_hz) };
        out.reshape(frames, channels);

        let Some((min_distance, _)) = self.range else {
            return;
        };
        if frames == 0 {
            return;
        }

        let rate = sample_rate_hz as f64;
        let to_frame = |d: f64| ((d - min_distance) / SPEED_OF_SOUND_IN_AIR * rate).round() as usize;

        for (c, table) in self.tables.iter().enumerate() {
            for pair in table {
                let amp1 = amplitude(pair.near);
                let amp2 = amplitude(pair.far);
                let f1 = to_frame(pair.near);
                let f2 = to_frame(pair.far);

                if f2 <= f1 + 1 {
                    // Zero- or one-frame ramp: only the near end is heard. A
                    // zero-width interval is silent unless both ends are
                    // exactly equidistant. Rounding can put an equidistant
                    // pair at the farthest distance one frame past the end.
                    if f2 == f1 + 1 || pair.near == pair.far {
                        *out.at_mut(c, f1.min(frames - 1)) += amp1 as f32;
                    }
                    continue;
                }

                // The far end snaps down one frame: the next segment along
                // the channel usually starts there.
                let span = ((f2 - 1) - f1) as f64;
                for f in f1..f2.min(frames) {
                    let x = (f - f1) as f64 / span;
                    *out.at_mut(c, f) += ((1.0 - x) * amp1 + x * amp2) as f32;
                }
            }
        }

        log::debug!(
            "rendered {} frames x {} channels at {} Hz",
            frames,
            channels,
            sample_rate_hz
        );
    }
}
