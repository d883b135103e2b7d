//! Interleaved multi-channel sample storage.
//!
//! [`AudioBuffer`] holds `frames × channels` `f32` samples laid out frame by
//! frame, so channel `c` of frame `f` lives at `f * channels + c`.
//!
//! # Example
//!
//! ```
//! use thunderclap::AudioBuffer;
//!
//! let mut buf = AudioBuffer::new(4, 2).unwrap();
//! *buf.at_mut(1, 3) = 0.5;
//! assert_eq!(buf.get(1, 3), 0.5);
//! assert_eq!(buf.get(1, -1), 0.0); // reads outside the buffer are silent
//! ```

use crate::error::{LightningError, Result};

/// A fixed-channel-count buffer of interleaved samples.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    data: Vec<f32>,
    channels: usize,
}

impl AudioBuffer {
    /// Create a silent buffer of `frames` frames.
    pub fn new(frames: usize, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(LightningError::InvalidChannelCount);
        }
        Ok(Self {
            data: vec![0.0; frames * channels],
            channels,
        })
    }

    /// Create a buffer with no frames.
    pub fn empty(channels: usize) -> Result<Self> {
        Self::new(0, channels)
    }

    /// Wrap pre-computed interleaved samples.
    pub fn from_samples(data: Vec<f32>, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(LightningError::InvalidChannelCount);
        }
        if data.len() % channels != 0 {
            return Err(LightningError::RaggedSamples {
                samples: data.len(),
                channels,
            });
        }
        Ok(Self { data, channels })
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.data.len() / self.channels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All samples, interleaved.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    /// Position of a sample in the interleaved data.
    #[inline]
    pub fn index(&self, channel: usize, frame: usize) -> usize {
        frame * self.channels + channel
    }

    /// Mutable access to one sample.
    ///
    /// # Panics
    ///
    /// Panics if `channel` or `frame` is outside the buffer.
    pub fn at_mut(&mut self, channel: usize, frame: usize) -> &mut f32 {
        assert!(
            channel < self.channels,
            "channel {} out of range for {}-channel buffer",
            channel,
            self.channels
        );
        let i = self.index(channel, frame);
        &mut self.data[i]
    }

    /// Read one sample, treating everything outside the buffer as silence.
    #[inline]
    pub fn get(&self, channel: usize, frame: isize) -> f32 {
        if channel >= self.channels || frame < 0 {
            return 0.0;
        }
        self.data
            .get(self.index(channel, frame as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// Largest absolute sample value, or 0 for an empty buffer.
    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    /// Scale every sample so the peak magnitude equals `level`.
    ///
    /// Silent buffers are left untouched.
    pub fn normalize(&mut self, level: f32) {
        let peak = self.peak();
        if peak > 0.0 && peak.is_finite() {
            let gain = level / peak;
            self.data.iter_mut().for_each(|s| *s *= gain);
        }
    }

    /// Silent buffer for internal use where `channels` is already known to
    /// be positive.
    pub(crate) fn silent(frames: usize, channels: usize) -> Self {
        debug_assert!(channels > 0);
        Self {
            data: vec![0.0; frames * channels],
            channels,
        }
    }

    /// Reshape in place to `frames` silent frames, reusing the allocation
    /// when it is large enough.
    pub(crate) fn reshape(&mut self, frames: usize, channels: usize) {
        debug_assert!(channels > 0);
        self.channels = channels;
        self.data.clear();
        self.data.resize(frames * channels, 0.0);
    }
}
