//! A storm: one bolt generator, one thunder renderer, and the slot that hands
//! finished audio to whoever is playing it.
//!
//! [`Storm`] is built once and owns everything a strike needs, so the audio
//! side and the control side share nothing but the [`PlaybackSlot`].
//!
//! ```
//! use thunderclap::{Storm, ThunderConfig};
//!
//! let mut storm = Storm::new(ThunderConfig::default().with_max_segments(64));
//! let slot = storm.slot(); // give this to the audio thread
//!
//! storm.strike_and_publish().unwrap();
//!
//! let mut block = [0.0f32; 512];
//! let written = slot.fill(&mut block);
//! assert!(written > 0);
//! ```

use crate::bolt::LightningBolt;
use crate::buffer::AudioBuffer;
use crate::config::ThunderConfig;
use crate::error::Result;
use crate::thunder::Thunder;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct Playback {
    buffer: AudioBuffer,
    /// Next interleaved sample to hand out.
    cursor: usize,
}

/// Shared holder of the buffer currently being played.
///
/// Swapping in a new buffer and reading from the current one both happen
/// under a single lock, so a reader sees either the old buffer or the new
/// one, never a mix.
#[derive(Debug)]
pub struct PlaybackSlot {
    state: Mutex<Playback>,
}

impl PlaybackSlot {
    /// A slot holding an empty buffer with `channels` channels.
    pub fn new(channels: usize) -> Self {
        Self {
            state: Mutex::new(Playback {
                buffer: AudioBuffer::silent(0, channels.max(1)),
                cursor: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Playback> {
        // Playback is plain data; a panic elsewhere cannot leave it torn.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Install `buffer` and start playing it from the beginning.
    ///
    /// Returns the buffer it replaced.
    pub fn publish(&self, buffer: AudioBuffer) -> AudioBuffer {
        let mut state = self.lock();
        state.cursor = 0;
        std::mem::replace(&mut state.buffer, buffer)
    }

    /// Copy the next interleaved samples into `out`.
    ///
    /// Whatever the buffer cannot supply is filled with silence. Returns the
    /// number of real samples written.
    pub fn fill(&self, out: &mut [f32]) -> usize {
        let mut state = self.lock();
        let available = &state.buffer.samples()[state.cursor.min(state.buffer.samples().len())..];
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        out[n..].fill(0.0);
        state.cursor += n;
        n
    }

    /// Play the current buffer again from the start.
    pub fn rewind(&self) {
        self.lock().cursor = 0;
    }

    /// Interleaved samples left to play.
    pub fn remaining(&self) -> usize {
        let state = self.lock();
        state.buffer.samples().len().saturating_sub(state.cursor)
    }

    /// Channel count of the current buffer.
    pub fn channels(&self) -> usize {
        self.lock().buffer.channels()
    }
}

/// The constructed-once context behind a series of strikes.
pub struct Storm {
    config: ThunderConfig,
    bolt: LightningBolt,
    thunder: Thunder,
    slot: Arc<PlaybackSlot>,
}

impl Storm {
    /// Allocate everything a strike will ever need.
    pub fn new(config: ThunderConfig) -> Self {
        let bolt = LightningBolt::new(config.max_segments, config.seed);
        let thunder = Thunder::new(&config.ears, config.max_segments);
        let slot = Arc::new(PlaybackSlot::new(config.ears.len()));
        log::info!(
            "storm ready: {} segments per bolt, {} ears, {} Hz",
            config.max_segments,
            config.ears.len(),
            config.sample_rate_hz
        );
        Self {
            config,
            bolt,
            thunder,
            slot,
        }
    }

    #[inline]
    pub fn config(&self) -> &ThunderConfig {
        &self.config
    }

    #[inline]
    pub fn bolt(&self) -> &LightningBolt {
        &self.bolt
    }

    #[inline]
    pub fn thunder(&self) -> &Thunder {
        &self.thunder
    }

    /// Handle for the audio consumer.
    pub fn slot(&self) -> Arc<PlaybackSlot> {
        Arc::clone(&self.slot)
    }

    /// Generate a new bolt and render its thunder.
    ///
    /// The returned buffer holds raw, unnormalized amplitudes.
    pub fn strike(&mut self) -> Result<AudioBuffer> {
        self.bolt.generate_with(&self.config.bolt)?;
        self.thunder.start(&self.bolt)?;
        Ok(self.thunder.render_audio(self.config.sample_rate_hz))
    }

    /// [`strike`](Self::strike), scale to the configured peak level, and
    /// hand the result to the playback slot.
    ///
    /// Returns the number of frames published.
    pub fn strike_and_publish(&mut self) -> Result<usize> {
        let mut audio = self.strike()?;
        if let Some(level) = self.config.peak_level {
            audio.normalize(level);
        }
        let frames = audio.frames();
        self.slot.publish(audio);
        log::debug!("published {} frames", frames);
        Ok(frames)
    }
}
