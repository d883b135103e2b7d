//! # Thunderclap
//!
//! Procedural lightning bolts and the thunder they make.
//!
//! A [`LightningBolt`] grows a jagged 3D channel by recursive midpoint
//! displacement. A [`Thunder`] listens to that channel from a fixed set of
//! ears and renders what each ear hears: every piece of the channel arrives
//! after its propagation delay, at inverse-square loudness, and the pieces
//! pile up into a rolling rumble.
//!
//! ## Quick Start
//!
//! ```
//! use thunderclap::prelude::*;
//!
//! let ears = [Point3::new(2500.0, 0.1, 0.0), Point3::new(2500.0, -0.1, 0.0)];
//! let mut bolt = LightningBolt::new(1000, 42);
//! let mut thunder = Thunder::new(&ears, 1000);
//!
//! bolt.generate(3000.0, 1000.0, 1.0)?;
//! thunder.start(&bolt)?;
//! let mut audio = thunder.render_audio(44_100);
//! audio.normalize(0.9);
//! # Ok::<(), LightningError>(())
//! ```
//!
//! ## Core Concepts
//!
//! ### Bolts
//!
//! The segment count of a bolt is fixed when it is created, and storage for
//! it is reserved up front. Every call to [`LightningBolt::generate`] throws
//! the previous bolt away and builds exactly that many segments again,
//! without allocating.
//!
//! ### Ears
//!
//! Ear `i` renders to channel `i`. A [`Thunder`] keeps, per ear, the near
//! and far distance of every segment, sorted by the near distance.
//!
//! ### Rendering
//!
//! Time zero is the moment the first sound reaches the closest ear; see
//! [`Thunder::onset_delay`] for the silence that was skipped. Output is raw
//! inverse-square amplitude. Use [`AudioBuffer::normalize`] before playback.
//!
//! ### Storms
//!
//! [`Storm`] bundles a bolt, a renderer and a [`PlaybackSlot`] built from a
//! [`ThunderConfig`]. The slot is the only thing shared with an audio thread.
//!
//! ## Feature Overview
//!
//! | Module | Provides |
//! |--------|----------|
//! | [`bolt`] | [`LightningBolt`], [`BoltRandom`] |
//! | [`thunder`] | [`Thunder`], [`DistancePair`], [`SPEED_OF_SOUND_IN_AIR`] |
//! | [`buffer`] | [`AudioBuffer`] |
//! | [`convolution`] | [`convolve`] |
//! | [`storm`] | [`Storm`], [`PlaybackSlot`] |
//! | [`config`] | [`ThunderConfig`], [`BoltConfig`] |

pub mod bolt;
pub mod buffer;
pub mod config;
pub mod convolution;
mod error;
pub mod geometry;
pub mod storm;
pub mod thunder;

pub use bolt::{BoltRandom, LightningBolt};
pub use buffer::AudioBuffer;
pub use config::{BoltConfig, ThunderConfig};
pub use convolution::convolve;
pub use error::{LightningError, Result};
pub use geometry::{distance, Point3, Segment};
pub use glam::DVec3;
pub use storm::{PlaybackSlot, Storm};
pub use thunder::{DistancePair, Thunder, SPEED_OF_SOUND_IN_AIR};

/// Convenient re-exports for common usage.
///
/// ```
/// use thunderclap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bolt::{BoltRandom, LightningBolt};
    pub use crate::buffer::AudioBuffer;
    pub use crate::config::{BoltConfig, ThunderConfig};
    pub use crate::convolution::convolve;
    pub use crate::error::LightningError;
    pub use crate::geometry::{Point3, Segment};
    pub use crate::storm::{PlaybackSlot, Storm};
    pub use crate::thunder::{DistancePair, Thunder};
}
