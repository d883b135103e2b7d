//! Error types for thunderclap.
//!
//! A single error enum covers bolt generation, acoustic rendering, the
//! convolution combiner and configuration loading.

use std::fmt;

/// Errors that can occur while generating, rendering or combining thunder.
#[derive(Debug)]
pub enum LightningError {
    /// The fractal subdivision was asked to produce zero segments.
    ///
    /// This is a defect in the budget accounting, never bad input.
    EmptyBudget,
    /// A budget split did not add back up to the budget being split.
    BudgetMismatch {
        /// Budget handed to the split.
        budget: usize,
        /// Share given to the first half.
        first: usize,
        /// Share given to the second half.
        second: usize,
    },
    /// A bolt holds more segments than the renderer was sized for.
    CapacityExceeded {
        /// Segment capacity of the bolt.
        bolt: usize,
        /// Segment capacity of the renderer.
        renderer: usize,
    },
    /// Two buffers cannot be convolved with these channel counts.
    IncompatibleChannels {
        /// Channels in the signal.
        f: usize,
        /// Channels in the response.
        g: usize,
    },
    /// A sample buffer must have at least one channel.
    InvalidChannelCount,
    /// Interleaved sample data does not split evenly into frames.
    RaggedSamples {
        /// Number of samples supplied.
        samples: usize,
        /// Requested channel count.
        channels: usize,
    },
    /// Configuration JSON could not be parsed.
    Config(serde_json::Error),
    /// Configuration file could not be read.
    Io(std::io::Error),
}

impl LightningError {
    /// True for internal invariant violations that no retry can fix.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LightningError::EmptyBudget | LightningError::BudgetMismatch { .. }
        )
    }
}

impl fmt::Display for LightningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightningError::EmptyBudget => write!(f, "Cannot complete lightning fractal: segment budget reached zero"),
            LightningError::BudgetMismatch { budget, first, second } => write!(
                f,
                "Budget calculation error: {} + {} != {}",
                first, second, budget
            ),
            LightningError::CapacityExceeded { bolt, renderer } => write!(
                f,
                "Lightning bolt has {} segments but the thunder renderer only holds {}",
                bolt, renderer
            ),
            LightningError::IncompatibleChannels { f: fc, g: gc } => write!(
                f,
                "Audio buffers with {} and {} channels cannot be convolved",
                fc, gc
            ),
            LightningError::InvalidChannelCount => write!(f, "Channel count must be a positive integer"),
            LightningError::RaggedSamples { samples, channels } => write!(
                f,
                "{} samples is not a whole number of {}-channel frames",
                samples, channels
            ),
            LightningError::Config(e) => write!(f, "Invalid thunder configuration: {}", e),
            LightningError::Io(e) => write!(f, "Failed to read configuration file: {}", e),
        }
    }
}

impl std::error::Error for LightningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LightningError::Config(e) => Some(e),
            LightningError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LightningError {
    fn from(e: serde_json::Error) -> Self {
        LightningError::Config(e)
    }
}

impl From<std::io::Error> for LightningError {
    fn from(e: std::io::Error) -> Self {
        LightningError::Io(e)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LightningError>;
