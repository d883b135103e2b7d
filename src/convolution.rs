//! Linear convolution of multi-channel buffers.
//!
//! Used to color rendered thunder with a room, terrain or filter response.
//! The output is `frames(f) + frames(g)` frames long and has as many
//! channels as the wider input.
//!
//! | `f` channels | `g` channels | Result |
//! |--------------|--------------|--------|
//! | n | n | channel `c` of `f` with channel `c` of `g` |
//! | n | 1 | every channel of `f` with the one channel of `g` |
//! | 1 | n | same as swapping the arguments |
//! | anything else | | [`LightningError::IncompatibleChannels`] |

use crate::buffer::AudioBuffer;
use crate::error::{LightningError, Result};

/// Convolve `f` with `g`.
///
/// Samples outside either buffer are treated as zero.
pub fn convolve(f: &AudioBuffer, g: &AudioBuffer) -> Result<AudioBuffer> {
    let fc = f.channels();
    let gc = g.channels();

    if fc == gc {
        let mut y = output_buffer(f, g);
        for c in 0..fc {
            convolve_channel_pair(&mut y, f, c, g, c);
        }
        return Ok(y);
    }

    if gc == 1 {
        let mut y = output_buffer(f, g);
        for c in 0..fc {
            convolve_channel_pair(&mut y, f, c, g, 0);
        }
        return Ok(y);
    }

    if fc == 1 {
        return convolve(g, f);
    }

    log::warn!("cannot convolve {}-channel buffer with {}-channel buffer", fc, gc);
    Err(LightningError::IncompatibleChannels { f: fc, g: gc })
}

fn output_buffer(f: &AudioBuffer, g: &AudioBuffer) -> AudioBuffer {
    let channels = f.channels().max(g.channels());
    AudioBuffer::silent(f.frames() + g.frames(), channels)
}

/// Write channel `fc` of `f` convolved with channel `gc` of `g` into
/// channel `fc` of `y`.
fn convolve_channel_pair(y: &mut AudioBuffer, f: &AudioBuffer, fc: usize, g: &AudioBuffer, gc: usize) {
    let gf = g.frames() as isize;
    for i in 0..y.frames() {
        let mut sum = 0.0f32;
        for k in (0..gf).rev() {
            sum += g.get(gc, k) * f.get(fc, i as isize - k);
        }
        *y.at_mut(fc, i) = sum;
    }
}
