pub(crate) mod train;
pub(crate) mod travellingrainbow;
pub(crate) mod twinkle;

use eyre::eyre;
use eyre::Result;

use crate::strip::Strip;

/// An animation that runs to completion on the strip, showing and pacing
/// its own frames.
pub trait Effect {
    fn name(&self) -> &'static str;

    fn run(&mut self, strip: &mut Strip) -> Result<()>;
}

/// Number of hue steps spread over a trail. The full trail spans 160 of the
/// 256 hues so head and tail never wrap around to the same color.
const TRAIL_HUE_SPAN: i64 = 160;

/// Limits a trail length to `2..pixel_count`.
fn clamp_length(length: usize, pixel_count: usize) -> Result<usize> {
    if pixel_count < 3 {
        return Err(eyre!(
            "A strip of {} pixels is too short for a trail",
            pixel_count
        ));
    }

    let clamped = length.clamp(2, pixel_count - 1);
    if clamped != length {
        log::warn!(
            "Trail length {} does not fit a strip of {} pixels, using {}",
            length,
            pixel_count,
            clamped
        );
    }
    Ok(clamped)
}

fn hue_delta(length: usize) -> i64 {
    TRAIL_HUE_SPAN / (length as i64 - 1)
}
