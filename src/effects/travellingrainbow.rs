use eyre::Result;

use crate::color::{self, Hsv8, BLACK};
use crate::effects::{clamp_length, hue_delta, Effect};
use crate::strip::Strip;

#[derive(Clone, Debug)]
pub struct RainbowParams {
    pub length: usize,
    pub brightness: u8,
    pub loops: u32,
    pub frame_delay_ms: u64,
}

/// Grows a rainbow over the strip, lets it run for a while and then drives it
/// off the far end.
pub struct TravellingRainbow {
    params: RainbowParams,
}

impl TravellingRainbow {
    pub fn new(params: RainbowParams) -> TravellingRainbow {
        TravellingRainbow { params }
    }

    fn grow(&self, strip: &mut Strip, length: i64, delta: i64) -> Result<()> {
        let head_color = Hsv8::new(0, 255, 255).to_rgb();
        let step = (delta as u8).wrapping_neg();

        for head in 0..strip.len() as i64 {
            strip.set(head as usize, head_color)?;

            // Everything behind the previous head position
            if head > 1 {
                let start_hue = color::hue_offset(160, length - head, -delta);
                strip.fill_rainbow(head as usize - 1, start_hue, step);
            }
            strip.present(self.params.frame_delay_ms)?;
        }
        Ok(())
    }

    /// Hue to continue from, recovered from whatever the first pixel shows.
    /// The conversion back from RGB is approximate, which is accepted here.
    fn anchor_hue(strip: &Strip) -> u8 {
        let first = strip.get(0).unwrap_or(BLACK);
        Hsv8::from_rgb_approximate(first).hue.wrapping_sub(1)
    }

    fn hold(&self, strip: &mut Strip, delta: i64) -> Result<()> {
        let step = (delta as u8).wrapping_neg();
        let mut hue = Self::anchor_hue(strip);

        for _ in 0..self.params.loops {
            strip.fill_rainbow(strip.len(), hue, step);
            strip.present(self.params.frame_delay_ms)?;
            hue = hue.wrapping_add(delta as u8);
        }
        Ok(())
    }

    fn collapse(&self, strip: &mut Strip, delta: i64) -> Result<()> {
        let step = (delta as u8).wrapping_neg();
        let mut hue = Self::anchor_hue(strip);

        for dark in 1..=strip.len() {
            strip.fill_rainbow(strip.len(), hue, step);
            strip.fill_solid(dark, BLACK);
            strip.present(self.params.frame_delay_ms)?;
            hue = hue.wrapping_add(delta as u8);
        }
        Ok(())
    }
}

impl Effect for TravellingRainbow {
    fn name(&self) -> &'static str {
        "travelling rainbow"
    }

    fn run(&mut self, strip: &mut Strip) -> Result<()> {
        let length = clamp_length(self.params.length, strip.len())?;
        let delta = hue_delta(length);
        strip.set_brightness(self.params.brightness);

        self.grow(strip, length as i64, delta)?;
        self.hold(strip, delta)?;
        self.collapse(strip, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb8;
    use crate::strip::testing::test_strip;

    fn params(length: usize, loops: u32) -> RainbowParams {
        RainbowParams {
            length,
            brightness: 255,
            loops,
            frame_delay_ms: 15,
        }
    }

    fn hue(pixel: Rgb8) -> u8 {
        Hsv8::from_rgb_approximate(pixel).hue
    }

    #[test]
    fn collapse_leaves_strip_black() {
        let (mut strip, output, _) = test_strip(10);
        TravellingRainbow::new(params(3, 1)).run(&mut strip).unwrap();

        assert!(strip.pixels().iter().all(|p| *p == BLACK));
        assert_eq!(output.frame_count(), 10 + 1 + 10);
    }

    #[test]
    fn growth_lights_up_to_the_head() {
        let (mut strip, output, _) = test_strip(10);
        TravellingRainbow::new(params(3, 0)).run(&mut strip).unwrap();

        let frames = output.frames();
        for (head, frame) in frames.iter().take(10).enumerate() {
            assert!(frame[..=head].iter().all(|p| *p != BLACK), "head {}", head);
            assert!(frame[head + 1..].iter().all(|p| *p == BLACK), "head {}", head);
            assert_eq!(hue(frame[head]), 0);
        }
    }

    #[test]
    fn hold_cycles_the_whole_strip() {
        let (mut strip, output, _) = test_strip(10);
        TravellingRainbow::new(params(3, 4)).run(&mut strip).unwrap();

        let frames = output.frames();
        let grown = &frames[9];
        let held = &frames[10..14];
        for frame in held {
            assert!(frame.iter().all(|p| *p != BLACK));
        }

        // The hold phase picks up one hue step below where growth left pixel 0
        let anchor = hue(grown[0]).wrapping_sub(1);
        assert!(color::hue_distance(hue(held[0][0]), anchor) <= 3);

        // Each frame moves the pattern by one hue delta (80 for a length of 3)
        for pair in held.windows(2) {
            let advanced = hue(pair[0][0]).wrapping_add(80);
            assert!(color::hue_distance(hue(pair[1][0]), advanced) <= 3);
        }
        // Within a frame hue steps backwards along the strip
        let expected = hue(held[0][0]).wrapping_sub(80);
        assert!(color::hue_distance(hue(held[0][1]), expected) <= 3);
    }

    #[test]
    fn collapse_darkens_from_the_start() {
        let (mut strip, output, _) = test_strip(10);
        TravellingRainbow::new(params(3, 0)).run(&mut strip).unwrap();

        let frames = output.frames();
        for (dark, frame) in frames[10..].iter().enumerate() {
            let dark = dark + 1;
            assert!(frame[..dark].iter().all(|p| *p == BLACK));
            assert!(frame[dark..].iter().all(|p| *p != BLACK));
        }
    }

    #[test]
    fn rejects_tiny_strips() {
        let (mut strip, _, _) = test_strip(2);
        assert!(TravellingRainbow::new(params(3, 1)).run(&mut strip).is_err());
    }
}
