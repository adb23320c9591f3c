use std::time::Duration;

use eyre::eyre;
use eyre::Result;

use crate::color::{self, ColorCorrection, Hsv8, Rgb8, BLACK};
use crate::intervaltimer::Clock;
use crate::output::Output;

/// Saturation used by rainbow fills. Slightly below full to soften the primaries.
const RAINBOW_SATURATION: u8 = 240;

/// The frame buffer of an LED strip together with the output it is shown on
/// and the clock that paces frames.
pub struct Strip {
    pixels: Vec<Rgb8>,
    brightness: u8,
    correction: ColorCorrection,
    output: Box<dyn Output>,
    clock: Box<dyn Clock>,
    frames_shown: u64,
}

impl Strip {
    pub fn new(
        pixel_count: usize,
        correction: ColorCorrection,
        output: Box<dyn Output>,
        clock: Box<dyn Clock>,
    ) -> Strip {
        Strip {
            pixels: vec![BLACK; pixel_count],
            brightness: 255,
            correction,
            output,
            clock,
            frames_shown: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    pub fn get(&self, index: usize) -> Option<Rgb8> {
        self.pixels.get(index).copied()
    }

    pub fn set(&mut self, index: usize, color: Rgb8) -> Result<()> {
        let len = self.pixels.len();
        match self.pixels.get_mut(index) {
            Some(pixel) => {
                *pixel = color;
                Ok(())
            }
            None => Err(eyre!("Pixel {} is outside of the strip (0..{})", index, len)),
        }
    }

    /// Sets a pixel addressed by a signed position, skipping positions that
    /// fall off either end of the strip. Effects use this for trail pixels.
    pub fn set_if_inside(&mut self, position: i64, color: Rgb8) -> Result<()> {
        if position < 0 || position >= self.pixels.len() as i64 {
            return Ok(());
        }
        self.set(position as usize, color)
    }

    pub fn fill_solid(&mut self, count: usize, color: Rgb8) {
        let count = count.min(self.pixels.len());
        self.pixels[..count].fill(color);
    }

    /// Fills the first `count` pixels with hues starting at `start_hue`,
    /// stepping by `delta_hue` per pixel.
    pub fn fill_rainbow(&mut self, count: usize, start_hue: u8, delta_hue: u8) {
        let mut hue = start_hue;
        for pixel in self.pixels.iter_mut().take(count) {
            *pixel = Hsv8::new(hue, RAINBOW_SATURATION, 255).to_rgb();
            hue = hue.wrapping_add(delta_hue);
        }
    }

    pub fn fade_to_black_by(&mut self, amount: u8) {
        for pixel in &mut self.pixels {
            *pixel = color::fade_to_black_by(*pixel, amount);
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(BLACK);
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    /// Renders the buffer with brightness and correction applied and hands it
    /// to the output. The buffer itself is left untouched.
    pub fn show(&mut self) -> Result<()> {
        let frame: Vec<Rgb8> = self
            .pixels
            .iter()
            .map(|pixel| self.correction.apply(*pixel, self.brightness))
            .collect();
        self.output.write(&frame)?;
        self.frames_shown += 1;
        Ok(())
    }

    pub fn delay(&mut self, millis: u64) {
        self.clock.wait(Duration::from_millis(millis));
    }

    /// Shows the current frame and waits for the frame interval.
    pub fn present(&mut self, millis: u64) -> Result<()> {
        self.show()?;
        self.delay(millis);
        Ok(())
    }

    pub fn clear_and_show(&mut self) -> Result<()> {
        self.clear();
        self.show()
    }

    pub fn describe_output(&self) -> String {
        self.output.describe()
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use palette::Srgb;

    use super::testing::test_strip;
    use super::*;
    use crate::intervaltimer::testing::VirtualClock;
    use crate::output::testing::RecordingOutput;

    #[test]
    fn starts_black() {
        let (strip, _, _) = test_strip(8);
        assert_eq!(strip.len(), 8);
        assert!(strip.pixels().iter().all(|p| *p == BLACK));
    }

    #[test]
    fn rejects_out_of_range_writes() {
        let (mut strip, _, _) = test_strip(4);
        assert!(strip.set(3, Srgb::new(1, 2, 3)).is_ok());
        assert!(strip.set(4, Srgb::new(1, 2, 3)).is_err());
        assert_eq!(strip.get(3), Some(Srgb::new(1, 2, 3)));
        assert_eq!(strip.get(4), None);
    }

    #[test]
    fn signed_writes_outside_are_skipped() {
        let (mut strip, _, _) = test_strip(4);
        strip.set_if_inside(-1, Srgb::new(9, 9, 9)).unwrap();
        strip.set_if_inside(4, Srgb::new(9, 9, 9)).unwrap();
        strip.set_if_inside(0, Srgb::new(9, 9, 9)).unwrap();
        assert_eq!(strip.get(0), Some(Srgb::new(9, 9, 9)));
        assert!(strip.pixels()[1..].iter().all(|p| *p == BLACK));
    }

    #[test]
    fn showing_twice_renders_identical_frames() {
        let (mut strip, output, _) = test_strip(6);
        strip.fill_rainbow(6, 10, 30);
        strip.set_brightness(100);
        strip.show().unwrap();
        strip.show().unwrap();

        let frames = output.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], frames[1]);
        assert_eq!(strip.frames_shown(), 2);
    }

    #[test]
    fn show_applies_brightness_and_correction_without_touching_buffer() {
        let output = RecordingOutput::default();
        let mut strip = Strip::new(
            1,
            ColorCorrection::TypicalLedStrip,
            Box::new(output.clone()),
            Box::new(VirtualClock::default()),
        );
        let white = Srgb::new(255, 255, 255);
        strip.set(0, white).unwrap();
        strip.set_brightness(127);
        strip.show().unwrap();

        assert_eq!(strip.get(0), Some(white));
        let shown = output.frames()[0][0];
        assert_eq!(shown, ColorCorrection::TypicalLedStrip.apply(white, 127));
        assert!(shown.green < shown.red);
    }

    #[test]
    fn fills_and_fades() {
        let (mut strip, _, _) = test_strip(5);
        strip.fill_solid(10, Srgb::new(200, 100, 0));
        assert!(strip.pixels().iter().all(|p| *p == Srgb::new(200, 100, 0)));

        strip.fade_to_black_by(128);
        assert!(strip.pixels().iter().all(|p| *p == Srgb::new(100, 50, 0)));

        strip.fill_solid(2, BLACK);
        assert_eq!(strip.get(1), Some(BLACK));
        assert_eq!(strip.get(2), Some(Srgb::new(100, 50, 0)));
    }

    #[test]
    fn rainbow_fill_steps_hue() {
        let (mut strip, _, _) = test_strip(4);
        strip.fill_rainbow(3, 250, 10);
        let hues: Vec<u8> = strip.pixels()[..3]
            .iter()
            .map(|p| Hsv8::from_rgb_approximate(*p).hue)
            .collect();
        for (hue, expected) in hues.iter().zip([250u8, 4, 14]) {
            assert!(color::hue_distance(*hue, expected) <= 2);
        }
        assert_eq!(strip.get(3), Some(BLACK));
    }

    #[test]
    fn present_shows_then_waits() {
        let (mut strip, output, clock) = test_strip(2);
        strip.present(15).unwrap();
        strip.clear_and_show().unwrap();
        assert_eq!(output.frame_count(), 2);
        assert_eq!(clock.waits(), vec![Duration::from_millis(15)]);
    }
}
