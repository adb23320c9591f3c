use eyre::Result;

use crate::color::{self, Hsv8, Rgb8, BLACK};
use crate::effects::{clamp_length, hue_delta, Effect};
use crate::strip::Strip;

#[derive(Clone, Debug)]
pub struct TrainParams {
    pub color: Rgb8,
    pub brightness: u8,
    pub length: usize,
    pub two_way: bool,
    pub rainbow: bool,
    pub comet: bool,
    pub loops: u32,
    pub frame_delay_ms: u64,
}

/// A block of light running along the strip, optionally back again.
pub struct Train {
    params: TrainParams,
}

/// Geometry of one run, fixed for the duration of `Effect::run`.
struct Run {
    length: i64,
    delta: i64,
}

impl Train {
    pub fn new(params: TrainParams) -> Train {
        Train { params }
    }

    fn head_color(&self) -> Rgb8 {
        if self.params.rainbow {
            Hsv8::new(0, 255, 255).to_rgb()
        } else {
            self.params.color
        }
    }

    fn tail_color(&self, run: &Run, distance: i64) -> Rgb8 {
        let base = if self.params.rainbow {
            Hsv8::new(color::hue_offset(0, distance, run.delta), 255, 255).to_rgb()
        } else {
            self.params.color
        };

        if self.params.comet {
            color::fade_to_black_by(base, (distance * 255 / run.length) as u8)
        } else {
            base
        }
    }

    /// Draws the train with its head at `head`, the tail extending against
    /// `direction`, and blanks the pixel that just left the tail.
    fn draw(&self, strip: &mut Strip, run: &Run, head: i64, direction: i64) -> Result<()> {
        strip.set_if_inside(head, self.head_color())?;
        for distance in 1..run.length {
            strip.set_if_inside(head - direction * distance, self.tail_color(run, distance))?;
        }
        strip.set_if_inside(head - direction * run.length, BLACK)
    }

    /// Lets the train leave the strip: tail end first, head last, one frame each.
    fn run_off(&self, strip: &mut Strip, run: &Run, head: i64, direction: i64) -> Result<()> {
        for distance in (0..=run.length).rev() {
            strip.set_if_inside(head - direction * distance, BLACK)?;
            strip.present(self.params.frame_delay_ms)?;
        }
        Ok(())
    }

    fn sweep(&self, strip: &mut Strip, run: &Run, direction: i64) -> Result<()> {
        let last = strip.len() as i64 - 1;
        let (first, end) = if direction > 0 { (0, last) } else { (last, 0) };

        let mut head = first;
        loop {
            self.draw(strip, run, head, direction)?;
            strip.present(self.params.frame_delay_ms)?;
            if head == end {
                return self.run_off(strip, run, head, direction);
            }
            head += direction;
        }
    }
}

impl Effect for Train {
    fn name(&self) -> &'static str {
        "train"
    }

    fn run(&mut self, strip: &mut Strip) -> Result<()> {
        let length = clamp_length(self.params.length, strip.len())?;
        let run = Run {
            length: length as i64,
            delta: hue_delta(length),
        };

        // Comets fade their tail to black themselves, dimming would only wash them out
        let brightness = if self.params.comet {
            255
        } else {
            self.params.brightness
        };
        strip.set_brightness(brightness);

        for _ in 0..self.params.loops {
            self.sweep(strip, &run, 1)?;
            if self.params.two_way {
                self.sweep(strip, &run, -1)?;
            }
        }
        Ok(())
    }
}
