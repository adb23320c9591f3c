use eyre::eyre;
use eyre::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Hsv8;
use crate::effects::Effect;
use crate::strip::Strip;

#[derive(Clone, Debug)]
pub struct TwinkleParams {
    pub loops: u32,
    pub brightness: u8,
    /// How much every pixel dims per frame, out of 256.
    pub fade: u8,
    pub delay_ms: u64,
}

/// Random sparkles that fade out over the following frames.
pub struct Twinkle {
    params: TwinkleParams,
    rng: StdRng,
}

impl Twinkle {
    pub fn new(params: TwinkleParams, seed: Option<u64>) -> Twinkle {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Twinkle { params, rng }
    }
}

impl Effect for Twinkle {
    fn name(&self) -> &'static str {
        "twinkle"
    }

    /// Shows exactly `loops` sparkles, one per frame.
    fn run(&mut self, strip: &mut Strip) -> Result<()> {
        if strip.len() == 0 {
            return Err(eyre!("Cannot twinkle on an empty strip"));
        }
        strip.set_brightness(self.params.brightness);

        for _ in 0..self.params.loops {
            let hue: u8 = self.rng.gen();
            let saturation: u8 = self.rng.gen();
            let index = self.rng.gen_range(0..strip.len());

            strip.fade_to_black_by(self.params.fade);
            strip.set(index, Hsv8::new(hue, saturation, 255).to_rgb())?;
            strip.present(self.params.delay_ms)?;
        }
        Ok(())
    }
}
