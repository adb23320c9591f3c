use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use eyre::eyre;
use eyre::Result;

use crate::color::parse_color;
use crate::config::{Config, EffectConfig};
use crate::effects::train::{Train, TrainParams};
use crate::effects::travellingrainbow::{RainbowParams, TravellingRainbow};
use crate::effects::twinkle::{Twinkle, TwinkleParams};
use crate::effects::Effect;
use crate::strip::Strip;

/// Fixed sequence of effects, played in order.
pub struct Playlist {
    effects: Vec<Box<dyn Effect>>,
}

impl Playlist {
    pub fn new(effects: Vec<Box<dyn Effect>>) -> Result<Playlist> {
        if effects.is_empty() {
            return Err(eyre!("A playlist needs at least one effect"));
        }
        Ok(Playlist { effects })
    }

    pub fn from_config(config: &Config) -> Result<Playlist> {
        let frame_delay_ms = config.strip.frame_delay_ms;
        let effects = config
            .playlist
            .iter()
            .map(|entry| create_effect(entry, frame_delay_ms, config.seed))
            .collect::<Result<Vec<_>>>()?;
        Playlist::new(effects)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Plays every effect once. Stops early, between effects, once `shutdown` is set.
    pub fn run_once(&mut self, strip: &mut Strip, shutdown: &AtomicBool) -> Result<()> {
        for effect in &mut self.effects {
            if shutdown.load(Ordering::SeqCst) {
                break;
            }

            log::info!("Playing {}", effect.name());
            let start = Instant::now();
            effect.run(strip)?;
            log::debug!(
                "{} finished after {:.1}s, {} frames shown so far",
                effect.name(),
                start.elapsed().as_secs_f32(),
                strip.frames_shown()
            );
        }
        Ok(())
    }

    /// Plays the playlist over and over until `shutdown` is set, then blanks the strip.
    pub fn run(&mut self, strip: &mut Strip, shutdown: &AtomicBool) -> Result<()> {
        while !shutdown.load(Ordering::SeqCst) {
            self.run_once(strip, shutdown)?;
        }

        log::info!("Shutting down");
        strip.clear_and_show()
    }
}

fn create_effect(
    entry: &EffectConfig,
    frame_delay_ms: u64,
    seed: Option<u64>,
) -> Result<Box<dyn Effect>> {
    let effect: Box<dyn Effect> = match entry {
        EffectConfig::Train {
            color,
            brightness,
            length,
            two_way,
            rainbow,
            comet,
            loops,
        } => Box::new(Train::new(TrainParams {
            color: parse_color(color)?,
            brightness: *brightness,
            length: *length,
            two_way: *two_way,
            rainbow: *rainbow,
            comet: *comet,
            loops: *loops,
            frame_delay_ms,
        })),
        EffectConfig::TravellingRainbow {
            length,
            brightness,
            loops,
        } => Box::new(TravellingRainbow::new(RainbowParams {
            length: *length,
            brightness: *brightness,
            loops: *loops,
            frame_delay_ms,
        })),
        EffectConfig::Twinkle {
            loops,
            brightness,
            fade,
            delay_ms,
        } => Box::new(Twinkle::new(
            TwinkleParams {
                loops: *loops,
                brightness: *brightness,
                fade: *fade,
                delay_ms: *delay_ms,
            },
            seed,
        )),
    };
    Ok(effect)
}
