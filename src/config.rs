use std::net::SocketAddr;
use std::path::Path;

use config_file::FromConfigFile;
use eyre::eyre;
use eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::color::ColorCorrection;
use crate::output::ColorOrder;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub strip: StripConfig,
    pub output: OutputConfig,
    pub playlist: Vec<EffectConfig>,
    /// Fixed seed for random effects. Random on every start if unset.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    pub pixel_count: usize,
    pub frame_delay_ms: u64,
    pub correction: ColorCorrection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub ola_addr: SocketAddr,
    pub universe: u16,
    pub start_channel: usize,
    pub color_order: ColorOrder,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectConfig {
    Train {
        #[serde(default = "default_train_color")]
        color: String,
        #[serde(default = "full_brightness")]
        brightness: u8,
        length: usize,
        #[serde(default)]
        two_way: bool,
        #[serde(default)]
        rainbow: bool,
        #[serde(default)]
        comet: bool,
        #[serde(default = "one_loop")]
        loops: u32,
    },
    TravellingRainbow {
        length: usize,
        #[serde(default = "full_brightness")]
        brightness: u8,
        #[serde(default = "one_loop")]
        loops: u32,
    },
    Twinkle {
        loops: u32,
        #[serde(default = "full_brightness")]
        brightness: u8,
        #[serde(default = "default_twinkle_fade")]
        fade: u8,
        #[serde(default = "default_twinkle_delay")]
        delay_ms: u64,
    },
}

fn default_train_color() -> String {
    "red".to_string()
}

fn full_brightness() -> u8 {
    255
}

fn one_loop() -> u32 {
    1
}

fn default_twinkle_fade() -> u8 {
    32
}

fn default_twinkle_delay() -> u64 {
    100
}

impl Default for StripConfig {
    fn default() -> Self {
        StripConfig {
            pixel_count: 120,
            frame_delay_ms: 15,
            correction: ColorCorrection::TypicalLedStrip,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            ola_addr: SocketAddr::from(([127, 0, 0, 1], 7770)),
            universe: 0,
            start_channel: 0,
            color_order: ColorOrder::Grb,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strip: StripConfig::default(),
            output: OutputConfig::default(),
            playlist: default_playlist(),
            seed: None,
        }
    }
}

fn default_playlist() -> Vec<EffectConfig> {
    vec![
        EffectConfig::Train {
            color: default_train_color(),
            brightness: 200,
            length: 30,
            two_way: true,
            rainbow: true,
            comet: true,
            loops: 1,
        },
        EffectConfig::TravellingRainbow {
            length: 50,
            brightness: 50,
            loops: 100,
        },
        EffectConfig::Twinkle {
            loops: 100,
            brightness: full_brightness(),
            fade: default_twinkle_fade(),
            delay_ms: default_twinkle_delay(),
        },
    ]
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let config = Config::from_config_file(path)
            .wrap_err_with(|| format!("Cannot read config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.strip.pixel_count == 0 {
            return Err(eyre!("The strip needs at least one pixel"));
        }
        if self.playlist.is_empty() {
            return Err(eyre!("The playlist is empty"));
        }
        Ok(())
    }
}
