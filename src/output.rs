use std::io::{self, Stdout, Write};

use eyre::Result;
use serde::Deserialize;

use crate::color::Rgb8;

/// Something that puts a rendered frame onto LEDs. Frames arrive with
/// brightness and color correction already applied.
pub trait Output {
    fn write(&mut self, frame: &[Rgb8]) -> Result<()>;

    fn describe(&self) -> String;
}

/// Wire order of the three color channels, e.g. GRB for WS2812B strips.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorOrder {
    Rgb,
    Rbg,
    #[default]
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl ColorOrder {
    pub fn arrange(self, color: Rgb8) -> [u8; 3] {
        let (r, g, b) = (color.red, color.green, color.blue);
        match self {
            ColorOrder::Rgb => [r, g, b],
            ColorOrder::Rbg => [r, b, g],
            ColorOrder::Grb => [g, r, b],
            ColorOrder::Gbr => [g, b, r],
            ColorOrder::Brg => [b, r, g],
            ColorOrder::Bgr => [b, g, r],
        }
    }
}

/// Draws the strip as a single line of truecolor blocks, redrawn in place.
pub struct TerminalOutput {
    stdout: Stdout,
}

impl TerminalOutput {
    pub fn new() -> TerminalOutput {
        TerminalOutput {
            stdout: io::stdout(),
        }
    }
}

impl Output for TerminalOutput {
    fn write(&mut self, frame: &[Rgb8]) -> Result<()> {
        let mut line = String::with_capacity(frame.len() * 24 + 8);
        line.push('\r');
        for pixel in frame {
            line.push_str(&format!(
                "\x1b[38;2;{};{};{}m\u{2588}",
                pixel.red, pixel.green, pixel.blue
            ));
        }
        line.push_str("\x1b[0m");

        let mut stdout = self.stdout.lock();
        stdout.write_all(line.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        "terminal preview".to_string()
    }
}
