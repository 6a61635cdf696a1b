//! Simulated thermo-hygrometer: produces a slowly varying reading per poll.

use thermohub_domain::reading::Reading;

/// Number of reads in one full swing of the simulated values.
const PERIOD: u64 = 8;

/// Base values and swing of a simulated sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub temperature: f64,
    pub humidity: f64,
    pub battery: f64,
    /// Peak deviation of temperature (°C) and humidity (%) from their base.
    pub swing: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            temperature: 21.5,
            humidity: 45.0,
            battery: 80.0,
            swing: 1.0,
        }
    }
}

/// State of one simulated sensor.
#[derive(Debug)]
pub struct VirtualSensor {
    profile: Profile,
    reads: u64,
}

impl VirtualSensor {
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self { profile, reads: 0 }
    }

    /// Number of readings produced so far.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Produce the next reading.
    ///
    /// The first reading equals the profile base values. Later readings
    /// follow a triangle wave of amplitude `swing`; humidity moves opposite
    /// to temperature.
    pub fn next_reading(&mut self) -> Reading {
        let offset = self.profile.swing * triangle(self.reads);
        self.reads += 1;
        Reading::new(
            round(self.profile.temperature + offset),
            round(self.profile.humidity - offset),
            self.profile.battery,
        )
    }
}

/// Triangle wave in `[-1.0, 1.0]`, starting at `0.0`.
#[allow(clippy::cast_precision_loss)]
fn triangle(step: u64) -> f64 {
    let quarter = PERIOD / 4;
    let phase = step % PERIOD;
    let value = if phase <= quarter {
        phase as f64
    } else if phase <= 3 * quarter {
        (2 * quarter) as f64 - phase as f64
    } else {
        phase as f64 - PERIOD as f64
    };
    value / quarter as f64
}

fn round(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
