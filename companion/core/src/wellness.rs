//! Home Dashboard Data
//!
//! Mock biometrics for the home screen. Nothing here reads a sensor: the
//! emotion wave is generated once per visit and the heart rate wanders
//! randomly within a plausible range.

use std::time::Duration;

use rand::Rng;

/// Points in the emotion wave
pub const WAVE_POINTS: usize = 30;

/// Resting heart rate shown on arrival
pub const INITIAL_HEART_RATE: u8 = 72;

/// Heart-rate bounds, BPM
pub const HEART_RATE_RANGE: std::ops::RangeInclusive<u8> = 50..=120;

/// Body temperature, °C
pub const TEMPERATURE_C: f32 = 36.8;

/// Sleep duration label
pub const SLEEP_LABEL: &str = "7h 15m";

/// Sleep stages and their relative weights
pub const SLEEP_BREAKDOWN: [(&str, u16); 4] =
    [("Deep", 400), ("Light", 300), ("REM", 300), ("Awake", 100)];

/// Analysis blurb under the vitals
pub const ANALYSIS: &str = "Your recent HRV and skin electricity data suggest a period of \
                            high focus. Remember to take short breaks.";

/// Call to action that leads to the games page
pub const SUGGESTION: &str = "Today's Suggestion: Try a Game";

/// Today's emotion curve
#[derive(Clone, Debug, PartialEq)]
pub struct EmotionWave {
    /// Sample values around 50
    pub points: Vec<f64>,
    /// Whether the day looks turbulent
    pub volatile: bool,
}

impl EmotionWave {
    /// A new random wave
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let volatile = rng.gen_bool(0.5);
        let amplitude = if volatile { 30.0 } else { 10.0 };
        let points = (0..WAVE_POINTS)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64 * 0.5;
                50.0 + x.sin() * amplitude * rng.gen::<f64>() + (rng.gen::<f64>() - 0.5) * 10.0
            })
            .collect();
        Self { points, volatile }
    }

    /// Caption under the chart
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.volatile {
            "Volatile"
        } else {
            "Calm"
        }
    }
}

/// Everything the home screen shows, for one visit
#[derive(Clone, Debug)]
pub struct Dashboard {
    wave: EmotionWave,
    heart_rate: u8,
    heart_rate_interval: Duration,
    since_update: Duration,
}

impl Dashboard {
    /// Fresh data for a new visit
    pub fn new<R: Rng + ?Sized>(rng: &mut R, heart_rate_interval: Duration) -> Self {
        Self {
            wave: EmotionWave::generate(rng),
            heart_rate: INITIAL_HEART_RATE,
            heart_rate_interval,
            since_update: Duration::ZERO,
        }
    }

    /// Emotion wave
    #[must_use]
    pub fn wave(&self) -> &EmotionWave {
        &self.wave
    }

    /// Current heart rate, BPM
    #[must_use]
    pub fn heart_rate(&self) -> u8 {
        self.heart_rate
    }

    /// Body temperature, °C
    #[must_use]
    pub fn temperature(&self) -> f32 {
        TEMPERATURE_C
    }

    /// Advance the heart-rate walk
    pub fn tick<R: Rng + ?Sized>(&mut self, delta: Duration, rng: &mut R) {
        if self.heart_rate_interval.is_zero() {
            return;
        }
        self.since_update += delta;
        while self.since_update >= self.heart_rate_interval {
            self.since_update -= self.heart_rate_interval;
            let step: i16 = rng.gen_range(-2..=2);
            let next = (i16::from(self.heart_rate) + step).clamp(
                i16::from(*HEART_RATE_RANGE.start()),
                i16::from(*HEART_RATE_RANGE.end()),
            );
            self.heart_rate = u8::try_from(next).unwrap_or(INITIAL_HEART_RATE);
        }
    }
}
