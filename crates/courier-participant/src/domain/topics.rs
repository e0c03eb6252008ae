//! Topic interests and sample payloads.

use courier_types::TOPIC_CATALOGUE;
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks topic interests from the fixed catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicSelector;

impl TopicSelector {
    /// Create a selector over [`TOPIC_CATALOGUE`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// `count` distinct random topics (the whole catalogue at most).
    #[must_use]
    pub fn interest(&self, count: usize) -> Vec<String> {
        self.interest_with(&mut rand::thread_rng(), count)
    }

    /// Like [`Self::interest`] with a caller-supplied generator.
    pub fn interest_with<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<String> {
        TOPIC_CATALOGUE
            .choose_multiple(rng, count)
            .map(|t| t.to_string())
            .collect()
    }

    /// A plausible reading for `topic`.
    pub fn sample_payload<R: Rng + ?Sized>(&self, rng: &mut R, topic: &str) -> String {
        let choices: &[&str] = match topic {
            "weather" => &["sunny", "cloudy", "rainy", "foggy", "windy", "snowy"],
            "humidity" => &["30.0", "45.5", "60.2", "75.8", "90.1"],
            "airquality" => &["good", "moderate", "unhealthy", "hazardous"],
            "light" => &["dim", "bright", "dark", "dazzling"],
            "pressure" => &["1001", "1013", "1020", "998"],
            "temperature" => &["-10", "0", "15", "22", "35"],
            "sound" => &["quiet", "loud", "deafening", "murmur"],
            "altitude" => &["0", "500", "1500", "3000"],
            "location" => &["America", "Europe", "Asia", "Africa", "Australia"],
            _ => &["n/a"],
        };
        choices
            .choose(rng)
            .map_or_else(|| "n/a".to_string(), |c| c.to_string())
    }
}
