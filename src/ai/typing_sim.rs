//! Typing simulation: the "thinking" pause before an assistant reply lands.
//!
//! The pause is drawn uniformly from the configured range. The UI gets a
//! coarse speed hint alongside the duration to pick a typing animation.

use rand::Rng;
use serde::Serialize;

/// Typing simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypingParams {
    /// How long the typing indicator should show (milliseconds).
    pub duration_ms: u64,
    /// Typing speed description for frontend animation.
    pub speed: TypingSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingSpeed {
    Instant,  // < 300ms
    Fast,     // 300-800ms
    Normal,   // 800-2000ms
    Slow,     // 2000-4000ms
    Thinking, // 4000ms+
}

impl TypingSpeed {
    pub fn classify(duration_ms: u64) -> Self {
        match duration_ms {
            0..=299 => TypingSpeed::Instant,
            300..=799 => TypingSpeed::Fast,
            800..=1999 => TypingSpeed::Normal,
            2000..=3999 => TypingSpeed::Slow,
            _ => TypingSpeed::Thinking,
        }
    }
}

/// Draw a thinking delay from `[min_ms, max_ms]`. A reversed range is
/// treated as its sorted form.
pub fn calculate_thinking_delay<R: Rng + ?Sized>(
    min_ms: u64,
    max_ms: u64,
    rng: &mut R,
) -> TypingParams {
    let (lo, hi) = if min_ms <= max_ms {
        (min_ms, max_ms)
    } else {
        (max_ms, min_ms)
    };
    let duration_ms = if lo == hi { lo } else { rng.gen_range(lo..=hi) };

    TypingParams {
        duration_ms,
        speed: TypingSpeed::classify(duration_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn delay_stays_within_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let p = calculate_thinking_delay(1000, 2000, &mut rng);
            assert!(
                (1000..=2000).contains(&p.duration_ms),
                "Delay out of range: {}ms",
                p.duration_ms
            );
        }
    }

    #[test]
    fn zero_range_is_instant() {
        let mut rng = StdRng::seed_from_u64(0);
        let p = calculate_thinking_delay(0, 0, &mut rng);
        assert_eq!(p.duration_ms, 0);
        assert_eq!(p.speed, TypingSpeed::Instant);
    }

    #[test]
    fn reversed_range_is_tolerated() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = calculate_thinking_delay(900, 100, &mut rng);
        assert!((100..=900).contains(&p.duration_ms));
    }

    #[test]
    fn speed_buckets() {
        assert_eq!(TypingSpeed::classify(250), TypingSpeed::Instant);
        assert_eq!(TypingSpeed::classify(500), TypingSpeed::Fast);
        assert_eq!(TypingSpeed::classify(1500), TypingSpeed::Normal);
        assert_eq!(TypingSpeed::classify(3000), TypingSpeed::Slow);
        assert_eq!(TypingSpeed::classify(4500), TypingSpeed::Thinking);
    }
}
