//! End-of-session resolution

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Messages;

/// Final result of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub is_win: bool,
    /// Flavor text drawn from the win or lose pool
    pub message: String,
    /// Player peaked at or above the threshold and finished there too
    pub celebrate: bool,
    pub final_score: u32,
    pub peak_score: u32,
}

impl Outcome {
    pub fn title(&self) -> &'static str {
        title_for(self.is_win)
    }
}

fn title_for(is_win: bool) -> &'static str {
    if is_win { "You win!" } else { "Try again" }
}

/// Decide win/lose for a finished session and pick its message
pub fn resolve<R: Rng>(
    score: u32,
    peak_score: u32,
    win_threshold: u32,
    messages: &Messages,
    rng: &mut R,
) -> Outcome {
    let is_win = score >= win_threshold;
    let pool = if is_win {
        &messages.win
    } else {
        &messages.lose
    };
    let message = if pool.is_empty() {
        title_for(is_win).to_string()
    } else {
        pool[rng.random_range(0..pool.len())].clone()
    };

    Outcome {
        is_win,
        message,
        celebrate: peak_score >= win_threshold && score >= win_threshold,
        final_score: score,
        peak_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_win_at_threshold() {
        let messages = Messages::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let out = resolve(10, 10, 10, &messages, &mut rng);
        assert!(out.is_win);
        assert!(out.celebrate);
        assert!(messages.win.contains(&out.message));
        assert_eq!(out.title(), "You win!");
    }

    #[test]
    fn test_peak_without_finish_gets_no_celebration() {
        let messages = Messages::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let out = resolve(7, 10, 10, &messages, &mut rng);
        assert!(!out.is_win);
        assert!(!out.celebrate);
        assert!(messages.lose.contains(&out.message));
        assert_eq!(out.title(), "Try again");
    }

    #[test]
    fn test_empty_pool_falls_back_to_title() {
        let messages = Messages {
            win: Vec::new(),
            ..Messages::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let out = resolve(12, 12, 10, &messages, &mut rng);
        assert_eq!(out.message, "You win!");
    }
}
