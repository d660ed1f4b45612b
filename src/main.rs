//! Jerry Dash entry point
//!
//! The browser build is driven from JavaScript through `platform::web`. The
//! native binary plays one seeded session with a simple autoplayer and prints
//! the result:
//!
//! ```text
//! jerry-dash [easy|normal|master] [seed]
//! ```
//!
//! Set `JERRY_DASH_CONFIG` to a JSON file to override game options.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use jerry_dash::sim::{Difficulty, EventLog, GameEvent, Session, StepInput, TargetKind, step};
    use jerry_dash::tuning::GameConfig;

    /// Simulation step (~60 fps)
    const FRAME_MS: u64 = 16;
    /// Autoplayer reaction time bounds (ms)
    const REACTION_MS: (u64, u64) = (200, 850);
    /// Chance the autoplayer taps a dirty can by mistake
    const MISTAKE_CHANCE: f64 = 0.15;

    /// What the autoplayer intends to do with the current target
    struct Plan {
        target_id: u32,
        cell: usize,
        tap_at_ms: Option<u64>,
    }

    fn load_config() -> GameConfig {
        let Ok(path) = std::env::var("JERRY_DASH_CONFIG") else {
            return GameConfig::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => {
                log::info!("Loading config from {}", path);
                GameConfig::from_json_or_default(&json)
            }
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path, e);
                GameConfig::default()
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Jerry Dash (native) starting...");

        let mut args = std::env::args().skip(1);
        let difficulty = args
            .next()
            .map(|s| Difficulty::parse_or_default(&s))
            .unwrap_or_default();
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        log::info!("Seed: {}", seed);

        let mut session = Session::new(load_config(), seed, EventLog::new());
        session.set_difficulty(difficulty);
        let mut player = Pcg32::seed_from_u64(seed.rotate_left(17));
        let mut plan: Option<Plan> = None;

        step(
            &mut session,
            &StepInput {
                start: true,
                ..Default::default()
            },
            0,
        );

        while session.is_running() {
            let now = session.now_ms();

            if let Some(target) = session.grid().live().next()
                && plan.as_ref().is_none_or(|p| p.target_id != target.id)
            {
                let wants_tap = match target.kind {
                    TargetKind::Normal => true,
                    TargetKind::Obstacle => player.random::<f64>() < MISTAKE_CHANCE,
                };
                let reaction = player.random_range(REACTION_MS.0..=REACTION_MS.1);
                plan = Some(Plan {
                    target_id: target.id,
                    cell: target.cell,
                    tap_at_ms: wants_tap.then_some(target.created_at_ms + reaction),
                });
            }

            let mut input = StepInput::default();
            if let Some(p) = &mut plan
                && p.tap_at_ms.is_some_and(|at| at <= now)
            {
                input.tap = Some(p.cell);
                p.tap_at_ms = None;
            }

            step(&mut session, &input, FRAME_MS);

            for event in session.hooks_mut().drain() {
                match event {
                    GameEvent::Achievement { message, .. } => log::info!("{}", message),
                    GameEvent::TimeChanged { remaining_secs } => {
                        log::debug!("{}s left", remaining_secs)
                    }
                    other => log::trace!("{:?}", other),
                }
            }
        }

        match session.last_outcome() {
            Some(outcome) => {
                println!("{}", outcome.title());
                println!("{}", outcome.message);
                println!(
                    "Score: {} (peak {}) on {}",
                    outcome.final_score,
                    outcome.peak_score,
                    session.difficulty().as_str()
                );
                if outcome.celebrate {
                    println!("*** confetti ***");
                }
            }
            None => log::warn!("Session stopped without an outcome"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web, this is just to satisfy the compiler
}
