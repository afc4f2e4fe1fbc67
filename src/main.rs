//! Hop Runner entry point
//!
//! Natively this runs headless autopilot sessions and reports the scores.
//! The browser build is driven from JavaScript through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::PathBuf;

    use hop_runner::highscores::JsonFileStore;
    use hop_runner::sim::autopilot;
    use hop_runner::sim::{GameEvent, GameMode, GamePhase, Session};
    use hop_runner::{HighScoreStore, MemoryStore, Settings};

    /// Simulated display refresh
    const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Command-line options
    struct Options {
        mode: GameMode,
        seed: u64,
        runs: u32,
        max_seconds: f64,
        settings: Option<PathBuf>,
        scores: Option<PathBuf>,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                mode: GameMode::Marathon,
                seed: rand::random(),
                runs: 3,
                max_seconds: 120.0,
                settings: None,
                scores: None,
            }
        }
    }

    const USAGE: &str = "usage: hop-runner [--mode classic|marathon|challenge] [--seed N] \
                         [--runs N] [--max-seconds S] [--settings FILE] [--scores FILE]";

    fn parse_args() -> Result<Options, Box<dyn Error>> {
        let mut opts = Options::default();
        let mut args = std::env::args().skip(1);
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{} needs a value\n{}", flag, USAGE));
            match flag.as_str() {
                "--mode" => {
                    opts.mode = value()?
                        .parse::<GameMode>()
                        .map_err(|e| format!("{}\n{}", e, USAGE))?;
                }
                "--seed" => opts.seed = value()?.parse()?,
                "--runs" => opts.runs = value()?.parse()?,
                "--max-seconds" => opts.max_seconds = value()?.parse()?,
                "--settings" => opts.settings = Some(value()?.into()),
                "--scores" => opts.scores = Some(value()?.into()),
                "-h" | "--help" => {
                    println!("{}", USAGE);
                    std::process::exit(0);
                }
                other => return Err(format!("unknown argument {:?}\n{}", other, USAGE).into()),
            }
        }
        Ok(opts)
    }

    /// Play one autopilot run to game over or the time limit; returns the score.
    ///
    /// A run that reaches the limit is abandoned without committing a score.
    fn play_run<S: HighScoreStore>(session: &mut Session<S>, mode: GameMode, max_seconds: f64) -> f64 {
        session.select_mode(mode);
        while session.phase() == GamePhase::Playing && session.state().score < max_seconds {
            if autopilot::should_jump(session.state()) {
                session.jump();
            }
            session.tick(FRAME_MS);

            for event in session.drain_events() {
                match event {
                    GameEvent::LevelUp { level } => log::info!("Level {}", level),
                    GameEvent::GameOver { score, new_high_score: true } => {
                        log::info!("New high score: {}", score)
                    }
                    _ => {}
                }
            }
        }
        if session.phase() == GamePhase::Playing {
            log::info!("Run abandoned at the {}s limit", max_seconds);
        }
        session.state().score
    }

    /// Play every requested run, one session each, sharing `store`.
    /// Returns run scores and the stored best.
    fn play_all<S: HighScoreStore>(opts: &Options, settings: Settings, mut store: S) -> (Vec<f64>, u64) {
        let mut scores = Vec::with_capacity(opts.runs as usize);
        for run in 0..opts.runs {
            let seed = opts.seed.wrapping_add(run as u64);
            let mut session = Session::new(seed, settings.clone(), store);
            scores.push(play_run(&mut session, opts.mode, opts.max_seconds));
            store = session.into_store();
        }
        let best = store.load(opts.mode);
        (scores, best)
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        env_logger::init();
        let opts = parse_args()?;

        let settings = match &opts.settings {
            Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
            None => Settings::default(),
        };
        log::info!(
            "Hop Runner (native) starting: mode={}, seed={}, runs={}",
            opts.mode.as_str(),
            opts.seed,
            opts.runs
        );

        let (scores, best) = match &opts.scores {
            Some(path) => play_all(&opts, settings, JsonFileStore::open(path)),
            None => play_all(&opts, settings, MemoryStore::new()),
        };

        println!("Best {}: {}", opts.mode.as_str(), best);
        for (i, score) in scores.iter().enumerate() {
            println!("Run {}: {:.2}", i + 1, score);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
