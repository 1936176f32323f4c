use chrono::Utc;
use clap::Subcommand;
use studyloop_core::session::dispatch;
use studyloop_core::storage::Database;
use studyloop_core::{Config, Event, FocusEngine, SessionMode};

const ENGINE_KEY: &str = "focus_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a focus session
    Start {
        /// Session mode: short, long, or infinite
        #[arg(long)]
        mode: Option<String>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Confirm presence for a pending activity check
    Continue,
    /// Advance the timer (the CLI is the tick source)
    Tick {
        /// Number of one-second ticks to apply
        #[arg(long, default_value = "1")]
        count: u64,
    },
    /// Drive the timer in the foreground, one tick per second
    Run {
        /// How long to run before returning
        #[arg(long, default_value = "60")]
        seconds: u64,
    },
    /// Stop the session; prompts for save when a full minute was studied
    Reset,
    /// Save a stopped session, auto-naming when no name is given
    Save { name: Option<String> },
    /// Discard a stopped session
    Discard,
    /// Print current timer state as JSON
    Status,
}

fn load_engine(db: &Database, config: &Config) -> FocusEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<FocusEngine>(&json) {
            return engine;
        }
    }
    FocusEngine::with_parts(
        SessionMode::Short,
        config.mode_catalog(),
        config.activity_monitor(),
    )
}

fn save_engine(db: &Database, engine: &FocusEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

fn print_events(events: &[Event]) {
    for event in events {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }
}

/// Deliver pending award intents to the database-backed collaborators.
fn flush_intents(db: &Database, engine: &mut FocusEngine) {
    let intents = engine.drain_intents();
    if intents.is_empty() {
        return;
    }
    for failure in dispatch(intents, db, db) {
        eprintln!("delivery failed: {}", failure.message);
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut engine = load_engine(&db, &config);
    let now = Utc::now();

    let mut events: Vec<Event> = Vec::new();
    match action {
        TimerAction::Start { mode } => {
            if let Some(mode) = mode {
                let mode = SessionMode::from_str(&mode)
                    .ok_or_else(|| format!("unknown mode: {mode}"))?;
                if !engine.set_mode(mode) && engine.mode() != mode {
                    eprintln!("mode can only change while idle; keeping {}", engine.mode().as_str());
                }
            }
            events.extend(engine.start(now));
        }
        TimerAction::Pause => events.extend(engine.pause(now)),
        TimerAction::Resume => events.extend(engine.resume(now)),
        TimerAction::Continue => events.extend(engine.confirm_activity(now)),
        TimerAction::Tick { count } => {
            for _ in 0..count {
                events.extend(engine.tick(Utc::now()));
            }
        }
        TimerAction::Run { seconds } => {
            for _ in 0..seconds {
                std::thread::sleep(std::time::Duration::from_secs(1));
                let ticked = engine.tick(Utc::now());
                print_events(&ticked);
                flush_intents(&db, &mut engine);
            }
        }
        TimerAction::Reset => events.extend(engine.reset(now)),
        TimerAction::Save { name } => events.extend(engine.save(name, &db, now)?),
        TimerAction::Discard => events.extend(engine.discard(now)),
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
    }

    print_events(&events);
    flush_intents(&db, &mut engine);
    save_engine(&db, &engine)?;
    Ok(())
}
