//! Arena Survivor entry point
//!
//! Natively this runs a headless session: the first offered weapon is taken
//! whenever a selection is pending and the player stands still.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings JSON file (defaults when omitted)
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// RNG seed for the run
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Frame budget before the run is stopped
    #[arg(short, long, default_value_t = 36_000)]
    frames: u32,
    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use arena_survivor::platform::NullSink;
    use arena_survivor::sim::{GameEvent, GamePhase};
    use arena_survivor::{Session, Settings};
    use glam::Vec2;

    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    anyhow::ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "--dt must be a positive number of seconds"
    );

    log::info!("Arena Survivor (headless) starting, seed {}", args.seed);
    let mut session = Session::new(
        args.seed,
        Box::new(Vec2::ZERO),
        Box::new(NullSink::default()),
        Box::new(NullSink::default()),
    );
    session.set_on_game_over(|score| log::info!("Final score: {}", score));
    session.start_session(settings);

    let mut kills = 0u32;
    let mut frames_run = 0u32;
    while frames_run < args.frames {
        match session.phase() {
            GamePhase::WeaponSelect => {
                if let Some(kind) = session.offers().first() {
                    log::info!(
                        "Picking {} [{}]: {}",
                        kind.name(),
                        kind.category().as_str(),
                        kind.description()
                    );
                }
                session.on_weapon_selected(0);
            }
            GamePhase::GameOver => break,
            GamePhase::Menu | GamePhase::Running => {}
        }
        session.step_frame(args.dt);
        frames_run += 1;

        for event in session.drain_events() {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::WeaponAdded { kind } => log::debug!("Took {}", kind.name()),
                other => log::debug!("{:?}", other),
            }
        }
    }

    let state = session.state();
    let weapons: Vec<&str> = state.arsenal.kinds().iter().map(|k| k.name()).collect();
    println!("Frames:   {}", frames_run);
    println!("Phase:    {:?}", state.phase);
    println!("Score:    {}", state.score);
    println!("Kills:    {}", kills);
    println!("Health:   {:.0}", state.player.health);
    println!("Survived: {:.1}s", state.elapsed);
    println!("Weapons:  {}", weapons.join(", "));
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page drives `Session` directly; this only sets up logging
    arena_survivor::init_web_logging();
}
