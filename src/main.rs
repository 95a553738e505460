//! Chakra Hustle headless runner
//!
//! Drives the deterministic simulation with a scripted autopilot and logs a
//! run summary. Rendering, audio and menus live in the presentation layer.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use chakra_hustle::consts::{ABILITY_COUNT, TICK_RATE};
    use chakra_hustle::sim::{
        Actions, FollowCamera, GameEvent, GamePhase, GameState, TickInput, tick,
    };
    use chakra_hustle::{RunConfig, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "chakra-hustle", about = "Run the Chakra Hustle simulation headless")]
    pub struct Args {
        /// Run seed
        #[arg(short, long, default_value_t = 42)]
        seed: u64,

        /// Ticks to simulate
        #[arg(short, long, default_value_t = 3600)]
        ticks: u64,

        /// Tuning JSON replacing the built-in balance table
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Run configuration JSON (seed, modifiers, stat overrides)
        #[arg(long)]
        run_config: Option<PathBuf>,

        /// Spend tokens on a continue when the player dies
        #[arg(long)]
        auto_continue: bool,

        /// Print the effective tuning as JSON and exit
        #[arg(long)]
        dump_tuning: bool,
    }

    /// Scripted input: run right, hop gaps, swing at anything close
    fn autopilot(state: &GameState) -> Actions {
        let player = &state.player;
        let rect = player.rect();
        let frame = state.clock.frame;

        let ledge_ahead = !state.platforms.iter().any(|p| {
            p.rect.left() <= rect.right() + 40.0 && p.right() >= rect.right() + 40.0
        });
        let threat = state
            .enemies
            .iter()
            .filter(|e| !e.dead)
            .map(|e| e.body.center())
            .chain(state.boss.as_ref().map(|b| b.core.center()))
            .any(|c| c.distance(player.center()) < 90.0);

        let mut actions = Actions {
            right: true,
            jump: (player.grounded && ledge_ahead) || (!player.grounded && frame % 20 == 0),
            attack: threat,
            dash: ledge_ahead && !player.grounded && player.energy > 50.0,
            ..Actions::default()
        };
        for slot in 0..ABILITY_COUNT {
            actions.powers[slot] = threat && state.abilities.can_activate(slot, player.energy, &state.tuning);
        }
        actions
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let base = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        let config = match &args.run_config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("loading run config from {}", path.display()))?,
            None => RunConfig::with_seed(args.seed),
        };

        let mut state = GameState::from_config(&config, &base);
        if args.dump_tuning {
            println!("{}", state.tuning.to_json()?);
            return Ok(());
        }

        let mut camera = FollowCamera::new(&state.tuning.camera, state.tuning.screen.width, state.seed);
        let mut prev = Actions::default();
        let (mut kills, mut bosses) = (0u32, 0u32);

        for _ in 0..args.ticks {
            let now = autopilot(&state);
            let input = TickInput::from_frames(&prev, &now);
            prev = now;

            tick(&mut state, &input, &mut camera);

            for event in state.events.drain() {
                match event {
                    GameEvent::EnemyKilled { .. } => kills += 1,
                    GameEvent::BossDefeated { .. } => bosses += 1,
                    GameEvent::WorldEntered { world, ng_plus } => {
                        log::info!("Entered world {} (NG+{})", world + 1, ng_plus)
                    }
                    other => log::trace!("{:?}", other),
                }
            }

            if state.phase == GamePhase::GameOver && !(args.auto_continue && state.continue_run()) {
                break;
            }
        }

        log::info!(
            "Finished after {} ticks ({:.1}s): {} | score {} | {} kills | {} bosses | {} tokens",
            state.clock.frame,
            state.clock.frame as f32 / TICK_RATE as f32,
            state.location_label(),
            state.player.score,
            kills,
            bosses,
            state.economy.tokens
        );
        let summary = serde_json::json!({
            "seed": state.seed,
            "ticks": state.clock.frame,
            "score": state.player.score,
            "kills": kills,
            "bosses": bosses,
            "tokens": state.economy.tokens,
            "location": state.location_label(),
            "game_over": state.phase == GamePhase::GameOver,
        });
        println!("{summary}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Chakra Hustle (headless) starting...");
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the simulation through the library
}
