//! Headless mission timer runner.
//!
//! Loads the galaxy, the missions and a flight plan, flies the plan one tick
//! at a time while stepping every accepted mission, then writes player and
//! mission state to the save file.

mod config;
mod scenario;

use anyhow::{Context, Result};
use engine_core::SimClock;
use mission::{
    DataFile, DataWriter, Galaxy, InstantiateContext, MessageLog, Mission, MissionTemplate,
    PlayerInfo,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::RunConfig;
use scenario::Scenario;

fn load_data(path: &std::path::Path) -> Result<DataFile> {
    DataFile::load(path).with_context(|| format!("Could not load {}", path.display()))
}

/// Missions to run: either resumed from the save file or freshly accepted.
fn start_missions(
    config: &RunConfig,
    galaxy: &Galaxy,
    player: &mut PlayerInfo,
    rng: &mut StdRng,
) -> Result<Vec<Mission>> {
    if config.resume && config.save_path.exists() {
        let save = load_data(&config.save_path)?;
        let mut missions = Vec::new();
        for node in &save {
            match node.token(0) {
                "player" => player.load(node),
                "mission" => missions.push(Mission::load(node, galaxy, rng)),
                _ => node.print_trace("Skipping unrecognized save node"),
            }
        }
        log::info!("Resumed {} missions from {}", missions.len(), config.save_path.display());
        return Ok(missions);
    }

    let templates: Vec<MissionTemplate> = MissionTemplate::load_all(&load_data(&config.missions_path)?);
    let mut context = InstantiateContext::new(&config.substitutions);
    context.origin = config.origin.as_deref();
    context.jumps = config.jumps;
    context.payload = config.payment;
    Ok(templates
        .iter()
        .map(|template| template.instantiate(&context, galaxy, rng))
        .collect())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RunConfig::load();
    if std::env::args().any(|arg| arg == "--write-config") {
        config.save();
    }
    let galaxy = Galaxy::from_file(&load_data(&config.galaxy_path)?);
    let scenario = Scenario::load(&load_data(&config.scenario_path)?);
    if galaxy.is_empty() {
        log::warn!(
            "No systems in {}; every system and proximity gate will fail",
            config.galaxy_path.display()
        );
    }
    log::info!(
        "Loaded {} systems and a {}-leg flight plan ({} ticks)",
        galaxy.len(),
        scenario.legs.len(),
        scenario.total_ticks()
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut player = PlayerInfo::default();
    let mut missions = start_missions(&config, &galaxy, &mut player, &mut rng)?;
    let mut ui = MessageLog::new();
    let mut clock = SimClock::with_rate(config.tick_rate);
    let mut ship = scenario.flagship.clone();

    for leg in &scenario.legs {
        leg.apply(&mut ship);
        player.flagship = (!leg.parked).then(|| ship.clone());
        for _ in 0..leg.ticks {
            for mission in &mut missions {
                mission.step(&mut player, &mut ui, &galaxy);
            }
            clock.advance();
        }
    }

    log::info!(
        "Ran {} ticks ({:.1} s of game time)",
        clock.tick(),
        clock.elapsed_seconds()
    );
    for mission in &missions {
        for timer in mission.timers() {
            log::info!(
                "{}: timer \"{}\" {}",
                mission.name(),
                timer.name(),
                if timer.is_complete() {
                    "complete".to_string()
                } else {
                    format!(
                        "{} ticks left ({:.1} s)",
                        timer.remaining(),
                        clock.ticks_to_seconds(timer.remaining())
                    )
                }
            );
        }
        if mission.timers_satisfied() {
            log::info!("{}: all required timers done", mission.name());
        }
    }

    let mut out = DataWriter::new();
    player.save(&mut out);
    for mission in &missions {
        mission.save(&mut out);
    }
    out.save(&config.save_path)
        .with_context(|| format!("Could not write save to {}", config.save_path.display()))?;
    log::info!("Saved to {}", config.save_path.display());

    Ok(())
}
