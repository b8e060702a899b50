pub mod elect;
pub mod follow;
pub mod order;
pub mod roll;
pub mod round;

use std::path::Path;

use bi_core::ActiveEncounter;
use bi_engine::{EngineConfig, InitiativeEngine};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `--debug` overrides `RUST_LOG`.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("bi_core=debug,bi_engine=debug,bi_sync=debug,bi=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read the host's encounter slot from a JSON file.
fn load_encounter(path: &Path) -> Result<ActiveEncounter, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let slot =
        ActiveEncounter::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), active = slot.0.is_some(), "loaded encounter");
    Ok(slot)
}

/// Write the encounter slot back to its file.
fn save_encounter(path: &Path, slot: &ActiveEncounter) -> Result<(), String> {
    let json = slot.to_json().map_err(|e| e.to_string())?;
    std::fs::write(path, json + "\n").map_err(|e| format!("cannot write {}: {e}", path.display()))
}

fn engine(no_dex: bool, debug: bool) -> InitiativeEngine {
    InitiativeEngine::new(
        EngineConfig::default()
            .with_debug(debug)
            .with_dexterity_tiebreak(!no_dex),
    )
}
