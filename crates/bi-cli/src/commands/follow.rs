use std::path::Path;

use colored::Colorize;

use bi_engine::FollowOutcome;

pub fn run(path: &Path, leader: Option<&str>, write: bool, debug: bool) -> Result<(), String> {
    let mut slot = super::load_encounter(path)?;
    let engine = super::engine(false, debug);

    let pass = match leader {
        Some(name) => {
            let encounter = slot.require().map_err(|e| e.to_string())?;
            let id = match encounter.by_name(name).as_slice() {
                [only] => only.id.clone(),
                [] => return Err(format!("no combatant named '{name}'")),
                _ => return Err(format!("more than one combatant named '{name}'")),
            };
            engine.propagate_from(&slot, &id)
        }
        None => engine.resolve_follows(&slot),
    }
    .map_err(|e| e.to_string())?;

    if pass.outcomes.is_empty() {
        println!("  No followers to resolve.");
        return Ok(());
    }

    let encounter = slot.require().map_err(|e| e.to_string())?;
    for (id, outcome) in &pass.outcomes {
        let name = encounter
            .combatant(id)
            .map_or(id.as_str(), |c| c.name.as_str());
        let text = outcome.to_string();
        let text = match outcome {
            FollowOutcome::Updated(_) => text.green(),
            FollowOutcome::Current(_) | FollowOutcome::NotApplicable => text.dimmed(),
            FollowOutcome::Unresolvable(_) => text.yellow(),
        };
        println!("  {name}: {text}");
    }
    println!();
    println!("  {} initiative writes", pass.writes.len());

    if write && !pass.is_noop() {
        slot.require_mut()
            .and_then(|enc| enc.apply_all(&pass.writes))
            .map_err(|e| e.to_string())?;
        super::save_encounter(path, &slot)?;
        println!("  Saved {}", path.display());
    }

    Ok(())
}
