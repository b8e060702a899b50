use std::path::Path;

pub fn run(path: &Path, write: bool) -> Result<(), String> {
    let mut slot = super::load_encounter(path)?;
    let encounter = slot.require_mut().map_err(|e| e.to_string())?;
    let cleared = encounter.advance_round();
    println!(
        "  Round {}: cleared {} initiative rolls",
        encounter.round,
        cleared.len()
    );

    if write {
        super::save_encounter(path, &slot)?;
        println!("  Saved {}", path.display());
    }
    Ok(())
}
