use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn run(
    formula: &str,
    manual: Option<&str>,
    seed: Option<u64>,
    debug: bool,
) -> Result<(), String> {
    let engine = super::engine(false, debug);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let roll = engine
        .roll(formula, manual, &mut rng)
        .map_err(|e| e.to_string())?;

    if manual.is_some() && roll.manual().is_none() {
        println!("  {}", "Manual roll ignored; using the random roll.".yellow());
    }
    println!("  {} = {}", roll.formula(), roll.total());
    Ok(())
}
