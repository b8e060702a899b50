//! Initiative roll formulas and evaluation.
//!
//! Formulas are the small arithmetic expressions the host builds for an
//! initiative roll: dice terms (`1d20`, `2d20kh` for advantage, `2d20kl`
//! for disadvantage), integer modifiers and `+`/`-` between them.
//! Dice terms are capped at [`MAX_DICE`] dice of at most [`MAX_FACES`]
//! faces, and a total that leaves the `i32` range is an error.

pub mod manual;

pub use manual::ManualRoll;

use std::fmt;
use std::ops::Range;

use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// Most dice a single term may roll.
pub const MAX_DICE: u32 = 100;

/// Most faces a single die may have.
pub const MAX_FACES: u32 = 1000;

/// Which dice of a multi-die term count toward the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Keep {
    /// Keep the highest `n` dice.
    Highest(u32),
    /// Keep the lowest `n` dice.
    Lowest(u32),
}

/// One `NdM` term with an optional keep modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceTerm {
    /// Number of dice rolled.
    pub count: u32,
    /// Faces per die.
    pub faces: u32,
    /// Keep modifier, if any.
    pub keep: Option<Keep>,
}

impl DiceTerm {
    /// A straight d20, or two d20 with a keep rule.
    pub fn is_d20_roll(&self) -> bool {
        self.faces == 20 && matches!((self.count, self.keep), (1, _) | (2, Some(_)))
    }
}

/// A single formula term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Term {
    /// Dice to roll.
    Dice(DiceTerm),
    /// A flat modifier.
    Constant(i32),
}

/// Sign applied to a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sign {
    /// Added to the total.
    Plus,
    /// Subtracted from the total.
    Minus,
}

impl Sign {
    fn apply(self, value: i64) -> i64 {
        match self {
            Self::Plus => value,
            Self::Minus => -value,
        }
    }
}

/// A parsed roll formula that keeps its original text for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollFormula {
    source: String,
    terms: Vec<(Sign, Term)>,
    /// Byte range of each term in `source`.
    #[serde(skip)]
    spans: Vec<Range<usize>>,
}

impl RollFormula {
    /// Parse a formula such as `1d20 + 5` or `2d20kh + 3 - 1`.
    pub fn parse(input: &str) -> EngineResult<Self> {
        let source = input.trim().to_string();
        let mut chars = source.char_indices().peekable();
        let mut terms = Vec::new();
        let mut spans = Vec::new();
        let mut sign = Sign::Plus;
        let mut expect_term = true;

        while let Some(&(pos, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }
            if expect_term {
                // A leading sign is only valid before the first term.
                if terms.is_empty() && (c == '-' || c == '+') {
                    sign = if c == '-' { Sign::Minus } else { Sign::Plus };
                    chars.next();
                    continue;
                }
                let start = pos;
                let mut end = pos;
                while let Some(&(p, ch)) = chars.peek() {
                    if ch.is_ascii_alphanumeric() {
                        end = p + ch.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                if start == end {
                    return Err(invalid(&source, &format!("unexpected '{c}'")));
                }
                terms.push((sign, parse_term(&source, &source[start..end])?));
                spans.push(start..end);
                expect_term = false;
            } else {
                sign = match c {
                    '+' => Sign::Plus,
                    '-' => Sign::Minus,
                    other => return Err(invalid(&source, &format!("expected operator, got '{other}'"))),
                };
                chars.next();
                expect_term = true;
            }
        }

        if terms.is_empty() || expect_term {
            return Err(invalid(&source, "missing term"));
        }
        Ok(Self {
            source,
            terms,
            spans,
        })
    }

    /// The formula as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Signed terms in order.
    pub fn terms(&self) -> &[(Sign, Term)] {
        &self.terms
    }

    /// Index of the term a physical die stands in for: the first `1d20`
    /// or `2d20k` term, else the first dice term of any kind.
    pub fn initiative_die(&self) -> Option<usize> {
        let dice = |pick: fn(&DiceTerm) -> bool| {
            self.terms
                .iter()
                .position(|(_, t)| matches!(t, Term::Dice(d) if pick(d)))
        };
        dice(DiceTerm::is_d20_roll).or_else(|| dice(|_| true))
    }
}

impl fmt::Display for RollFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn invalid(source: &str, reason: &str) -> EngineError {
    EngineError::InvalidFormula(format!("'{source}': {reason}"))
}

fn parse_number(source: &str, digits: &str) -> EngineResult<u32> {
    digits
        .parse::<u32>()
        .map_err(|_| invalid(source, &format!("bad number '{digits}'")))
}

fn parse_term(source: &str, token: &str) -> EngineResult<Term> {
    let lower = token.to_ascii_lowercase();
    let Some((count, rest)) = lower.split_once('d') else {
        let value = parse_number(source, &lower)?;
        let value = i32::try_from(value).map_err(|_| invalid(source, "modifier too large"))?;
        return Ok(Term::Constant(value));
    };

    let count = if count.is_empty() {
        1
    } else {
        parse_number(source, count)?
    };
    let (faces, keep) = match rest.split_once('k') {
        None => (rest, None),
        Some((faces, modifier)) => {
            let (lowest, n) = if let Some(n) = modifier.strip_prefix('l') {
                (true, n)
            } else {
                (false, modifier.strip_prefix('h').unwrap_or(modifier))
            };
            let n = if n.is_empty() { 1 } else { parse_number(source, n)? };
            let keep = if lowest { Keep::Lowest(n) } else { Keep::Highest(n) };
            (faces, Some(keep))
        }
    };
    let faces = parse_number(source, faces)?;
    if count == 0 || faces < 2 {
        return Err(invalid(source, &format!("bad dice term '{token}'")));
    }
    if count > MAX_DICE {
        return Err(invalid(source, &format!("at most {MAX_DICE} dice per term")));
    }
    if faces > MAX_FACES {
        return Err(invalid(source, &format!("at most {MAX_FACES} faces per die")));
    }
    Ok(Term::Dice(DiceTerm { count, faces, keep }))
}

/// The evaluated value of one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermResult {
    /// Individual die results (empty for constants).
    pub rolls: Vec<i32>,
    /// Unsigned value of the term after keep rules.
    pub value: i32,
}

/// An evaluated initiative roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitiativeRoll {
    formula: RollFormula,
    display: String,
    results: Vec<TermResult>,
    manual: Option<ManualRoll>,
    total: i32,
}

impl InitiativeRoll {
    /// Roll every dice term of `formula`.
    ///
    /// Fails with [`EngineError::InvalidFormula`] when the signed total
    /// does not fit an `i32`.
    pub fn evaluate(formula: &RollFormula, rng: &mut StdRng) -> EngineResult<Self> {
        let results = formula
            .terms
            .iter()
            .map(|(_, term)| match term {
                Term::Constant(v) => TermResult {
                    rolls: Vec::new(),
                    value: *v,
                },
                Term::Dice(dice) => roll_dice(dice, rng),
            })
            .collect();
        let mut roll = Self {
            formula: formula.clone(),
            display: formula.source.clone(),
            results,
            manual: None,
            total: 0,
        };
        roll.total = roll.signed_sum()?;
        Ok(roll)
    }

    /// The formula as displayed to the table.
    pub fn formula(&self) -> &str {
        &self.display
    }

    /// The parsed formula this roll came from.
    pub fn parsed(&self) -> &RollFormula {
        &self.formula
    }

    /// Per-term results.
    pub fn results(&self) -> &[TermResult] {
        &self.results
    }

    /// The manual value substituted into the roll, if any.
    pub fn manual(&self) -> Option<ManualRoll> {
        self.manual
    }

    /// Value of the initiative die: the first d20 term, else the first
    /// dice term.
    pub fn die_total(&self) -> Option<i32> {
        self.formula.initiative_die().map(|i| self.results[i].value)
    }

    /// Signed sum of every term.
    pub fn total(&self) -> i32 {
        self.total
    }

    fn signed_sum(&self) -> EngineResult<i32> {
        self.formula
            .terms
            .iter()
            .zip(&self.results)
            .try_fold(0i64, |acc, ((sign, _), r)| {
                acc.checked_add(sign.apply(i64::from(r.value)))
            })
            .and_then(|sum| i32::try_from(sum).ok())
            .ok_or_else(|| invalid(&self.formula.source, "total out of range"))
    }
}

impl fmt::Display for InitiativeRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.display, self.total())
    }
}

fn roll_dice(dice: &DiceTerm, rng: &mut StdRng) -> TermResult {
    let faces = i32::try_from(dice.faces).unwrap_or(i32::MAX);
    let rolls: Vec<i32> = (0..dice.count)
        .map(|_| rng.random_range(1..=faces))
        .collect();

    let mut sorted = rolls.clone();
    sorted.sort_unstable();
    let kept: &[i32] = match dice.keep {
        None => &sorted,
        Some(Keep::Highest(n)) => &sorted[sorted.len().saturating_sub(n as usize)..],
        Some(Keep::Lowest(n)) => &sorted[..sorted.len().min(n as usize)],
    };
    TermResult {
        value: kept.iter().sum(),
        rolls,
    }
}

/// Evaluate an initiative roll, substituting the dialog's manual value
/// when it holds a usable number.
pub fn roll_initiative(
    formula: &str,
    manual_input: Option<&str>,
    rng: &mut StdRng,
) -> EngineResult<InitiativeRoll> {
    let formula = RollFormula::parse(formula)?;
    let roll = InitiativeRoll::evaluate(&formula, rng)?;
    match manual_input.and_then(ManualRoll::parse) {
        Some(manual) => roll.with_manual(manual),
        None => Ok(roll),
    }
}
