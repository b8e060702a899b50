//! Physical-die override for initiative rolls.
//!
//! Players who roll a real d20 type the raw die face into the roll dialog.
//! The value replaces the initiative die of the evaluated roll (see
//! [`RollFormula::initiative_die`]) and is written into the displayed
//! formula over that same term's text.

use serde::Serialize;

use super::{InitiativeRoll, RollFormula, TermResult};
use crate::error::EngineResult;

/// A raw die result typed in by the player, without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ManualRoll(i32);

impl ManualRoll {
    /// Parse the dialog field. Blank, non-integer and zero input yield
    /// `None`, in which case the random roll stands.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().parse::<i32>() {
            Ok(0) | Err(_) => None,
            Ok(value) => Some(Self(value)),
        }
    }

    /// The raw value.
    pub fn value(self) -> i32 {
        self.0
    }
}

/// Write `value` over term `index` of the formula and tidy the signs.
fn rewrite_formula(formula: &RollFormula, index: usize, value: i32) -> String {
    let mut out = formula.source.clone();
    if let Some(span) = formula.spans.get(index) {
        out.replace_range(span.clone(), &value.to_string());
    }
    out.replace("+ -", "- ")
}

impl InitiativeRoll {
    /// Replace the initiative die with a manual value.
    ///
    /// Formulas without a dice term are returned unchanged. Fails when the
    /// new total does not fit an `i32`.
    pub fn with_manual(mut self, manual: ManualRoll) -> EngineResult<Self> {
        let Some(index) = self.formula.initiative_die() else {
            return Ok(self);
        };
        self.results[index] = TermResult {
            rolls: vec![manual.value()],
            value: manual.value(),
        };
        self.total = self.signed_sum()?;
        self.display = rewrite_formula(&self.formula, index, manual.value());
        self.manual = Some(manual);
        tracing::debug!(
            manual = manual.value(),
            formula = %self.display,
            "manual initiative roll applied"
        );
        Ok(self)
    }
}
