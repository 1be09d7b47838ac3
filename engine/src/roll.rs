use std::fmt;

use serde::Serialize;

use crate::error::EngineError;
use crate::expr::{DiceExpression, DiceTerm, Keep, Term};
use crate::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DieOutcome {
    pub value: u32,
    pub kept: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TermOutcome {
    Dice { faces: u32, dice: Vec<DieOutcome> },
    Constant { value: u32 },
}

impl TermOutcome {
    fn subtotal(&self) -> i64 {
        match self {
            TermOutcome::Dice { dice, .. } => dice
                .iter()
                .filter(|d| d.kept)
                .map(|d| i64::from(d.value))
                .sum(),
            TermOutcome::Constant { value } => i64::from(*value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermRoll {
    pub negative: bool,
    pub outcome: TermOutcome,
}

/// One evaluation of a [`DiceExpression`]. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollResult {
    expression: DiceExpression,
    terms: Vec<TermRoll>,
    total: i64,
}

impl RollResult {
    pub fn expression(&self) -> &DiceExpression {
        &self.expression
    }

    pub fn terms(&self) -> &[TermRoll] {
        &self.terms
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// Every die rolled, kept or dropped, in roll order.
    pub fn dice(&self) -> impl Iterator<Item = &DieOutcome> + '_ {
        self.terms
            .iter()
            .filter_map(|t| match &t.outcome {
                TermOutcome::Dice { dice, .. } => Some(dice),
                TermOutcome::Constant { .. } => None,
            })
            .flatten()
    }

    pub fn kept_values(&self) -> Vec<u32> {
        self.dice().filter(|d| d.kept).map(|d| d.value).collect()
    }

    fn primary(&self) -> Option<(u32, u32)> {
        self.terms.iter().find_map(|t| match &t.outcome {
            TermOutcome::Dice { faces, dice } => {
                dice.iter().find(|d| d.kept).map(|d| (d.value, *faces))
            }
            TermOutcome::Constant { .. } => None,
        })
    }

    /// The natural value of the primary die: first kept die of the first dice term.
    pub fn natural(&self) -> Option<u32> {
        self.primary().map(|(value, _)| value)
    }

    pub fn natural_is_max(&self) -> bool {
        self.primary().is_some_and(|(value, faces)| value == faces)
    }

    pub fn natural_is_one(&self) -> bool {
        self.natural() == Some(1)
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ", self.expression)?;
        for (i, term) in self.terms.iter().enumerate() {
            match (i, term.negative) {
                (0, true) => f.write_str("-")?,
                (0, false) => {}
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }
            match &term.outcome {
                TermOutcome::Dice { dice, .. } => {
                    let shown = dice
                        .iter()
                        .map(|d| {
                            if d.kept {
                                d.value.to_string()
                            } else {
                                format!("({})", d.value)
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "[{shown}]")?;
                }
                TermOutcome::Constant { value } => write!(f, "{value}")?,
            }
        }
        write!(f, " = {}", self.total)
    }
}

impl Dice {
    pub fn roll(&mut self, expression: &DiceExpression) -> RollResult {
        let terms: Vec<TermRoll> = expression
            .terms()
            .iter()
            .map(|signed| TermRoll {
                negative: signed.negative,
                outcome: match signed.term {
                    Term::Dice(dice) => self.roll_term(dice),
                    Term::Constant(value) => TermOutcome::Constant { value },
                },
            })
            .collect();

        let total = terms
            .iter()
            .map(|t| {
                let subtotal = t.outcome.subtotal();
                if t.negative { -subtotal } else { subtotal }
            })
            .sum();

        RollResult {
            expression: expression.clone(),
            terms,
            total,
        }
    }

    /// Parse `notation` and roll it. Nothing is drawn from the source when parsing fails.
    pub fn evaluate(&mut self, notation: &str) -> Result<RollResult, EngineError> {
        let expression: DiceExpression = notation.parse()?;
        Ok(self.roll(&expression))
    }

    fn roll_term(&mut self, term: DiceTerm) -> TermOutcome {
        let values: Vec<u32> = (0..term.count).map(|_| self.die(term.faces)).collect();
        let kept = mark_kept(&values, term.keep);
        TermOutcome::Dice {
            faces: term.faces,
            dice: values
                .into_iter()
                .zip(kept)
                .map(|(value, kept)| DieOutcome { value, kept })
                .collect(),
        }
    }
}

/// Stable selection: among equal values the earlier die wins.
fn mark_kept(values: &[u32], keep: Option<Keep>) -> Vec<bool> {
    let Some(keep) = keep else {
        return vec![true; values.len()];
    };
    let mut order: Vec<usize> = (0..values.len()).collect();
    match keep {
        Keep::Highest(_) => order.sort_by(|&a, &b| values[b].cmp(&values[a])),
        Keep::Lowest(_) => order.sort_by_key(|&i| values[i]),
    }
    let mut kept = vec![false; values.len()];
    for &i in order.iter().take(keep.count() as usize) {
        kept[i] = true;
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_highest_ties_prefer_the_earlier_die() {
        assert_eq!(mark_kept(&[5, 5], Some(Keep::Highest(1))), vec![true, false]);
        assert_eq!(mark_kept(&[3, 1, 1], Some(Keep::Lowest(1))), vec![false, true, false]);
    }

    #[test]
    fn display_marks_dropped_dice() {
        let mut dice = Dice::from_scripted(vec![15, 3]);
        let roll = dice.evaluate("2d20kh1+5").unwrap();
        assert_eq!(roll.to_string(), "2d20kh1+5 = [15, (3)] + 5 = 20");
    }

    #[test]
    fn negative_terms_subtract() {
        let mut dice = Dice::from_scripted(vec![4]);
        let roll = dice.evaluate("-2+1d6").unwrap();
        assert_eq!(roll.total(), 2);
        assert_eq!(roll.to_string(), "-2+1d6 = -2 + [4] = 2");
    }
}
