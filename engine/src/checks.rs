use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advantage::{resolve_advantage, Keywords};
use crate::expr::DiceExpression;
use crate::resolution::ResolutionResult;
use crate::Dice;

/// An ability, skill or saving throw with its flat modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefinition {
    pub name: String,
    pub modifier: i32,
    /// Entity-level defaults, e.g. a skill always rolled with advantage.
    #[serde(default)]
    pub keywords: Keywords,
}

impl CheckDefinition {
    pub fn new(name: impl Into<String>, modifier: i32) -> Self {
        Self {
            name: name.into(),
            modifier,
            keywords: Keywords::default(),
        }
    }

    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeDefinition {
    #[serde(default)]
    pub modifier: i32,
    #[serde(default)]
    pub keywords: Keywords,
}

/// Roll a check or save: d20 (per advantage) plus the flat modifier.
pub fn resolve_check(dice: &mut Dice, check: &CheckDefinition, request: &Keywords) -> ResolutionResult {
    resolve_d20(dice, &check.name, check.modifier, request, &check.keywords)
}

pub fn resolve_initiative(
    dice: &mut Dice,
    initiative: &InitiativeDefinition,
    request: &Keywords,
) -> ResolutionResult {
    resolve_d20(dice, "Initiative", initiative.modifier, request, &initiative.keywords)
}

fn resolve_d20(
    dice: &mut Dice,
    label: &str,
    modifier: i32,
    request: &Keywords,
    entity: &Keywords,
) -> ResolutionResult {
    let mode = resolve_advantage(request, entity);
    let expression = DiceExpression::d20(mode).with_modifier(modifier);
    let roll = dice.roll(&expression);
    debug!(label, ?mode, natural = ?roll.natural(), total = roll.total(), "resolved d20 roll");

    let mut result = ResolutionResult::new(roll);
    // Marker only; the numeric total is unaffected.
    result.is_critical_hit = result.primary_roll.natural() == Some(20);
    result.is_critical_miss = result.primary_roll.natural_is_one();
    result.narrative.push(format!("{label}: {}", result.primary_roll));
    result
}
