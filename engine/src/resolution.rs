use serde::Serialize;

use crate::roll::RollResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledRoll {
    pub label: String,
    pub roll: RollResult,
}

impl LabeledRoll {
    pub fn new(label: impl Into<String>, roll: RollResult) -> Self {
        Self {
            label: label.into(),
            roll,
        }
    }
}

/// Legacy critical damage: the normal damage total times the weapon multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalDamage {
    pub label: String,
    pub multiplier: u32,
    pub total: i64,
}

/// Everything the presentation layer needs, without re-deriving any dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub primary_roll: RollResult,
    pub secondary_rolls: Vec<LabeledRoll>,
    pub critical_damage: Vec<CriticalDamage>,
    pub is_critical_hit: bool,
    pub is_critical_miss: bool,
    pub narrative: Vec<String>,
}

impl ResolutionResult {
    pub fn new(primary_roll: RollResult) -> Self {
        Self {
            primary_roll,
            secondary_rolls: Vec::new(),
            critical_damage: Vec::new(),
            is_critical_hit: false,
            is_critical_miss: false,
            narrative: Vec::new(),
        }
    }

    pub fn secondary(&self, label: &str) -> Option<&RollResult> {
        self.secondary_rolls
            .iter()
            .find(|r| r.label == label)
            .map(|r| &r.roll)
    }
}
