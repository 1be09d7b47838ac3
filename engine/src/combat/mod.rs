use serde::{Deserialize, Serialize};

use crate::advantage::Keywords;
use crate::error::EngineError;
use crate::expr::DiceExpression;

pub mod actions;

pub use actions::{resolve_attack, resolve_multiattack};

fn default_crit_range() -> u32 {
    20
}

fn default_crit_multiplier() -> u32 {
    2
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackDefinition {
    pub name: String,
    pub hit_modifier: i32,
    pub damage: DiceExpression,
    /// 0 is a standalone attack; attacks sharing a nonzero id resolve together.
    #[serde(default)]
    pub group: u32,
    #[serde(default)]
    pub keywords: Keywords,
    /// Legacy only.
    #[serde(default = "default_crit_range")]
    pub crit_range: u32,
    /// Legacy only.
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: u32,
}

impl AttackDefinition {
    pub fn new(name: impl Into<String>, hit_modifier: i32, damage: &str) -> Result<Self, EngineError> {
        Ok(Self {
            name: name.into(),
            hit_modifier,
            damage: damage.parse()?,
            group: 0,
            keywords: Keywords::default(),
            crit_range: default_crit_range(),
            crit_multiplier: default_crit_multiplier(),
        })
    }

    pub fn in_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_crit(mut self, range: u32, multiplier: u32) -> Self {
        self.crit_range = range;
        self.crit_multiplier = multiplier;
        self
    }
}

/// Trade of to-hit for flat damage: `-N` to hit, `+N` damage (`+2N` two-handed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerAttack {
    pub penalty: i32,
    pub bonus: i32,
    pub two_handed: bool,
}

impl PowerAttack {
    /// `None` when the trade is zero; negative requests are clamped before this point.
    pub fn new(points: i32, two_handed: bool) -> Option<Self> {
        let penalty = points.max(0);
        if penalty == 0 {
            return None;
        }
        let bonus = if two_handed {
            penalty.saturating_mul(2)
        } else {
            penalty
        };
        Some(Self {
            penalty,
            bonus,
            two_handed,
        })
    }

    pub fn note(&self) -> String {
        let grip = if self.two_handed { " (two-handed)" } else { "" };
        format!(
            "Power Attack: -{} to hit, +{} damage{}",
            self.penalty, self.bonus, grip
        )
    }
}
