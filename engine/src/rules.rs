use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::DiceExpression;
use crate::roll::RollResult;

/// The two supported tabletop rule systems. Chosen once per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleSystem {
    /// Fifth-edition style: natural max doubles the first damage dice term.
    #[serde(rename = "modern", alias = "dnd5", alias = "5e")]
    Modern,
    /// 3.5-edition style: threat range, confirmation roll, damage multiplier, power attack.
    #[serde(rename = "legacy", alias = "dnd3.5", alias = "3.5e")]
    Legacy,
}

/// How the primary die of a to-hit roll was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToHitClass {
    Regular,
    /// A critical hit (Modern) or a critical threat (Legacy).
    Critical,
    Fumble,
}

impl RuleSystem {
    pub fn classify_to_hit(self, to_hit: &RollResult, crit_range: u32) -> ToHitClass {
        if to_hit.natural_is_one() {
            return ToHitClass::Fumble;
        }
        let critical = match self {
            RuleSystem::Modern => to_hit.natural_is_max(),
            RuleSystem::Legacy => to_hit.natural().is_some_and(|n| n >= crit_range),
        };
        if critical {
            ToHitClass::Critical
        } else {
            ToHitClass::Regular
        }
    }

    pub fn requires_confirmation(self, class: ToHitClass) -> bool {
        self == RuleSystem::Legacy && class != ToHitClass::Regular
    }

    /// The damage expression to roll for this to-hit class.
    pub fn apply_critical_damage(self, damage: &DiceExpression, class: ToHitClass) -> DiceExpression {
        match (self, class) {
            (RuleSystem::Modern, ToHitClass::Critical) => damage.doubled_leading_dice(),
            _ => damage.clone(),
        }
    }

    /// Legacy critical total derived from the normal damage roll.
    pub fn critical_total(self, damage_total: i64, multiplier: u32, class: ToHitClass) -> Option<i64> {
        match (self, class) {
            (RuleSystem::Legacy, ToHitClass::Critical) => {
                Some(damage_total.saturating_mul(i64::from(multiplier)))
            }
            _ => None,
        }
    }

    pub fn damage_label(self, class: ToHitClass) -> &'static str {
        match (self, class) {
            (RuleSystem::Modern, ToHitClass::Critical) => "Damage (CRIT!)",
            _ => "Damage",
        }
    }

    pub fn supports_power_attack(self) -> bool {
        self == RuleSystem::Legacy
    }
}

impl fmt::Display for RuleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleSystem::Modern => "modern",
            RuleSystem::Legacy => "legacy",
        })
    }
}
