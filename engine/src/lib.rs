use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

pub mod advantage;
pub mod api;
pub mod character;
pub mod checks;
pub mod combat;
pub mod content;
pub mod error;
pub mod expr;
pub mod request;
pub mod resolution;
pub mod roll;
pub mod rules;

pub use advantage::{resolve_advantage, Keyword, Keywords};
pub use character::{Character, Roster};
pub use checks::{resolve_check, resolve_initiative, CheckDefinition, InitiativeDefinition};
pub use combat::{resolve_attack, resolve_multiattack, AttackDefinition, PowerAttack};
pub use error::{EngineError, EntityKind};
pub use expr::{DiceExpression, DiceTerm, Keep, Term};
pub use request::{Action, Request, Switches};
pub use resolution::{CriticalDamage, LabeledRoll, ResolutionResult};
pub use roll::{DieOutcome, RollResult, TermOutcome, TermRoll};
pub use rules::{RuleSystem, ToHitClass};

/// Seed the scripted source falls back to once its queue runs dry.
const SCRIPT_FALLBACK_SEED: u64 = 0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

/// The injected random source. One resolution call at a time borrows it mutably.
pub struct Dice {
    rng: ChaCha8Rng,
    script: VecDeque<u32>,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            script: VecDeque::new(),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            script: VecDeque::new(),
        }
    }

    /// Replays `faces` in order, then continues from a fixed seeded stream.
    ///
    /// Each scripted value is clamped to the face range of the die it lands on.
    pub fn from_scripted(faces: Vec<u32>) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(SCRIPT_FALLBACK_SEED),
            script: faces.into(),
        }
    }

    /// Roll one die with `faces` sides. `faces` is at least 1.
    pub(crate) fn die(&mut self, faces: u32) -> u32 {
        match self.script.pop_front() {
            Some(value) => value.clamp(1, faces),
            None => self.rng.gen_range(1..=faces),
        }
    }
}
