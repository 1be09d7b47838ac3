use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::checks::{CheckDefinition, InitiativeDefinition};
use crate::combat::AttackDefinition;
use crate::rules::RuleSystem;

/// Read-only character record, as imported from a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub system: RuleSystem,
    #[serde(default)]
    pub portrait: Option<String>,
    #[serde(default)]
    pub initiative: InitiativeDefinition,
    #[serde(default)]
    pub abilities: Vec<CheckDefinition>,
    #[serde(default)]
    pub saves: Vec<CheckDefinition>,
    #[serde(default)]
    pub skills: Vec<CheckDefinition>,
    #[serde(default)]
    pub attacks: Vec<AttackDefinition>,
}

/// Case-insensitive `startswith`. An empty key matches nothing.
pub(crate) fn matches_prefix(name: &str, key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && name.to_lowercase().starts_with(&key.to_lowercase())
}

fn find_prefixed<'a>(items: &'a [CheckDefinition], key: &str) -> Option<&'a CheckDefinition> {
    items.iter().find(|c| matches_prefix(&c.name, key))
}

impl Character {
    pub fn new(name: impl Into<String>, system: RuleSystem) -> Self {
        Self {
            name: name.into(),
            system,
            portrait: None,
            initiative: InitiativeDefinition::default(),
            abilities: Vec::new(),
            saves: Vec::new(),
            skills: Vec::new(),
            attacks: Vec::new(),
        }
    }

    pub fn ability(&self, key: &str) -> Option<&CheckDefinition> {
        find_prefixed(&self.abilities, key)
    }

    pub fn save(&self, key: &str) -> Option<&CheckDefinition> {
        find_prefixed(&self.saves, key)
    }

    pub fn skill(&self, key: &str) -> Option<&CheckDefinition> {
        find_prefixed(&self.skills, key)
    }

    /// Abilities first, then skills.
    pub fn check(&self, key: &str) -> Option<&CheckDefinition> {
        self.ability(key).or_else(|| self.skill(key))
    }

    /// The first attack matching `key`, expanded to its whole group when it has one.
    ///
    /// Group members come back in stored order regardless of which one matched.
    pub fn attacks_named(&self, key: &str) -> Option<Vec<&AttackDefinition>> {
        let found = self.attacks.iter().find(|a| matches_prefix(&a.name, key))?;
        if found.group == 0 {
            return Some(vec![found]);
        }
        Some(
            self.attacks
                .iter()
                .filter(|a| a.group == found.group)
                .collect(),
        )
    }
}

/// Characters in one channel, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    characters: IndexMap<String, Character>,
}

impl Roster {
    /// Target that fans a request out to every character.
    pub const EVERYONE: &'static str = "*";

    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a character by exact name.
    pub fn insert(&mut self, character: Character) -> Option<Character> {
        self.characters.insert(character.name.clone(), character)
    }

    pub fn remove(&mut self, name: &str) -> Option<Character> {
        self.characters.shift_remove(name)
    }

    pub fn find(&self, key: &str) -> Option<&Character> {
        self.characters.values().find(|c| matches_prefix(&c.name, key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> + '_ {
        self.characters.values()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl FromIterator<Character> for Roster {
    fn from_iter<I: IntoIterator<Item = Character>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for character in iter {
            roster.insert(character);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_match_ignores_case_and_rejects_empty_keys() {
        assert!(matches_prefix("Perception", "perc"));
        assert!(matches_prefix("Perception", " PERC "));
        assert!(!matches_prefix("Perception", "ception"));
        assert!(!matches_prefix("Perception", ""));
    }

    #[test]
    fn roster_keeps_insertion_order_and_replaces_by_name() {
        let mut roster: Roster = ["Zed", "Anna"]
            .into_iter()
            .map(|n| Character::new(n, RuleSystem::Modern))
            .collect();
        assert!(roster.insert(Character::new("Zed", RuleSystem::Legacy)).is_some());
        let names: Vec<_> = roster.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Zed", "Anna"]);
        assert_eq!(roster.find("an").map(|c| c.name.as_str()), Some("Anna"));
        assert_eq!(roster.find("zed").map(|c| c.system), Some(RuleSystem::Legacy));
    }
}
