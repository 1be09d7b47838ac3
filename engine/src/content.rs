use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::api::{parse_roster, RosterFormat};
use crate::character::Roster;

pub fn builtin_rosters() -> HashMap<&'static str, (&'static str, RosterFormat)> {
    HashMap::from([
        (
            "avernus_party",
            (
                include_str!("../content/rosters/avernus_party.json"),
                RosterFormat::Json,
            ),
        ),
        (
            "goblin_warband",
            (
                include_str!("../content/rosters/goblin_warband.yaml"),
                RosterFormat::Yaml,
            ),
        ),
    ])
}

pub fn builtin_roster(id: &str) -> Result<Roster> {
    let rosters = builtin_rosters();
    let (text, format) = rosters
        .get(id)
        .ok_or_else(|| anyhow!("no builtin roster named '{}'", id))?;
    parse_roster(text, *format)
}
