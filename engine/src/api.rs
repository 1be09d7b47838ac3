use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::character::{Character, Roster};
use crate::checks::{resolve_check, resolve_initiative};
use crate::combat::{resolve_attack, resolve_multiattack};
use crate::error::{EngineError, EntityKind};
use crate::request::{Action, Request};
use crate::resolution::ResolutionResult;
use crate::Dice;

/// A resolved request together with the framing the front end shows around it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Outcome {
    pub character: String,
    pub portrait: Option<String>,
    pub title: String,
    pub result: ResolutionResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Json,
    Yaml,
}

impl RosterFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                RosterFormat::Yaml
            }
            _ => RosterFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
struct RosterFile {
    characters: Vec<Character>,
}

pub fn perform(dice: &mut Dice, character: &Character, request: &Request) -> Result<Outcome, EngineError> {
    info!(character = %character.name, action = %request.action, key = %request.key, "performing request");
    let key = request.key.as_str();
    let name = character.name.as_str();

    let (title, result) = match request.action {
        Action::Check => {
            let check = character
                .check(key)
                .ok_or_else(|| EngineError::unknown(EntityKind::Check, key))?;
            (
                format!("{name} makes a {} check!", check.name),
                resolve_check(dice, check, &request.keywords),
            )
        }
        Action::Save => {
            let save = character
                .save(key)
                .ok_or_else(|| EngineError::unknown(EntityKind::Save, key))?;
            (
                format!("{name} makes a {} save!", save.name),
                resolve_check(dice, save, &request.keywords),
            )
        }
        Action::Initiative => (
            format!("{name} rolls initiative!"),
            resolve_initiative(dice, &character.initiative, &request.keywords),
        ),
        Action::Attack => {
            let attacks = character
                .attacks_named(key)
                .ok_or_else(|| EngineError::unknown(EntityKind::Attack, key))?;
            match attacks.as_slice() {
                [single] => (
                    format!("{name} attacks with a {}!", single.name),
                    resolve_attack(
                        dice,
                        character.system,
                        single,
                        &request.keywords,
                        &request.switches,
                    ),
                ),
                group => {
                    debug!(size = group.len(), "resolving multi-attack group");
                    let result = resolve_multiattack(
                        dice,
                        character.system,
                        group,
                        &request.keywords,
                        &request.switches,
                    )
                    .ok_or_else(|| EngineError::unknown(EntityKind::Attack, key))?;
                    (format!("{name} executes a multi-attack!"), result)
                }
            }
        }
    };

    Ok(Outcome {
        character: character.name.clone(),
        portrait: character.portrait.clone(),
        title,
        result,
    })
}

/// Resolve against one character by name prefix, or every character for `"*"`.
///
/// Each character gets its own result, so one missing entity does not stop the rest.
pub fn perform_targeted(
    dice: &mut Dice,
    roster: &Roster,
    target: &str,
    request: &Request,
) -> Vec<Result<Outcome, EngineError>> {
    if target.trim() == Roster::EVERYONE {
        if roster.is_empty() {
            return vec![Err(EngineError::unknown(EntityKind::Character, target))];
        }
        return roster
            .iter()
            .map(|character| perform(dice, character, request))
            .collect();
    }

    match roster.find(target) {
        Some(character) => vec![perform(dice, character, request)],
        None => vec![Err(EngineError::unknown(EntityKind::Character, target))],
    }
}

pub fn parse_roster(text: &str, format: RosterFormat) -> Result<Roster> {
    let file: RosterFile = match format {
        RosterFormat::Json => serde_json::from_str(text).context("failed to parse roster JSON")?,
        RosterFormat::Yaml => serde_yaml::from_str(text).context("failed to parse roster YAML")?,
    };
    if file.characters.is_empty() {
        bail!("roster has no characters");
    }
    Ok(file.characters.into_iter().collect())
}

pub fn load_roster(path: &Path) -> Result<Roster> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster: {}", path.display()))?;
    parse_roster(&text, RosterFormat::from_path(path))
        .with_context(|| format!("invalid roster: {}", path.display()))
}

/// Serialize characters back into the roster file shape.
pub fn roster_to_json(roster: &Roster, pretty: bool) -> Result<String> {
    #[derive(Serialize)]
    struct RosterOut<'a> {
        characters: Vec<&'a Character>,
    }
    let out = RosterOut {
        characters: roster.iter().collect(),
    };
    let text = if pretty {
        serde_json::to_string_pretty(&out)?
    } else {
        serde_json::to_string(&out)?
    };
    Ok(text)
}
