use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// What kind of named entity a lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    Check,
    Save,
    Attack,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            EntityKind::Character => "character",
            EntityKind::Check => "check",
            EntityKind::Save => "save",
            EntityKind::Attack => "attack",
        };
        f.write_str(word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("malformed dice expression `{expression}`: {reason}")]
    MalformedExpression { expression: String, reason: String },

    #[error("can't find {kind} \"{name}\"")]
    UnknownEntity { kind: EntityKind, name: String },

    #[error("unknown action \"{0}\"")]
    UnknownAction(String),

    #[error("\"{0}\" is not a switch; switches take a single dash, e.g. -pow 2")]
    MalformedSwitch(String),
}

impl EngineError {
    pub(crate) fn malformed(expression: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(kind: EntityKind, name: &str) -> Self {
        EngineError::UnknownEntity {
            kind,
            name: name.to_string(),
        }
    }
}
