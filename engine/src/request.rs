//! Request grammar: `<action> <key...> [-switch value]... [keyword]...`

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::advantage::{Keyword, Keywords};
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Check,
    Save,
    Attack,
    Initiative,
}

impl Action {
    const WORDS: [(&'static str, Action); 4] = [
        ("check", Action::Check),
        ("save", Action::Save),
        ("attack", Action::Attack),
        ("initiative", Action::Initiative),
    ];
}

impl FromStr for Action {
    type Err = EngineError;

    /// The typed word may abbreviate the action: `a`, `att` and `attack` all mean attack.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let typed = s.to_ascii_lowercase();
        if typed.is_empty() {
            return Err(EngineError::UnknownAction(s.to_string()));
        }
        Self::WORDS
            .iter()
            .find(|(word, _)| word.starts_with(&typed))
            .map(|&(_, action)| action)
            .ok_or_else(|| EngineError::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = Self::WORDS
            .iter()
            .find(|(_, action)| action == self)
            .map_or("", |(word, _)| *word);
        f.write_str(word)
    }
}

/// `-name value` options in the order given. Unknown names are carried but inert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Switches(IndexMap<String, String>);

impl Switches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `-pow` trade, clamped to `0..=i32::MAX`. A non-integer value counts as 0.
    pub fn power_attack(&self) -> i32 {
        let Some(raw) = self.get("pow") else {
            return 0;
        };
        match raw.parse::<i32>() {
            Ok(n) => n.max(0),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => i32::MAX,
            Err(e) if *e.kind() == IntErrorKind::NegOverflow => 0,
            Err(_) => {
                warn!(value = raw, "ignoring non-integer power attack value");
                0
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    pub action: Action,
    pub key: String,
    pub keywords: Keywords,
    pub switches: Switches,
}

impl Request {
    pub fn new(action: Action, key: impl Into<String>) -> Self {
        Self {
            action,
            key: key.into(),
            keywords: Keywords::default(),
            switches: Switches::default(),
        }
    }

    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_switches(mut self, switches: Switches) -> Self {
        self.switches = switches;
        self
    }

    pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, EngineError> {
        let mut tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        if tokens.is_empty() {
            return Err(EngineError::UnknownAction(String::new()));
        }
        let action: Action = tokens.remove(0).parse()?;

        let mut trailing = Vec::new();
        while let Some(keyword) = tokens.last().and_then(|t| t.parse::<Keyword>().ok()) {
            trailing.push(keyword);
            tokens.pop();
        }

        let mut switches = Switches::new();
        let mut key = Vec::new();
        let mut rest = tokens.into_iter();
        while let Some(token) = rest.next() {
            if token.starts_with("--") {
                return Err(EngineError::MalformedSwitch(token.to_string()));
            }
            match switch_name(token) {
                Some(name) => {
                    let value = rest.next().unwrap_or_default();
                    switches = switches.with(name, value);
                }
                None => key.push(token),
            }
        }

        Ok(Self {
            action,
            key: key.join(" "),
            keywords: trailing.into_iter().collect(),
            switches,
        })
    }
}

impl FromStr for Request {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        Self::parse_tokens(&tokens)
    }
}

/// `-pow` names a switch; `-3` is a number, not a switch.
fn switch_name(token: &str) -> Option<&str> {
    let name = token.strip_prefix('-')?;
    if name.is_empty() || name.parse::<i64>().is_ok() {
        return None;
    }
    Some(name)
}
