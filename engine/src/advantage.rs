use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AdMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Keyword {
    #[serde(rename = "adv")]
    Adv,
    #[serde(rename = "dis")]
    Dis,
    /// Two-handed grip; doubles the power attack damage bonus.
    #[serde(rename = "2h")]
    TwoHanded,
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "adv" => Ok(Keyword::Adv),
            "dis" => Ok(Keyword::Dis),
            "2h" => Ok(Keyword::TwoHanded),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Keyword::Adv => "adv",
            Keyword::Dis => "dis",
            Keyword::TwoHanded => "2h",
        })
    }
}

/// An immutable keyword set. Repeating a keyword has no extra effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keywords(BTreeSet<Keyword>);

impl Keywords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, keyword: Keyword) -> bool {
        self.0.contains(&keyword)
    }

    pub fn union(&self, other: &Keywords) -> Keywords {
        Keywords(self.0.union(&other.0).copied().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Keyword> for Keywords {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        Keywords(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Keyword; N]> for Keywords {
    fn from(value: [Keyword; N]) -> Self {
        value.into_iter().collect()
    }
}

/// Merge request and entity keywords into one advantage mode.
///
/// Entity defaults always apply. `adv` together with `dis` nets to [`AdMode::Normal`].
pub fn resolve_advantage(request: &Keywords, entity: &Keywords) -> AdMode {
    let merged = request.union(entity);
    match (merged.contains(Keyword::Adv), merged.contains(Keyword::Dis)) {
        (true, false) => AdMode::Advantage,
        (false, true) => AdMode::Disadvantage,
        _ => AdMode::Normal,
    }
}
