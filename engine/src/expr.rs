//! Dice notation: `NdM`, flat constants, `khX`/`klX` keep modifiers, joined by `+`/`-`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::AdMode;

/// Upper bound on the dice a single term may roll.
pub const MAX_DICE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    Highest(u32),
    Lowest(u32),
}

impl Keep {
    pub fn count(self) -> u32 {
        match self {
            Keep::Highest(n) | Keep::Lowest(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceTerm {
    pub count: u32,
    pub faces: u32,
    pub keep: Option<Keep>,
}

impl DiceTerm {
    pub fn new(count: u32, faces: u32) -> Self {
        Self {
            count,
            faces,
            keep: None,
        }
    }

    pub fn keep(mut self, keep: Keep) -> Self {
        self.keep = Some(keep);
        self
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)?;
        match self.keep {
            Some(Keep::Highest(n)) => write!(f, "kh{n}"),
            Some(Keep::Lowest(n)) => write!(f, "kl{n}"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Dice(DiceTerm),
    Constant(u32),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Dice(dice) => dice.fmt(f),
            Term::Constant(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedTerm {
    pub negative: bool,
    pub term: Term,
}

/// A validated dice expression. Construction is the only place parsing can fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpression {
    terms: Vec<SignedTerm>,
}

impl DiceExpression {
    pub fn single(term: DiceTerm) -> Self {
        Self {
            terms: vec![SignedTerm {
                negative: false,
                term: Term::Dice(term),
            }],
        }
    }

    /// `1d20`, `2d20kh1` or `2d20kl1` depending on the advantage mode.
    pub fn d20(mode: AdMode) -> Self {
        let term = match mode {
            AdMode::Normal => DiceTerm::new(1, 20),
            AdMode::Advantage => DiceTerm::new(2, 20).keep(Keep::Highest(1)),
            AdMode::Disadvantage => DiceTerm::new(2, 20).keep(Keep::Lowest(1)),
        };
        Self::single(term)
    }

    pub fn terms(&self) -> &[SignedTerm] {
        &self.terms
    }

    /// Append a flat `+m`/`-m` term; zero leaves the expression untouched.
    pub fn with_modifier(mut self, modifier: i32) -> Self {
        if modifier != 0 {
            self.terms.push(SignedTerm {
                negative: modifier < 0,
                term: Term::Constant(modifier.unsigned_abs()),
            });
        }
        self
    }

    pub fn leading_dice(&self) -> Option<&DiceTerm> {
        self.terms.iter().find_map(|t| match &t.term {
            Term::Dice(dice) => Some(dice),
            Term::Constant(_) => None,
        })
    }

    /// Doubles the count of the first dice term only; constants and later terms are kept.
    pub fn doubled_leading_dice(&self) -> Self {
        let mut doubled = self.clone();
        if let Some(dice) = doubled.terms.iter_mut().find_map(|t| match &mut t.term {
            Term::Dice(dice) => Some(dice),
            Term::Constant(_) => None,
        }) {
            dice.count = dice.count.saturating_mul(2);
        }
        doubled
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, signed) in self.terms.iter().enumerate() {
            if signed.negative {
                f.write_str("-")?;
            } else if i > 0 {
                f.write_str("+")?;
            }
            signed.term.fmt(f)?;
        }
        Ok(())
    }
}

impl FromStr for DiceExpression {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if compact.is_empty() {
            return Err(EngineError::malformed(s, "empty expression"));
        }

        let mut pieces = Vec::new();
        let mut negative = false;
        let mut start = 0;
        for (i, c) in compact.char_indices() {
            if c != '+' && c != '-' {
                continue;
            }
            if i == 0 {
                negative = c == '-';
            } else {
                pieces.push((negative, &compact[start..i]));
                negative = c == '-';
            }
            start = i + 1;
        }
        pieces.push((negative, &compact[start..]));

        let terms = pieces
            .into_iter()
            .map(|(negative, piece)| {
                parse_term(piece)
                    .map(|term| SignedTerm { negative, term })
                    .map_err(|reason| EngineError::malformed(s, reason))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { terms })
    }
}

impl TryFrom<String> for DiceExpression {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceExpression> for String {
    fn from(value: DiceExpression) -> Self {
        value.to_string()
    }
}

fn parse_term(piece: &str) -> Result<Term, String> {
    if piece.is_empty() {
        return Err("missing term around operator".to_string());
    }

    let Some((count, rest)) = piece.split_once('d') else {
        return parse_number(piece, "modifier").map(Term::Constant);
    };

    let count = if count.is_empty() {
        1
    } else {
        parse_number(count, "dice count")?
    };

    let (faces, keep) = if let Some((faces, n)) = rest.split_once("kh") {
        (faces, Some(Keep::Highest(parse_number(n, "keep count")?)))
    } else if let Some((faces, n)) = rest.split_once("kl") {
        (faces, Some(Keep::Lowest(parse_number(n, "keep count")?)))
    } else {
        (rest, None)
    };
    let faces = parse_number(faces, "face count")?;

    if count == 0 {
        return Err("dice count must be at least 1".to_string());
    }
    if count > MAX_DICE {
        return Err(format!("cannot roll more than {MAX_DICE} dice in one term"));
    }
    if faces == 0 {
        return Err("face count must be at least 1".to_string());
    }
    if let Some(keep) = keep {
        if keep.count() > count {
            return Err(format!(
                "cannot keep {} dice when only rolling {count}",
                keep.count()
            ));
        }
    }

    Ok(Term::Dice(DiceTerm { count, faces, keep }))
}

fn parse_number(text: &str, what: &str) -> Result<u32, String> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid {what} `{text}`"));
    }
    text.parse().map_err(|_| format!("{what} `{text}` is too large"))
}
