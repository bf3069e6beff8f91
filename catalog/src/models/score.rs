// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{self, Display};

/// A submitted rating value, always within `[Score::MIN, Score::MAX]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(value: i64) -> Result<Self, ErrorKind> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ErrorKind::RatingOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = ErrorKind;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        score.0 as i64
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0 as f64
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arithmetic mean of the scores, an empty sequence averages to 0.
pub fn mean(scores: &[Score]) -> f64 {
    if scores.is_empty() {
        return 0.;
    }

    let sum: f64 = scores.iter().copied().map(f64::from).sum();
    sum / scores.len() as f64
}
