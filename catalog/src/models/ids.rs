// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Length of an ObjectId in its hexadecimal form.
pub const OBJECT_ID_LEN: usize = 24;

pub fn is_object_id(s: &str) -> bool {
    s.len() == OBJECT_ID_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

macro_rules! object_id {
    ($name:ident, $what:expr) => {
        #[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(s: &str) -> Result<Self, ErrorKind> {
                let s = s.trim();
                if is_object_id(s) {
                    Ok(Self(s.to_ascii_lowercase()))
                } else {
                    Err(ErrorKind::InvalidId($what, s.to_owned()))
                }
            }

            /// Deterministic id built from a counter, used by in-process stores
            pub fn from_counter(n: u64) -> Self {
                Self(format!("{:024x}", n))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ErrorKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

object_id!(MovieId, "movie");
object_id!(UserId, "user");
object_id!(RatingId, "rating");
