// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Display};

const SEPARATOR: char = ',';

/// Ordered, duplicate-free set of genre tags.
///
/// Documents carry the genre either as a single tag (`"Drama"`) or as a
/// comma-joined list (`"Sci-Fi, Action"`); both are parsed into tags here so
/// no other component has to split strings. Tags compare ASCII
/// case-insensitively, the first spelling seen is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Genres(Vec<String>);

impl Genres {
    pub fn parse(raw: &str) -> Self {
        raw.split(SEPARATOR).collect()
    }

    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.0.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn intersects(&self, other: &Genres) -> bool {
        self.0.iter().any(|t| other.contains(t))
    }

    /// Add a tag, returns false if it was already present or empty
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }

        self.0.push(tag.to_owned());
        true
    }

    pub fn extend_from(&mut self, other: &Genres) {
        for tag in other.iter() {
            self.insert(tag);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> std::iter::FromIterator<S> for Genres {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut genres = Self::default();
        for tag in iter {
            genres.insert(tag.as_ref());
        }

        genres
    }
}

impl Display for Genres {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl Serialize for Genres {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct GenresVisitor;

impl<'de> Visitor<'de> for GenresVisitor {
    type Value = Genres;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a genre string or a list of genre strings")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Genres::parse(v))
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut genres = Genres::default();
        while let Some(tag) = seq.next_element::<String>()? {
            genres.extend_from(&Genres::parse(&tag));
        }

        Ok(genres)
    }
}

impl<'de> Deserialize<'de> for Genres {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(GenresVisitor)
    }
}
