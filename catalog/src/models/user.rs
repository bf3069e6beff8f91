// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use super::ids::{MovieId, UserId};
use crate::entity::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Membership {
    Added,
    Removed,
}

/// Ordered sequence of movies a user keeps, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist(Vec<MovieId>);

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invert the membership of `movie`: drop its first occurrence when
    /// present, append it otherwise.
    pub fn toggle(&mut self, movie: &MovieId) -> Membership {
        match self.0.iter().position(|id| id == movie) {
            Some(index) => {
                self.0.remove(index);
                Membership::Removed
            }
            None => {
                self.0.push(movie.clone());
                Membership::Added
            }
        }
    }

    pub fn contains(&self, movie: &MovieId) -> bool {
        self.0.contains(movie)
    }

    pub fn ids(&self) -> &[MovieId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::iter::FromIterator<MovieId> for Watchlist {
    fn from_iter<T: IntoIterator<Item = MovieId>>(iter: T) -> Self {
        let mut ids: Vec<MovieId> = Vec::new();
        for id in iter {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        Self(ids)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub watchlist: Watchlist,
}

impl Entity for User {
    type Id = UserId;

    fn get_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn get_data(&self) -> Vec<(String, String)> {
        vec![
            ("username".into(), self.username.clone()),
            ("watchlist".into(), format!("{} movies", self.watchlist.len())),
        ]
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: UserId,
}

impl Session {
    pub fn new(user: UserId) -> Self {
        Self { user }
    }
}
