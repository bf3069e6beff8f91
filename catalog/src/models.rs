// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod genres;
pub mod ids;
pub mod movie;
pub mod rating;
pub mod score;
pub mod user;

pub use genres::Genres;
pub use ids::{MovieId, RatingId, UserId};
pub use movie::{Movie, NewMovie};
pub use rating::{NewRating, RatedMovie, Rating, RatingReceipt};
pub use score::Score;
pub use user::{Membership, Session, User, Watchlist};

use serde::Serialize;

/// Outcome of a recommendation request, `prompt` is set when there is
/// nothing to recommend yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recommendation {
    pub movies: Vec<Movie>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl Recommendation {
    pub fn prompt(msg: &str) -> Self {
        Self {
            movies: Vec::new(),
            prompt: Some(msg.into()),
        }
    }

    pub fn movies(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            prompt: None,
        }
    }
}
