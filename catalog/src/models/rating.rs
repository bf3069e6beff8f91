// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use super::{
    ids::{MovieId, RatingId, UserId},
    movie::Movie,
    score::Score,
};
use crate::entity::Entity;
use serde::{Deserialize, Serialize};

/// A stored rating, never modified after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(rename = "_id")]
    pub id: RatingId,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: Score,
}

impl Entity for Rating {
    type Id = RatingId;

    fn get_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn get_data(&self) -> Vec<(String, String)> {
        vec![
            ("user".into(), self.user_id.to_string()),
            ("movie".into(), self.movie_id.to_string()),
            ("rating".into(), self.rating.to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: Score,
}

impl NewRating {
    pub fn stored_as(self, id: RatingId) -> Rating {
        Rating {
            id,
            user_id: self.user_id,
            movie_id: self.movie_id,
            rating: self.rating,
        }
    }
}

/// Response of a successful rating submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingReceipt {
    pub message: String,
    pub new_rating: Rating,
    pub average_rating: f64,
}

impl Entity for RatingReceipt {
    type Id = RatingId;

    fn get_id(&self) -> Self::Id {
        self.new_rating.id.clone()
    }

    fn get_data(&self) -> Vec<(String, String)> {
        let mut data = vec![("message".to_owned(), self.message.clone())];
        data.extend(self.new_rating.get_data());
        data.push(("average".into(), format!("{:.2}", self.average_rating)));
        data
    }
}

/// One of the user's ratings, with the movie details when it still exists
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedMovie {
    #[serde(flatten)]
    pub rating: Rating,
    pub movie: Option<Movie>,
}

impl Entity for RatedMovie {
    type Id = RatingId;

    fn get_id(&self) -> Self::Id {
        self.rating.id.clone()
    }

    fn get_data(&self) -> Vec<(String, String)> {
        let title = self
            .movie
            .as_ref()
            .map(|movie| movie.title.clone())
            .unwrap_or_else(|| "<removed>".into());

        vec![
            ("movie".into(), title),
            ("rating".into(), self.rating.rating.to_string()),
        ]
    }
}
