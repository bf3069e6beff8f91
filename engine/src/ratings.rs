// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::{error::ErrorKind, Engine};
use anyhow::Error;
use catalog::{
    error::ErrorKind as CatalogError, CatalogStore, MovieId, NewRating, RatedMovie, Rating,
    RatingReceipt, Score, Session,
};

pub const RATING_SAVED: &str = "Rating saved";

impl<'a, S: CatalogStore> Engine<'a, S> {
    /// Submit a rating for a movie on behalf of the session's user.
    ///
    /// The rating record is written first, then the score is appended to the
    /// movie and its average recomputed. If the movie update fails the rating
    /// record is removed again so both collections stay in step.
    pub fn rate(&self, session: &Session, movie_id: &str, rating: i64) -> Result<RatingReceipt, Error> {
        let score = Score::new(rating)?;
        let movie_id = MovieId::parse(movie_id)?;
        self.session_user(session)?;

        if self.store.movie(&movie_id)?.is_none() {
            return Err(CatalogError::MovieNotFound(movie_id.to_string()).into());
        }

        let new_rating = self.store.insert_rating(NewRating {
            user_id: session.user.clone(),
            movie_id: movie_id.clone(),
            rating: score,
        })?;

        let movie = match self.store.append_rating(&movie_id, score) {
            Ok(movie) => movie,
            Err(e) => return Err(self.undo_rating(&new_rating, e)),
        };

        log::info!(
            "User({}) rated movie({}) with {}, average is now {:.2}",
            session.user,
            movie_id,
            score,
            movie.average_rating
        );

        Ok(RatingReceipt {
            message: RATING_SAVED.into(),
            new_rating,
            average_rating: movie.average_rating,
        })
    }

    fn undo_rating(&self, rating: &Rating, cause: Error) -> Error {
        log::warn!(
            "Couldn't update movie({}) after storing rating({}): {}",
            rating.movie_id,
            rating.id,
            cause
        );

        match self.store.remove_rating(&rating.id) {
            Ok(()) => cause,
            Err(e) => {
                log::error!("Couldn't remove rating({}): {}", rating.id, e);
                ErrorKind::PartialRatingWrite {
                    rating: rating.id.to_string(),
                    movie: rating.movie_id.to_string(),
                    cause: cause.to_string(),
                }
                .into()
            }
        }
    }

    /// Ratings submitted by the session's user, with the rated movies
    pub fn user_ratings(&self, session: &Session) -> Result<Vec<RatedMovie>, Error> {
        self.session_user(session)?;
        let ratings = self.store.ratings_by(&session.user)?;
        let ids: Vec<_> = ratings.iter().map(|r| r.movie_id.clone()).collect();
        let movies = self.store.movies_with_ids(&ids)?;

        Ok(ratings
            .into_iter()
            .map(|rating| {
                let movie = movies.iter().find(|m| m.id == rating.movie_id).cloned();
                RatedMovie { rating, movie }
            })
            .collect())
    }
}
