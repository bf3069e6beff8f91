// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod entity;
pub mod error;
pub mod lazy;
pub mod models;
pub mod searchby;
pub mod seed;
pub mod values;

use anyhow::Error;

pub use entity::{Entity, ToTable};
pub use lazy::LazyMovieChunks;
pub use models::*;
pub use searchby::SearchBy;
pub use values::{Field, Type, Value};

pub type Result<T> = std::result::Result<T, Error>;

/// Access to the document collections backing the catalog: movies, ratings
/// and users. Implementations must make `append_rating` and
/// `toggle_watchlist` atomic on the single document they touch.
pub trait CatalogStore {
    /// Get all movies
    fn movies(&self) -> Result<Vec<Movie>>;

    /// Get movies that matched the search criteria
    fn movies_by(&self, by: &SearchBy) -> Result<Vec<Movie>>;

    /// Get a page of movies specified by certain offset and limit
    fn movies_offset_limit(&self, offset: usize, limit: usize) -> Result<Vec<Movie>>;

    /// Build an iterator that returns all movies by chunks
    fn movies_by_chunks(&self, chunk_size: usize) -> LazyMovieChunks<Self>
    where
        Self: Sized,
    {
        LazyMovieChunks {
            curr_offset: 0,
            chunk_size,
            done: false,
            store: self,
        }
    }

    fn movie(&self, id: &MovieId) -> Result<Option<Movie>>;

    /// Get the movies for the given ids in the same order, unknown ids are skipped
    fn movies_with_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>>;

    fn insert_movie(&self, movie: NewMovie) -> Result<Movie>;

    /// Append a score to the movie and recompute its average in one update
    fn append_rating(&self, movie: &MovieId, score: Score) -> Result<Movie>;

    fn insert_rating(&self, rating: NewRating) -> Result<Rating>;

    fn remove_rating(&self, id: &RatingId) -> Result<()>;

    /// Get the ratings submitted by the user, in submission order
    fn ratings_by(&self, user: &UserId) -> Result<Vec<Rating>>;

    fn insert_user(&self, username: &str) -> Result<User>;

    fn user(&self, id: &UserId) -> Result<Option<User>>;

    /// Invert the membership of the movie in the user's watchlist
    fn toggle_watchlist(&self, user: &UserId, movie: &MovieId) -> Result<Watchlist>;
}
