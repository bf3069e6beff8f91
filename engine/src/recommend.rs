// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::Engine;
use anyhow::Error;
use catalog::{CatalogStore, Genres, Movie, MovieId, Recommendation, Session};
use std::cmp::Ordering;
use std::collections::HashSet;

pub const SELECT_GENRES_PROMPT: &str = "Please select at least one genre.";
pub const EMPTY_WATCHLIST_PROMPT: &str = "Add movies to your watchlist to get recommendations";

/// What a watchlist is made of: its genres, its cast and the movies themselves.
#[derive(Debug, Default)]
pub struct Profile {
    genres: Genres,
    cast: HashSet<String>,
    seen: HashSet<MovieId>,
}

impl Profile {
    pub fn from_watchlist(movies: &[Movie]) -> Self {
        let mut profile = Self::default();

        for movie in movies {
            profile.genres.extend_from(&movie.genre);
            profile.cast.extend(movie.cast.iter().cloned());
            profile.seen.insert(movie.id.clone());
        }

        profile
    }

    pub fn genres(&self) -> &Genres {
        &self.genres
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// A movie not in the watchlist sharing a genre or a cast member with it
    pub fn matches(&self, movie: &Movie) -> bool {
        if self.seen.contains(&movie.id) {
            return false;
        }

        movie.genre.intersects(&self.genres) || movie.cast.iter().any(|c| self.cast.contains(c))
    }
}

/// Best rated first, ties keep their catalog order
pub fn sort_by_rating(movies: &mut [Movie]) {
    movies.sort_by(|a, b| {
        b.average_rating
            .partial_cmp(&a.average_rating)
            .unwrap_or(Ordering::Equal)
    });
}

impl<'a, S: CatalogStore> Engine<'a, S> {
    /// Catalog movies tagged with any of the selected genres
    pub fn recommend_by_genres<G: AsRef<str>>(&self, selected: &[G]) -> Result<Recommendation, Error> {
        let selected: Genres = selected
            .iter()
            .flat_map(|genre| genre.as_ref().split(','))
            .collect();

        if selected.is_empty() {
            return Ok(Recommendation::prompt(SELECT_GENRES_PROMPT));
        }

        let mut movies = Vec::new();
        self.scan(|movie| {
            if movie.genre.intersects(&selected) {
                movies.push(movie);
            }
        })?;

        sort_by_rating(&mut movies);
        log::debug!("{} movies match genres {}", movies.len(), selected);

        Ok(Recommendation::movies(movies))
    }

    /// Catalog movies related to the given watchlist by genre or cast
    pub fn recommend_by_watchlist(&self, watchlist: &[Movie]) -> Result<Recommendation, Error> {
        let profile = Profile::from_watchlist(watchlist);
        if profile.is_empty() {
            return Ok(Recommendation::prompt(EMPTY_WATCHLIST_PROMPT));
        }

        let mut movies = Vec::new();
        self.scan(|movie| {
            if profile.matches(&movie) {
                movies.push(movie);
            }
        })?;

        sort_by_rating(&mut movies);
        log::debug!(
            "{} movies related to a watchlist of {} movies",
            movies.len(),
            watchlist.len()
        );

        Ok(Recommendation::movies(movies))
    }

    /// Recommendations from the session user's current watchlist
    pub fn recommend_for(&self, session: Option<&Session>) -> Result<Recommendation, Error> {
        let watchlist = self.watchlist(session)?;
        self.recommend_by_watchlist(&watchlist)
    }
}
