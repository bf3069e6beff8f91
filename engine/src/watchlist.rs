// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::Engine;
use anyhow::Error;
use catalog::{error::ErrorKind, CatalogStore, Movie, MovieId, Session, Watchlist};

impl<'a, S: CatalogStore> Engine<'a, S> {
    /// Add the movie to the session user's watchlist, or remove it if it is
    /// already there. Returns the updated watchlist.
    pub fn toggle_watchlist(&self, session: &Session, movie_id: &str) -> Result<Watchlist, Error> {
        let movie_id = MovieId::parse(movie_id)?;

        if self.store.movie(&movie_id)?.is_none() {
            return Err(ErrorKind::MovieNotFound(movie_id.to_string()).into());
        }

        let watchlist = self.store.toggle_watchlist(&session.user, &movie_id)?;
        log::info!(
            "Movie({}) {} watchlist of user({})",
            movie_id,
            if watchlist.contains(&movie_id) { "added to" } else { "removed from" },
            session.user
        );

        Ok(watchlist)
    }

    /// The session user's watchlist with movie details. Anonymous callers get
    /// an empty list instead of an error.
    pub fn watchlist(&self, session: Option<&Session>) -> Result<Vec<Movie>, Error> {
        let session = match session {
            Some(session) => session,
            None => {
                log::warn!("Watchlist requested without a session, answering with an empty one");
                return Ok(Vec::new());
            }
        };

        let user = self.session_user(session)?;
        self.store.movies_with_ids(user.watchlist.ids())
    }
}
