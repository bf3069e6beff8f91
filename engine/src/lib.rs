// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod error;
pub mod ratings;
pub mod recommend;
pub mod watchlist;

use anyhow::Error;
use catalog::{
    error::ErrorKind, CatalogStore, Genres, Movie, MovieId, NewMovie, SearchBy, Session, User, UserId,
};
use config::EngineConfig;

/// Entry point for every catalog operation, borrows the store it works on.
pub struct Engine<'a, S> {
    store: &'a S,
    chunk_size: Option<usize>,
}

impl<'a, S: CatalogStore> Engine<'a, S> {
    pub fn with_store(store: &'a S) -> Self {
        Self {
            store,
            chunk_size: None,
        }
    }

    pub fn with_config(store: &'a S, config: &EngineConfig) -> Self {
        Self {
            store,
            chunk_size: config.catalog_chunk_size.filter(|&size| size > 0),
        }
    }

    pub fn store(&self) -> &S {
        self.store
    }

    pub fn movies(&self) -> Result<Vec<Movie>, Error> {
        self.store.movies()
    }

    pub fn trending(&self) -> Result<Vec<Movie>, Error> {
        self.store.movies_by(&SearchBy::Trending)
    }

    pub fn movie(&self, id: &str) -> Result<Movie, Error> {
        let id = MovieId::parse(id)?;
        self.store
            .movie(&id)?
            .ok_or_else(|| ErrorKind::MovieNotFound(id.to_string()).into())
    }

    pub fn search(&self, title: &str) -> Result<Vec<Movie>, Error> {
        self.store.movies_by(&SearchBy::title(title.trim()))
    }

    pub fn query(&self, searchby: &SearchBy) -> Result<Vec<Movie>, Error> {
        match searchby {
            SearchBy::Id(id) => Ok(vec![self.movie(id)?]),
            SearchBy::Title(title) => self.search(title),
            SearchBy::Genre(genre) => self.store.movies_by(&SearchBy::genre(genre.trim())),
            SearchBy::Trending => self.trending(),
        }
    }

    /// Every genre tag in the catalog, in order of first appearance
    pub fn genres(&self) -> Result<Genres, Error> {
        let mut genres = Genres::default();
        self.scan(|movie| genres.extend_from(&movie.genre))?;

        Ok(genres)
    }

    pub fn add_movie(&self, movie: NewMovie) -> Result<Movie, Error> {
        let movie = self.store.insert_movie(movie)?;
        log::info!("Added movie {} ({})", movie.id, movie.title);

        Ok(movie)
    }

    pub fn register(&self, username: &str) -> Result<User, Error> {
        let user = self.store.insert_user(username.trim())?;
        log::info!("Registered user {} ({})", user.id, user.username);

        Ok(user)
    }

    /// A session for an existing user
    pub fn login(&self, user_id: &str) -> Result<Session, Error> {
        let id = UserId::parse(user_id)?;
        let user = self
            .store
            .user(&id)?
            .ok_or_else(|| ErrorKind::UserNotFound(id.to_string()))?;

        log::info!("Logged in as {} ({})", user.id, user.username);
        Ok(Session::new(user.id))
    }

    /// The user behind a session, who must still exist
    pub(crate) fn session_user(&self, session: &Session) -> Result<User, Error> {
        self.store
            .user(&session.user)?
            .ok_or_else(|| ErrorKind::UserNotFound(session.user.to_string()).into())
    }

    /// Visit the whole catalog, page by page when a chunk size is configured
    pub(crate) fn scan<F>(&self, mut visit: F) -> Result<(), Error>
    where
        F: FnMut(Movie),
    {
        match self.chunk_size {
            Some(chunk_size) => {
                for chunk in self.store.movies_by_chunks(chunk_size) {
                    let chunk = chunk?;
                    log::debug!("Scanning {} movies", chunk.len());
                    chunk.into_iter().for_each(&mut visit);
                }
            }
            None => self.store.movies()?.into_iter().for_each(visit),
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use catalog::error::{class_of, ErrorClass};

    #[test]
    fn catalog_queries() -> Result<(), Error> {
        let store = store_with(vec![
            new_movie("Inception", "Sci-Fi", &[]),
            NewMovie {
                trending: true,
                ..new_movie("The Dark Knight", "Action, Crime", &[])
            },
            new_movie("Heat", "Crime, Action", &[]),
        ])?;
        let engine = Engine::with_store(&store);

        assert_eq!(engine.movies()?.len(), 3);
        assert_eq!(titles(&engine.trending()?), vec!["The Dark Knight"]);
        assert_eq!(titles(&engine.search(" knight ")?), vec!["The Dark Knight"]);

        let genres: Vec<_> = engine.genres()?.iter().map(String::from).collect();
        assert_eq!(genres, vec!["Sci-Fi", "Action", "Crime"]);

        let id = engine.movies()?[2].id.to_string();
        assert_eq!(engine.movie(&id)?.title, "Heat");

        Ok(())
    }

    #[test]
    fn movie_lookup_errors() -> Result<(), Error> {
        let store = store_with(vec![])?;
        let engine = Engine::with_store(&store);

        let err = engine.movie("not-an-id").unwrap_err();
        assert_eq!(class_of(&err), ErrorClass::Validation);

        let err = engine.movie(MovieId::from_counter(42).as_str()).unwrap_err();
        assert_eq!(class_of(&err), ErrorClass::NotFound);

        Ok(())
    }

    #[test]
    fn query_dispatch() -> Result<(), Error> {
        let store = store_with(vec![
            new_movie("Inception", "Sci-Fi", &[]),
            new_movie("Heat", "Crime, Action", &[]),
        ])?;
        let engine = Engine::with_store(&store);

        let id = engine.movies()?[0].id.to_string();
        assert_eq!(titles(&engine.query(&SearchBy::id(&id))?), vec!["Inception"]);
        assert_eq!(titles(&engine.query(&SearchBy::title("HEA"))?), vec!["Heat"]);
        assert_eq!(titles(&engine.query(&SearchBy::genre(" action "))?), vec!["Heat"]);
        assert!(engine.query(&SearchBy::Trending)?.is_empty());

        Ok(())
    }

    #[test]
    fn login_requires_registered_user() -> Result<(), Error> {
        let store = store_with(vec![])?;
        let engine = Engine::with_store(&store);

        let user = engine.register(" ana ")?;
        assert_eq!(user.username, "ana");

        let session = engine.login(user.id.as_str())?;
        assert_eq!(session.user, user.id);

        let err = engine.login(UserId::from_counter(99).as_str()).unwrap_err();
        assert_eq!(class_of(&err), ErrorClass::NotFound);

        let err = engine.login("ana").unwrap_err();
        assert_eq!(class_of(&err), ErrorClass::Validation);

        Ok(())
    }

    #[test]
    fn chunked_scan_visits_everything() -> Result<(), Error> {
        let movies = (0..7)
            .map(|i| new_movie(&format!("Movie {}", i), "Drama", &[]))
            .collect();
        let store = store_with(movies)?;

        let config = EngineConfig {
            catalog_chunk_size: Some(3),
        };
        let engine = Engine::with_config(&store, &config);

        let mut seen = Vec::new();
        engine.scan(|movie| seen.push(movie.title))?;
        assert_eq!(seen.len(), 7);
        assert_eq!(seen[6], "Movie 6");

        Ok(())
    }
}
