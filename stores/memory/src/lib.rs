// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::{anyhow, Error};
use catalog::{
    error::ErrorKind, CatalogStore, Movie, MovieId, NewMovie, NewRating, Rating, RatingId,
    SearchBy, Score, User, UserId, Watchlist,
};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Collections {
    next_id: u64,
    movies: Vec<Movie>,
    ratings: Vec<Rating>,
    users: Vec<User>,
}

impl Collections {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn movie_mut(&mut self, id: &MovieId) -> Option<&mut Movie> {
        self.movies.iter_mut().find(|movie| &movie.id == id)
    }

    fn user_mut(&mut self, id: &UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|user| &user.id == id)
    }
}

/// Keeps every collection in process memory, in insertion order. All
/// operations run under one lock, so each of them is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(movies: Vec<NewMovie>) -> Result<Self, Error> {
        let store = Self::new();
        for movie in movies {
            store.insert_movie(movie)?;
        }

        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, Error> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl CatalogStore for MemoryStore {
    fn movies(&self) -> Result<Vec<Movie>, Error> {
        Ok(self.lock()?.movies.clone())
    }

    fn movies_by(&self, by: &SearchBy) -> Result<Vec<Movie>, Error> {
        let inner = self.lock()?;

        match by {
            SearchBy::Id(id) => {
                let id = MovieId::parse(id)?;
                let movies: Vec<_> = inner
                    .movies
                    .iter()
                    .filter(|movie| movie.id == id)
                    .cloned()
                    .collect();

                if movies.is_empty() {
                    Err(ErrorKind::MovieNotFound(id.to_string()).into())
                } else {
                    Ok(movies)
                }
            }

            SearchBy::Title(title) => {
                let needle = title.to_lowercase();
                Ok(inner
                    .movies
                    .iter()
                    .filter(|movie| movie.title.to_lowercase().contains(&needle))
                    .cloned()
                    .collect())
            }

            SearchBy::Genre(genre) => Ok(inner
                .movies
                .iter()
                .filter(|movie| movie.genre.contains(genre))
                .cloned()
                .collect()),

            SearchBy::Trending => Ok(inner
                .movies
                .iter()
                .filter(|movie| movie.trending)
                .cloned()
                .collect()),
        }
    }

    fn movies_offset_limit(&self, offset: usize, limit: usize) -> Result<Vec<Movie>, Error> {
        Ok(self
            .lock()?
            .movies
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn movie(&self, id: &MovieId) -> Result<Option<Movie>, Error> {
        Ok(self
            .lock()?
            .movies
            .iter()
            .find(|movie| &movie.id == id)
            .cloned())
    }

    fn movies_with_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>, Error> {
        let inner = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.movies.iter().find(|movie| &movie.id == id))
            .cloned()
            .collect())
    }

    fn insert_movie(&self, movie: NewMovie) -> Result<Movie, Error> {
        let mut inner = self.lock()?;
        if inner
            .movies
            .iter()
            .any(|stored| stored.catalog_id == movie.catalog_id)
        {
            return Err(ErrorKind::DuplicateMovie(movie.catalog_id).into());
        }

        let id = MovieId::from_counter(inner.next_id());
        let movie = Movie::from_new(id, movie);

        log::debug!("Inserting movie {} ({})", movie.id, movie.title);
        inner.movies.push(movie.clone());
        Ok(movie)
    }

    fn append_rating(&self, id: &MovieId, score: Score) -> Result<Movie, Error> {
        let mut inner = self.lock()?;
        let movie = inner
            .movie_mut(id)
            .ok_or_else(|| ErrorKind::MovieNotFound(id.to_string()))?;

        movie.record_rating(score);
        Ok(movie.clone())
    }

    fn insert_rating(&self, rating: NewRating) -> Result<Rating, Error> {
        let mut inner = self.lock()?;
        let id = RatingId::from_counter(inner.next_id());
        let rating = rating.stored_as(id);

        inner.ratings.push(rating.clone());
        Ok(rating)
    }

    fn remove_rating(&self, id: &RatingId) -> Result<(), Error> {
        let mut inner = self.lock()?;
        match inner.ratings.iter().position(|rating| &rating.id == id) {
            Some(index) => {
                inner.ratings.remove(index);
                Ok(())
            }
            None => Err(ErrorKind::RatingNotFound(id.to_string()).into()),
        }
    }

    fn ratings_by(&self, user: &UserId) -> Result<Vec<Rating>, Error> {
        Ok(self
            .lock()?
            .ratings
            .iter()
            .filter(|rating| &rating.user_id == user)
            .cloned()
            .collect())
    }

    fn insert_user(&self, username: &str) -> Result<User, Error> {
        let mut inner = self.lock()?;
        let user = User {
            id: UserId::from_counter(inner.next_id()),
            username: username.to_owned(),
            watchlist: Watchlist::new(),
        };

        inner.users.push(user.clone());
        Ok(user)
    }

    fn user(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self.lock()?.users.iter().find(|user| &user.id == id).cloned())
    }

    fn toggle_watchlist(&self, user: &UserId, movie: &MovieId) -> Result<Watchlist, Error> {
        let mut inner = self.lock()?;
        let user = inner
            .user_mut(user)
            .ok_or_else(|| ErrorKind::UserNotFound(user.to_string()))?;

        let membership = user.watchlist.toggle(movie);
        log::debug!("Watchlist of {}: {} {:?}", user.id, movie, membership);
        Ok(user.watchlist.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::*;
    use catalog::error::{class_of, ErrorClass};
    use catalog::Genres;
    use std::sync::Arc;
    use std::thread;

    fn new_movie(title: &str, genre: &str, trending: bool) -> NewMovie {
        NewMovie {
            catalog_id: format!("tt-{}", title),
            title: title.into(),
            genre: Genres::parse(genre),
            year: 2000,
            description: String::new(),
            image_url: String::new(),
            platform_url: String::new(),
            trending,
            imdb_rating: 0.,
            director: "Someone".into(),
            cast: vec![],
        }
    }

    fn sample_store() -> Result<MemoryStore, Error> {
        MemoryStore::with_movies(vec![
            new_movie("Inception", "Sci-Fi, Action", true),
            new_movie("The Dark Knight", "Action", true),
            new_movie("The Shawshank Redemption", "Drama", false),
        ])
    }

    #[test]
    fn query_movies_by() -> Result<(), Error> {
        let store = sample_store()?;

        let found = store.movies_by(&SearchBy::title("dark"))?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "The Dark Knight");

        let found = store.movies_by(&SearchBy::genre("action"))?;
        assert_eq!(found.len(), 2);

        let found = store.movies_by(&SearchBy::Trending)?;
        assert_eq!(found.len(), 2);

        let id = found[0].id.to_string();
        let found = store.movies_by(&SearchBy::id(&id))?;
        assert_eq!(found[0].title, "Inception");

        let missing = MovieId::from_counter(999).to_string();
        assert!(store.movies_by(&SearchBy::id(&missing)).is_err());

        Ok(())
    }

    #[test]
    fn pages_and_chunks() -> Result<(), Error> {
        let store = sample_store()?;

        let page = store.movies_offset_limit(1, 5)?;
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title, "The Dark Knight");

        let chunks: Vec<_> = store.movies_by_chunks(2).collect::<Result<_, _>>()?;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 2);
        assert_eq!(chunks[1].len(), 1);

        Ok(())
    }

    #[test]
    fn movies_with_ids_keeps_order() -> Result<(), Error> {
        let store = sample_store()?;
        let all = store.movies()?;

        let ids = vec![all[2].id.clone(), MovieId::from_counter(999), all[0].id.clone()];
        let found = store.movies_with_ids(&ids)?;
        let titles: Vec<_> = found.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["The Shawshank Redemption", "Inception"]);

        Ok(())
    }

    #[test]
    fn append_rating_updates_average() -> Result<(), Error> {
        let store = sample_store()?;
        let id = store.movies()?[0].id.clone();

        store.append_rating(&id, Score::new(4)?)?;
        let movie = store.append_rating(&id, Score::new(5)?)?;
        assert_approx_eq!(movie.average_rating, 4.5);

        let stored = store.movie(&id)?.unwrap();
        assert_eq!(stored.ratings.len(), 2);
        assert_approx_eq!(stored.average_rating, 4.5);

        assert!(store
            .append_rating(&MovieId::from_counter(999), Score::new(3)?)
            .is_err());

        Ok(())
    }

    #[test]
    fn ratings_records() -> Result<(), Error> {
        let store = sample_store()?;
        let user = store.insert_user("ana")?;
        let movie = store.movies()?[0].id.clone();

        let rating = store.insert_rating(NewRating {
            user_id: user.id.clone(),
            movie_id: movie,
            rating: Score::new(2)?,
        })?;

        assert_eq!(store.ratings_by(&user.id)?, vec![rating.clone()]);

        store.remove_rating(&rating.id)?;
        assert!(store.ratings_by(&user.id)?.is_empty());
        assert!(store.remove_rating(&rating.id).is_err());

        Ok(())
    }

    #[test]
    fn toggle_watchlist_membership() -> Result<(), Error> {
        let store = sample_store()?;
        let user = store.insert_user("ana")?;
        let movie = store.movies()?[1].id.clone();

        let watchlist = store.toggle_watchlist(&user.id, &movie)?;
        assert!(watchlist.contains(&movie));

        let watchlist = store.toggle_watchlist(&user.id, &movie)?;
        assert!(watchlist.is_empty());

        assert!(store
            .toggle_watchlist(&UserId::from_counter(999), &movie)
            .is_err());

        Ok(())
    }

    #[test]
    fn catalog_ids_are_unique() -> Result<(), Error> {
        let store = sample_store()?;

        let err = store
            .insert_movie(new_movie("Inception", "Drama", false))
            .unwrap_err();
        assert_eq!(class_of(&err), ErrorClass::Validation);
        assert_eq!(store.movies()?.len(), 3);

        let twice = vec![new_movie("Heat", "Crime", false), new_movie("Heat", "Crime", false)];
        assert!(MemoryStore::with_movies(twice).is_err());

        Ok(())
    }

    #[test]
    fn concurrent_ratings_are_all_kept() -> Result<(), Error> {
        let store = Arc::new(sample_store()?);
        let id = store.movies()?[0].id.clone();

        let handles: Vec<_> = (0..16_i64)
            .map(|i| {
                let store = Arc::clone(&store);
                let id = id.clone();
                thread::spawn(move || -> Result<(), Error> {
                    store.append_rating(&id, Score::new(i % 5 + 1)?)?;
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            handle.join().map_err(|_| anyhow!("rating thread panicked"))??;
        }

        let movie = store.movie(&id)?.unwrap();
        let expected = (0..16).map(|i| (i % 5 + 1) as f64).sum::<f64>() / 16.;
        assert_eq!(movie.ratings.len(), 16);
        assert_approx_eq!(movie.average_rating, expected);

        Ok(())
    }

    #[test]
    fn concurrent_toggles_are_all_kept() -> Result<(), Error> {
        let store = Arc::new(MemoryStore::with_movies(
            (0..12)
                .map(|i| new_movie(&format!("Movie {}", i), "Drama", false))
                .collect(),
        )?);
        let user = store.insert_user("ana")?.id;
        let movies: Vec<_> = store.movies()?.into_iter().map(|m| m.id).collect();

        let handles: Vec<_> = movies
            .iter()
            .cloned()
            .map(|movie| {
                let store = Arc::clone(&store);
                let user = user.clone();
                thread::spawn(move || store.toggle_watchlist(&user, &movie).map(|_| ()))
            })
            .collect();

        for handle in handles {
            handle.join().map_err(|_| anyhow!("toggle thread panicked"))??;
        }

        let watchlist = store.user(&user)?.unwrap().watchlist;
        assert_eq!(watchlist.len(), movies.len());
        assert!(movies.iter().all(|movie| watchlist.contains(movie)));

        Ok(())
    }
}
