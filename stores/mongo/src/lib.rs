// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod decode;

use anyhow::Error;
use catalog::{
    error::ErrorKind, CatalogStore, Movie, MovieId, NewMovie, NewRating, Rating, RatingId,
    SearchBy, Score, User, UserId, Watchlist,
};
use config::StoreConfig;
use decode::{
    decode_movies, movie_from_doc, object_id, rating_from_doc, user_from_doc, watchlist_from_doc,
};
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind as MongoErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument, UpdateModifications};
use mongodb::sync::{Client, Collection, Database};

pub const MOVIES: &str = "movies";
pub const RATINGS: &str = "ratings";
pub const USERS: &str = "users";

const DUPLICATE_KEY: i32 = 11000;

pub struct MongoStore {
    mongo_db: Database,
}

impl MongoStore {
    pub fn new() -> Result<Self, Error> {
        Self::with_url("mongodb://localhost:27017", "movie-catalog")
    }

    pub fn with_url(mongo_url: &str, mongo_db: &str) -> Result<Self, Error> {
        let client = Client::with_uri_str(mongo_url)?;
        let mongo_db = client.database(mongo_db);

        log::info!("Using MongoDB database '{}'", mongo_db.name());
        let store = Self { mongo_db };
        store.ensure_indexes()?;

        Ok(store)
    }

    /// `movieId` identifies a movie in the catalog, the server keeps it unique
    fn ensure_indexes(&self) -> Result<(), Error> {
        self.mongo_db.run_command(
            doc! {
                "createIndexes": MOVIES,
                "indexes": [ { "key": { "movieId": 1 }, "name": "movieId_1", "unique": true } ],
            },
            None,
        )?;

        Ok(())
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, Error> {
        Self::with_url(&config.mongo_url, &config.mongo_db)
    }

    fn movies_collection(&self) -> Collection {
        self.mongo_db.collection(MOVIES)
    }

    fn ratings_collection(&self) -> Collection {
        self.mongo_db.collection(RATINGS)
    }

    fn users_collection(&self) -> Collection {
        self.mongo_db.collection(USERS)
    }

    fn find_movies(&self, filter: Document, options: FindOptions) -> Result<Vec<Movie>, Error> {
        log::debug!("movies.find({})", filter);
        let cursor = self.movies_collection().find(filter, options)?;

        let mut docs = Vec::new();
        for doc in cursor {
            docs.push(doc?);
        }

        Ok(decode_movies(docs))
    }

    fn find_one_and_update(
        &self,
        collection: Collection,
        id: ObjectId,
        pipeline: Vec<Document>,
    ) -> Result<Option<Document>, Error> {
        let mut options = FindOneAndUpdateOptions::default();
        options.return_document = Some(ReturnDocument::After);

        Ok(collection.find_one_and_update(
            doc! { "_id": id },
            UpdateModifications::Pipeline(pipeline),
            options,
        )?)
    }
}

fn by_insertion() -> FindOptions {
    let mut options = FindOptions::default();
    options.sort = Some(doc! { "_id": 1 });
    options
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        MongoErrorKind::WriteError(WriteFailure::WriteError(failure)) => {
            failure.code == DUPLICATE_KEY
        }
        _ => false,
    }
}

/// Append a score to `ratings` and recompute `averageRating` in the same update
pub fn append_rating_pipeline(score: Score) -> Vec<Document> {
    let value = i64::from(score) as i32;
    vec![
        doc! { "$set": {
            "ratings": { "$concatArrays": [ { "$ifNull": [ "$ratings", [] ] }, [ value ] ] }
        }},
        doc! { "$set": { "averageRating": { "$avg": "$ratings" } } },
    ]
}

/// Remove the movie from `watchlist` if present, append it otherwise
pub fn toggle_pipeline(movie: ObjectId) -> Vec<Document> {
    // $filter drops every occurrence, equal to the first one since the
    // watchlist never holds duplicates
    vec![doc! { "$set": { "watchlist": { "$cond": {
        "if": { "$in": [ movie.clone(), { "$ifNull": [ "$watchlist", [] ] } ] },
        "then": { "$filter": {
            "input": "$watchlist",
            "as": "m",
            "cond": { "$ne": [ "$$m", movie.clone() ] },
        }},
        "else": { "$concatArrays": [ { "$ifNull": [ "$watchlist", [] ] }, [ movie ] ] },
    }}}}]
}

/// Escape a literal so it can be embedded in a `$regex`
pub fn regex_escape(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if "\\^$.|?*+()[]{}/-".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Matches one tag of a comma-joined genre string
pub fn genre_pattern(tag: &str) -> String {
    format!(r"(^|,)\s*{}\s*(,|$)", regex_escape(tag.trim()))
}

impl CatalogStore for MongoStore {
    fn movies(&self) -> Result<Vec<Movie>, Error> {
        self.find_movies(doc! {}, by_insertion())
    }

    fn movies_by(&self, by: &SearchBy) -> Result<Vec<Movie>, Error> {
        let filter = match by {
            SearchBy::Id(id) => {
                let id = MovieId::parse(id)?;
                let movies = self.find_movies(doc! { "_id": object_id(&id)? }, by_insertion())?;

                return if movies.is_empty() {
                    Err(ErrorKind::MovieNotFound(id.to_string()).into())
                } else {
                    Ok(movies)
                };
            }

            SearchBy::Title(title) => doc! {
                "title": { "$regex": regex_escape(title), "$options": "i" }
            },

            SearchBy::Genre(genre) => doc! {
                "genre": { "$regex": genre_pattern(genre), "$options": "i" }
            },

            SearchBy::Trending => doc! { "trending": true },
        };

        self.find_movies(filter, by_insertion())
    }

    fn movies_offset_limit(&self, offset: usize, limit: usize) -> Result<Vec<Movie>, Error> {
        let mut options = by_insertion();
        options.skip = Some(offset as i64);
        options.limit = Some(limit as i64);

        self.find_movies(doc! {}, options)
    }

    fn movie(&self, id: &MovieId) -> Result<Option<Movie>, Error> {
        let doc = self
            .movies_collection()
            .find_one(doc! { "_id": object_id(id)? }, None)?;

        doc.map(|doc| movie_from_doc(&doc)).transpose()
    }

    fn movies_with_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let oids = ids
            .iter()
            .map(|id| object_id(id).map(Bson::ObjectId))
            .collect::<Result<Vec<_>, _>>()?;

        let found = self.find_movies(doc! { "_id": { "$in": oids } }, FindOptions::default())?;

        Ok(ids
            .iter()
            .filter_map(|id| found.iter().find(|movie| &movie.id == id))
            .cloned()
            .collect())
    }

    fn insert_movie(&self, movie: NewMovie) -> Result<Movie, Error> {
        let document = doc! {
            "movieId": movie.catalog_id.as_str(),
            "title": movie.title.as_str(),
            "genre": movie.genre.to_string(),
            "year": movie.year,
            "description": movie.description.as_str(),
            "imageUrl": movie.image_url.as_str(),
            "platformUrl": movie.platform_url.as_str(),
            "trending": movie.trending,
            "ratings": Bson::Array(Vec::new()),
            "averageRating": 0.0,
            "imdbRating": movie.imdb_rating,
            "director": movie.director.as_str(),
            "cast": movie.cast.clone(),
        };

        let result = match self.movies_collection().insert_one(document, None) {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => {
                return Err(ErrorKind::DuplicateMovie(movie.catalog_id).into())
            }
            Err(e) => return Err(e.into()),
        };

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => MovieId::parse(&oid.to_hex())?,
            _ => return Err(ErrorKind::BsonConvert("_id").into()),
        };

        log::info!("Inserted movie {} ({})", id, movie.title);
        Ok(Movie::from_new(id, movie))
    }

    fn append_rating(&self, id: &MovieId, score: Score) -> Result<Movie, Error> {
        let pipeline = append_rating_pipeline(score);

        match self.find_one_and_update(self.movies_collection(), object_id(id)?, pipeline)? {
            Some(doc) => movie_from_doc(&doc),
            None => Err(ErrorKind::MovieNotFound(id.to_string()).into()),
        }
    }

    fn insert_rating(&self, rating: NewRating) -> Result<Rating, Error> {
        let document = doc! {
            "userId": object_id(&rating.user_id)?,
            "movieId": object_id(&rating.movie_id)?,
            "rating": i64::from(rating.rating) as i32,
        };

        let result = self.ratings_collection().insert_one(document, None)?;
        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(rating.stored_as(RatingId::parse(&oid.to_hex())?)),
            _ => Err(ErrorKind::InsertRatingFailed(
                rating.user_id.to_string(),
                rating.movie_id.to_string(),
            )
            .into()),
        }
    }

    fn remove_rating(&self, id: &RatingId) -> Result<(), Error> {
        let result = self
            .ratings_collection()
            .delete_one(doc! { "_id": object_id(id)? }, None)?;

        if result.deleted_count == 0 {
            Err(ErrorKind::RatingNotFound(id.to_string()).into())
        } else {
            Ok(())
        }
    }

    fn ratings_by(&self, user: &UserId) -> Result<Vec<Rating>, Error> {
        let cursor = self
            .ratings_collection()
            .find(doc! { "userId": object_id(user)? }, by_insertion())?;

        let mut ratings = Vec::new();
        for doc in cursor {
            ratings.push(rating_from_doc(&doc?)?);
        }

        Ok(ratings)
    }

    fn insert_user(&self, username: &str) -> Result<User, Error> {
        let result = self.users_collection().insert_one(
            doc! { "username": username, "watchlist": Bson::Array(Vec::new()) },
            None,
        )?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => UserId::parse(&oid.to_hex())?,
            _ => return Err(ErrorKind::BsonConvert("_id").into()),
        };

        Ok(User {
            id,
            username: username.to_owned(),
            watchlist: Watchlist::new(),
        })
    }

    fn user(&self, id: &UserId) -> Result<Option<User>, Error> {
        let doc = self
            .users_collection()
            .find_one(doc! { "_id": object_id(id)? }, None)?;

        doc.map(|doc| user_from_doc(&doc)).transpose()
    }

    fn toggle_watchlist(&self, user: &UserId, movie: &MovieId) -> Result<Watchlist, Error> {
        let pipeline = toggle_pipeline(object_id(movie)?);

        match self.find_one_and_update(self.users_collection(), object_id(user)?, pipeline)? {
            Some(doc) => watchlist_from_doc(&doc),
            None => Err(ErrorKind::UserNotFound(user.to_string()).into()),
        }
    }
}
