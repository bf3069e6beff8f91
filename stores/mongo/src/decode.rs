// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

//! Conversions between stored documents and catalog models. Numbers may come
//! back as doubles or integers depending on who wrote the document.

use anyhow::Error;
use catalog::{
    error::ErrorKind, Genres, Movie, MovieId, Rating, RatingId, Score, User, UserId, Watchlist,
};
use mongodb::bson::{oid::ObjectId, Bson, Document};

pub fn object_id(id: &impl AsRef<str>) -> Result<ObjectId, Error> {
    Ok(ObjectId::with_string(id.as_ref())?)
}

fn number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

fn hex_id(doc: &Document, key: &'static str) -> Result<String, Error> {
    match doc.get(key) {
        Some(Bson::ObjectId(oid)) => Ok(oid.to_hex()),
        Some(Bson::String(s)) => Ok(s.clone()),
        _ => Err(ErrorKind::BsonConvert(key).into()),
    }
}

fn string(doc: &Document, key: &'static str) -> Result<String, Error> {
    match doc.get(key) {
        Some(Bson::String(s)) => Ok(s.clone()),
        Some(_) => Err(ErrorKind::BsonConvert(key).into()),
        None => Err(ErrorKind::MissingField(key).into()),
    }
}

fn optional_number(doc: &Document, key: &'static str) -> Result<f64, Error> {
    match doc.get(key) {
        None | Some(Bson::Null) => Ok(0.),
        Some(value) => number(value).ok_or_else(|| ErrorKind::BsonConvert(key).into()),
    }
}

fn strings(doc: &Document, key: &'static str) -> Result<Vec<String>, Error> {
    match doc.get(key) {
        None | Some(Bson::Null) => Ok(Vec::new()),
        Some(Bson::Array(values)) => values
            .iter()
            .map(|value| -> Result<String, Error> {
                match value {
                    Bson::String(s) => Ok(s.clone()),
                    _ => Err(ErrorKind::BsonConvert(key).into()),
                }
            })
            .collect(),
        Some(_) => Err(ErrorKind::BsonConvert(key).into()),
    }
}

fn genres(doc: &Document) -> Result<Genres, Error> {
    match doc.get("genre") {
        Some(Bson::String(s)) => Ok(Genres::parse(s)),
        Some(Bson::Array(_)) => {
            let tags = strings(doc, "genre")?;
            Ok(tags.iter().flat_map(|tag| tag.split(',')).collect())
        }
        Some(_) => Err(ErrorKind::BsonConvert("genre").into()),
        None => Err(ErrorKind::MissingField("genre").into()),
    }
}

/// Scores are stored as whole numbers, a fractional one is a broken document
fn score(value: &Bson, key: &'static str) -> Result<Score, Error> {
    let value = number(value).ok_or(ErrorKind::BsonConvert(key))?;
    if value.fract() != 0. {
        return Err(ErrorKind::BsonConvert(key).into());
    }

    Ok(Score::new(value as i64)?)
}

pub fn movie_from_doc(doc: &Document) -> Result<Movie, Error> {
    let ratings = match doc.get("ratings") {
        None | Some(Bson::Null) => Vec::new(),
        Some(Bson::Array(values)) => values
            .iter()
            .map(|value| score(value, "ratings"))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(ErrorKind::BsonConvert("ratings").into()),
    };

    let year = doc
        .get("year")
        .and_then(number)
        .ok_or(ErrorKind::BsonConvert("year"))?;

    Ok(Movie {
        id: MovieId::parse(&hex_id(doc, "_id")?)?,
        catalog_id: string(doc, "movieId")?,
        title: string(doc, "title")?,
        genre: genres(doc)?,
        year: year as i32,
        description: string(doc, "description")?,
        image_url: string(doc, "imageUrl")?,
        platform_url: string(doc, "platformUrl")?,
        trending: doc.get_bool("trending").unwrap_or(false),
        ratings,
        average_rating: optional_number(doc, "averageRating")?,
        imdb_rating: optional_number(doc, "imdbRating")?,
        director: string(doc, "director")?,
        cast: strings(doc, "cast")?,
    })
}

/// Decode a batch of movie documents, the ones that don't decode are logged
/// and left out
pub fn decode_movies<I>(docs: I) -> Vec<Movie>
where
    I: IntoIterator<Item = Document>,
{
    docs.into_iter()
        .filter_map(|doc| match movie_from_doc(&doc) {
            Ok(movie) => Some(movie),
            Err(e) => {
                log::warn!("Skipping movie document {:?}: {}", doc.get("_id"), e);
                None
            }
        })
        .collect()
}

pub fn rating_from_doc(doc: &Document) -> Result<Rating, Error> {
    let rating = doc
        .get("rating")
        .ok_or(ErrorKind::MissingField("rating"))?;

    Ok(Rating {
        id: RatingId::parse(&hex_id(doc, "_id")?)?,
        user_id: UserId::parse(&hex_id(doc, "userId")?)?,
        movie_id: MovieId::parse(&hex_id(doc, "movieId")?)?,
        rating: score(rating, "rating")?,
    })
}

pub fn watchlist_from_doc(doc: &Document) -> Result<Watchlist, Error> {
    match doc.get("watchlist") {
        None | Some(Bson::Null) => Ok(Watchlist::new()),
        Some(Bson::Array(values)) => values
            .iter()
            .map(|value| -> Result<MovieId, Error> {
                match value {
                    Bson::ObjectId(oid) => Ok(MovieId::parse(&oid.to_hex())?),
                    Bson::String(s) => Ok(MovieId::parse(s)?),
                    _ => Err(ErrorKind::BsonConvert("watchlist").into()),
                }
            })
            .collect(),
        Some(_) => Err(ErrorKind::BsonConvert("watchlist").into()),
    }
}

pub fn user_from_doc(doc: &Document) -> Result<User, Error> {
    Ok(User {
        id: UserId::parse(&hex_id(doc, "_id")?)?,
        username: string(doc, "username").unwrap_or_default(),
        watchlist: watchlist_from_doc(doc)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::*;
    use mongodb::bson::doc;

    const MOVIE: &str = "5f8d0d55b54764421b7156c9";
    const USER: &str = "5f8d0d55b54764421b7156ca";

    fn movie_doc() -> Result<Document, Error> {
        Ok(doc! {
            "_id": object_id(&MOVIE)?,
            "movieId": "tt1375666",
            "title": "Inception",
            "genre": "Sci-Fi, Action",
            "year": 2010.0,
            "description": "Dreams",
            "imageUrl": "https://example.com/i.jpg",
            "platformUrl": "https://example.com/w",
            "trending": true,
            "ratings": [4, 5.0, 3_i64],
            "averageRating": 4,
            "imdbRating": 8.8,
            "director": "Christopher Nolan",
            "cast": ["Leonardo DiCaprio", "Elliot Page"],
        })
    }

    #[test]
    fn decode_movie() -> Result<(), Error> {
        let movie = movie_from_doc(&movie_doc()?)?;

        assert_eq!(movie.id.as_str(), MOVIE);
        assert_eq!(movie.year, 2010);
        assert!(movie.genre.contains("action"));
        assert_eq!(movie.ratings.len(), 3);
        assert_approx_eq!(movie.average_rating, 4.);
        assert_eq!(movie.cast.len(), 2);

        Ok(())
    }

    #[test]
    fn decode_movie_with_defaults() -> Result<(), Error> {
        let mut doc = movie_doc()?;
        doc.remove("ratings");
        doc.remove("averageRating");
        doc.remove("trending");

        let movie = movie_from_doc(&doc)?;
        assert!(movie.ratings.is_empty());
        assert!(!movie.trending);
        assert_approx_eq!(movie.average_rating, 0.);

        Ok(())
    }

    #[test]
    fn reject_invalid_documents() -> Result<(), Error> {
        let mut doc = movie_doc()?;
        doc.insert("ratings", vec![Bson::Int32(9)]);
        assert!(movie_from_doc(&doc).is_err());

        let mut doc = movie_doc()?;
        doc.insert("ratings", vec![Bson::Double(4.5)]);
        assert!(movie_from_doc(&doc).is_err());

        let mut doc = movie_doc()?;
        doc.remove("title");
        assert!(movie_from_doc(&doc).is_err());

        Ok(())
    }

    #[test]
    fn broken_documents_are_left_out_of_batches() -> Result<(), Error> {
        let mut broken = movie_doc()?;
        broken.insert("ratings", vec![Bson::Int32(4), Bson::Int32(9)]);

        let mut fractional = movie_doc()?;
        fractional.insert("ratings", vec![Bson::Double(4.5)]);

        let movies = decode_movies(vec![movie_doc()?, broken, fractional, movie_doc()?]);
        assert_eq!(movies.len(), 2);
        assert!(movies.iter().all(|movie| movie.title == "Inception"));

        Ok(())
    }

    #[test]
    fn decode_user_and_rating() -> Result<(), Error> {
        let user = user_from_doc(&doc! {
            "_id": object_id(&USER)?,
            "username": "ana",
            "watchlist": [object_id(&MOVIE)?],
        })?;

        assert_eq!(user.username, "ana");
        assert_eq!(user.watchlist.ids()[0].as_str(), MOVIE);

        let rating = rating_from_doc(&doc! {
            "_id": object_id(&"5f8d0d55b54764421b7156cb")?,
            "userId": object_id(&USER)?,
            "movieId": object_id(&MOVIE)?,
            "rating": 5,
        })?;

        assert_eq!(rating.rating.value(), 5);
        assert_eq!(rating.user_id, user.id);

        Ok(())
    }
}
