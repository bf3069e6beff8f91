// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::models::{Genres, NewMovie};
use anyhow::Error;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

const CAST_SEPARATOR: char = '|';

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieRecord {
    movie_id: String,
    title: String,
    genre: String,
    year: i32,
    description: String,
    image_url: String,
    platform_url: String,
    #[serde(default)]
    trending: bool,
    #[serde(default)]
    imdb_rating: f64,
    director: String,
    cast: String,
}

impl From<MovieRecord> for NewMovie {
    fn from(record: MovieRecord) -> Self {
        Self {
            catalog_id: record.movie_id,
            title: record.title,
            genre: Genres::parse(&record.genre),
            year: record.year,
            description: record.description,
            image_url: record.image_url,
            platform_url: record.platform_url,
            trending: record.trending,
            imdb_rating: record.imdb_rating,
            director: record.director,
            cast: record
                .cast
                .split(CAST_SEPARATOR)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

/// Read catalog records, the first row is expected to be the header
pub fn read_movies<R: Read>(reader: R) -> Result<Vec<NewMovie>, Error> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut movies = Vec::new();
    for (line, record) in csv.deserialize::<MovieRecord>().enumerate() {
        match record {
            Ok(record) => movies.push(record.into()),
            Err(e) => {
                log::warn!("Skipping catalog record {}: {}", line + 1, e);
            }
        }
    }

    Ok(movies)
}

pub fn load_movies(path: impl AsRef<Path>) -> Result<Vec<NewMovie>, Error> {
    let file = std::fs::File::open(path)?;
    read_movies(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
movieId,title,genre,year,description,imageUrl,platformUrl,trending,imdbRating,director,cast
tt1375666,Inception,\"Sci-Fi, Action\",2010,A thief who steals secrets,https://i/1.jpg,https://w/1,true,8.8,Christopher Nolan,Leonardo DiCaprio|Elliot Page
tt0111161,The Shawshank Redemption,Drama,1994,Two imprisoned men bond,https://i/2.jpg,https://w/2,false,9.3,Frank Darabont,Tim Robbins|Morgan Freeman
broken,row
";

    #[test]
    fn read_sample_catalog() -> Result<(), Error> {
        let movies = read_movies(SAMPLE.as_bytes())?;
        assert_eq!(movies.len(), 2);

        let inception = &movies[0];
        assert_eq!(inception.catalog_id, "tt1375666");
        assert!(inception.genre.contains("Action"));
        assert!(inception.trending);
        assert_eq!(inception.cast, vec!["Leonardo DiCaprio", "Elliot Page"]);

        let shawshank = &movies[1];
        assert_eq!(shawshank.year, 1994);
        assert!(!shawshank.trending);

        Ok(())
    }
}
