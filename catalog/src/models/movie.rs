// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use super::{genres::Genres, ids::MovieId, score::{mean, Score}};
use crate::entity::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: MovieId,
    #[serde(rename = "movieId")]
    pub catalog_id: String,
    pub title: String,
    pub genre: Genres,
    pub year: i32,
    pub description: String,
    pub image_url: String,
    pub platform_url: String,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub ratings: Vec<Score>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub imdb_rating: f64,
    pub director: String,
    pub cast: Vec<String>,
}

impl Movie {
    pub fn from_new(id: MovieId, new: NewMovie) -> Self {
        Self {
            id,
            catalog_id: new.catalog_id,
            title: new.title,
            genre: new.genre,
            year: new.year,
            description: new.description,
            image_url: new.image_url,
            platform_url: new.platform_url,
            trending: new.trending,
            ratings: Vec::new(),
            average_rating: 0.,
            imdb_rating: new.imdb_rating,
            director: new.director,
            cast: new.cast,
        }
    }

    /// Append a score and keep `average_rating` equal to the mean of `ratings`
    pub fn record_rating(&mut self, score: Score) -> f64 {
        self.ratings.push(score);
        self.average_rating = mean(&self.ratings);
        self.average_rating
    }

    pub fn has_cast_member(&self, name: &str) -> bool {
        self.cast.iter().any(|member| member == name)
    }
}

impl Entity for Movie {
    type Id = MovieId;

    fn get_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn get_data(&self) -> Vec<(String, String)> {
        vec![
            ("title".into(), self.title.clone()),
            ("genre".into(), self.genre.to_string()),
            ("year".into(), self.year.to_string()),
            ("director".into(), self.director.clone()),
            ("cast".into(), self.cast.join(", ")),
            ("rating".into(), format!("{:.1} ({} votes)", self.average_rating, self.ratings.len())),
            ("imdb".into(), format!("{:.1}", self.imdb_rating)),
            ("trending".into(), self.trending.to_string()),
        ]
    }
}

/// A movie that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    #[serde(rename = "movieId")]
    pub catalog_id: String,
    pub title: String,
    pub genre: Genres,
    pub year: i32,
    pub description: String,
    pub image_url: String,
    pub platform_url: String,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub imdb_rating: f64,
    pub director: String,
    pub cast: Vec<String>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_approx_eq::*;

    pub(crate) fn new_movie(title: &str, genre: &str, cast: &[&str]) -> NewMovie {
        NewMovie {
            catalog_id: format!("tt-{}", title.to_lowercase().replace(' ', "-")),
            title: title.into(),
            genre: Genres::parse(genre),
            year: 2010,
            description: format!("{} description", title),
            image_url: "https://example.com/poster.jpg".into(),
            platform_url: "https://example.com/watch".into(),
            trending: false,
            imdb_rating: 7.5,
            director: "Someone".into(),
            cast: cast.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn new_movies_start_unrated() {
        let movie = Movie::from_new(MovieId::from_counter(1), new_movie("Inception", "Sci-Fi", &[]));
        assert!(movie.ratings.is_empty());
        assert_approx_eq!(movie.average_rating, 0.);
    }

    #[test]
    fn record_rating_recomputes_average() -> Result<(), anyhow::Error> {
        let mut movie = Movie::from_new(MovieId::from_counter(1), new_movie("Heat", "Crime", &[]));
        movie.record_rating(Score::new(4)?);
        movie.record_rating(Score::new(5)?);

        let average = movie.record_rating(Score::new(3)?);
        assert_approx_eq!(average, 4.);
        assert_approx_eq!(movie.average_rating, 4.);
        assert_eq!(movie.ratings.len(), 3);

        Ok(())
    }

    #[test]
    fn wire_shape() -> Result<(), anyhow::Error> {
        let movie = Movie::from_new(
            MovieId::from_counter(7),
            new_movie("Inception", "Sci-Fi, Action", &["Leonardo DiCaprio"]),
        );

        let value = serde_json::to_value(&movie)?;
        assert_eq!(value["_id"], "000000000000000000000007");
        assert_eq!(value["movieId"], "tt-inception");
        assert_eq!(value["genre"], "Sci-Fi, Action");
        assert_eq!(value["averageRating"], 0.0);
        assert!(value["imageUrl"].is_string());

        Ok(())
    }
}
