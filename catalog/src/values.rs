// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use crate::models::{Genres, NewMovie};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

const LIST_SEPARATOR: char = '|';

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Type {
    String,
    StringList,
    Bool,
    Int32,
    Double,
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::String => "text",
            Type::StringList => "list separated by '|'",
            Type::Bool => "bool",
            Type::Int32 => "integer",
            Type::Double => "decimal",
        };

        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Field<'a> {
    Required(&'a str, Type),
    Optional(&'a str, Type),
}

impl<'a> Field<'a> {
    pub fn is_optional(&self) -> bool {
        matches!(self, Field::Optional(..))
    }

    pub fn into_tuple(self) -> (&'a str, Type) {
        match self {
            Field::Required(name, ty) | Field::Optional(name, ty) => (name, ty),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    StringList(Vec<String>),
    Bool(bool),
    Int32(i32),
    Double(f64),
}

impl Value {
    pub fn from_str(value: &str, tp: Type) -> Result<Self, ErrorKind> {
        let value = match tp {
            Type::String => Self::String(value.to_owned()),
            Type::StringList => Self::StringList(
                value
                    .split(LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            Type::Bool => {
                let value = match value.trim() {
                    "true" | "1" | "yes" => true,
                    "false" | "0" | "no" => false,
                    _ => return Err(ErrorKind::ValueConvert("Invalid literal for bool".into())),
                };

                Self::Bool(value)
            }

            Type::Int32 => {
                let value: i32 = value
                    .trim()
                    .parse()
                    .map_err(|e: <i32 as FromStr>::Err| ErrorKind::ValueConvert(e.to_string()))?;
                Self::Int32(value)
            }

            Type::Double => {
                let value: f64 = value
                    .trim()
                    .parse()
                    .map_err(|e: <f64 as FromStr>::Err| ErrorKind::ValueConvert(e.to_string()))?;
                Self::Double(value)
            }
        };

        Ok(value)
    }

    pub fn as_string(&self) -> Result<&str, ErrorKind> {
        match self {
            Self::String(s) => Ok(s),
            _ => Err(ErrorKind::CastingValue("String")),
        }
    }

    pub fn as_list(&self) -> Result<&[String], ErrorKind> {
        match self {
            Self::StringList(v) => Ok(v),
            _ => Err(ErrorKind::CastingValue("list")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ErrorKind> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(ErrorKind::CastingValue("bool")),
        }
    }

    pub fn as_i32(&self) -> Result<i32, ErrorKind> {
        match self {
            Self::Int32(v) => Ok(*v),
            _ => Err(ErrorKind::CastingValue("i32")),
        }
    }

    pub fn as_f64(&self) -> Result<f64, ErrorKind> {
        match self {
            Self::Double(v) => Ok(*v),
            _ => Err(ErrorKind::CastingValue("f64")),
        }
    }
}

impl NewMovie {
    /// Fields asked for when a movie is entered by hand
    pub fn fields() -> Vec<Field<'static>> {
        vec![
            Field::Required("movieId", Type::String),
            Field::Required("title", Type::String),
            Field::Required("genre", Type::String),
            Field::Required("year", Type::Int32),
            Field::Required("description", Type::String),
            Field::Required("imageUrl", Type::String),
            Field::Required("platformUrl", Type::String),
            Field::Required("director", Type::String),
            Field::Required("cast", Type::StringList),
            Field::Optional("trending", Type::Bool),
            Field::Optional("imdbRating", Type::Double),
        ]
    }

    pub fn from_prototype(proto: &HashMap<&str, Value>) -> Result<Self, ErrorKind> {
        fn required<'p>(
            proto: &'p HashMap<&str, Value>,
            name: &'static str,
        ) -> Result<&'p Value, ErrorKind> {
            proto.get(name).ok_or(ErrorKind::MissingField(name))
        }

        Ok(Self {
            catalog_id: required(proto, "movieId")?.as_string()?.to_owned(),
            title: required(proto, "title")?.as_string()?.to_owned(),
            genre: Genres::parse(required(proto, "genre")?.as_string()?),
            year: required(proto, "year")?.as_i32()?,
            description: required(proto, "description")?.as_string()?.to_owned(),
            image_url: required(proto, "imageUrl")?.as_string()?.to_owned(),
            platform_url: required(proto, "platformUrl")?.as_string()?.to_owned(),
            trending: match proto.get("trending") {
                Some(value) => value.as_bool()?,
                None => false,
            },
            imdb_rating: match proto.get("imdbRating") {
                Some(value) => value.as_f64()?,
                None => 0.,
            },
            director: required(proto, "director")?.as_string()?.to_owned(),
            cast: required(proto, "cast")?.as_list()?.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use assert_approx_eq::*;
    use common_macros::hash_map;

    #[test]
    fn casting_string() -> Result<(), Error> {
        let value = Value::from_str("Inception", Type::String)?;
        let value = value.as_string()?;

        assert_eq!(value, "Inception");

        Ok(())
    }

    #[test]
    fn casting_list() -> Result<(), Error> {
        let value = Value::from_str("Christian Bale | Heath Ledger|", Type::StringList)?;
        let value = value.as_list()?;

        assert_eq!(value, &["Christian Bale".to_owned(), "Heath Ledger".to_owned()][..]);

        Ok(())
    }

    #[test]
    fn casting_bool() -> Result<(), Error> {
        let value = Value::from_str("true", Type::Bool)?;
        assert!(value.as_bool()?);

        assert!(Value::from_str("maybe", Type::Bool).is_err());

        Ok(())
    }

    #[test]
    fn casting_i32() -> Result<(), Error> {
        let value = Value::from_str("2010", Type::Int32)?;
        let value = value.as_i32()?;

        assert_eq!(value, 2010);

        Ok(())
    }

    #[test]
    fn casting_f64() -> Result<(), Error> {
        let value = Value::from_str("8.8", Type::Double)?;
        let value = value.as_f64()?;

        assert_approx_eq!(value, 8.8);

        Ok(())
    }

    #[test]
    fn movie_from_prototype() -> Result<(), Error> {
        let proto = hash_map! {
            "movieId" => Value::String("tt1375666".into()),
            "title" => Value::String("Inception".into()),
            "genre" => Value::String("Sci-Fi, Action".into()),
            "year" => Value::Int32(2010),
            "description" => Value::String("Dreams within dreams".into()),
            "imageUrl" => Value::String("https://example.com/i.jpg".into()),
            "platformUrl" => Value::String("https://example.com/w".into()),
            "director" => Value::String("Christopher Nolan".into()),
            "cast" => Value::StringList(vec!["Leonardo DiCaprio".into()]),
            "imdbRating" => Value::Double(8.8),
        };

        let movie = NewMovie::from_prototype(&proto)?;
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.genre.len(), 2);
        assert!(!movie.trending);
        assert_approx_eq!(movie.imdb_rating, 8.8);

        Ok(())
    }

    #[test]
    fn prototype_missing_field() {
        let proto = hash_map! {
            "title" => Value::String("Inception".into()),
        };

        match NewMovie::from_prototype(&proto) {
            Err(ErrorKind::MissingField(name)) => assert_eq!(name, "movieId"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
