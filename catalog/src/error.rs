// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use thiserror::Error as DError;

/// Broad family of a failure, mirrors how the HTTP surface reports it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    Store,
}

impl ErrorClass {
    pub fn status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Store => 500,
        }
    }
}

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("Invalid {0} id({1})")]
    InvalidId(&'static str, String),

    #[error("A movie with movieId({0}) is already in the catalog")]
    DuplicateMovie(String),

    #[error("Couldn't found movie with id({0})")]
    MovieNotFound(String),

    #[error("Couldn't found user with id({0})")]
    UserNotFound(String),

    #[error("Couldn't found rating with id({0})")]
    RatingNotFound(String),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Failed to cast bson value for field '{0}'")]
    BsonConvert(&'static str),

    #[error("Failed to cast to some value ({0})")]
    ValueConvert(String),

    #[error("Couldn't cast value to {0}")]
    CastingValue(&'static str),

    #[error("Couldn't insert rating for user({0}) on movie({1})")]
    InsertRatingFailed(String, String),
}

impl ErrorKind {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::RatingOutOfRange(_)
            | Self::InvalidId(..)
            | Self::DuplicateMovie(_)
            | Self::MissingField(_)
            | Self::ValueConvert(_)
            | Self::CastingValue(_) => ErrorClass::Validation,

            Self::MovieNotFound(_) | Self::UserNotFound(_) | Self::RatingNotFound(_) => {
                ErrorClass::NotFound
            }

            Self::BsonConvert(_) | Self::InsertRatingFailed(..) => ErrorClass::Store,
        }
    }
}

/// Classify any propagated error, anything we don't know about is a store failure.
pub fn class_of(err: &Error) -> ErrorClass {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ErrorKind>())
        .map(ErrorKind::class)
        .unwrap_or(ErrorClass::Store)
}

pub fn status_of(err: &Error) -> u16 {
    class_of(err).status()
}
