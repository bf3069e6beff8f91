// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use std::fmt::{self, Display};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SearchBy {
    Id(String),
    /// Case-insensitive substring of the title
    Title(String),
    Genre(String),
    Trending,
}

impl SearchBy {
    pub fn id(id: &str) -> Self {
        Self::Id(id.into())
    }

    pub fn title(title: &str) -> Self {
        Self::Title(title.into())
    }

    pub fn genre(genre: &str) -> Self {
        Self::Genre(genre.into())
    }
}

impl Display for SearchBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchBy::Id(id) => write!(f, "id({})", id),
            SearchBy::Title(title) => write!(f, "title({})", title),
            SearchBy::Genre(genre) => write!(f, "genre({})", genre),
            SearchBy::Trending => write!(f, "trending"),
        }
    }
}
