// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

mod basics;

use basics::{parens, parse_ident, parse_number, parse_separator, parse_string};
use catalog::SearchBy;
use config::Backend;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::{all_consuming, map, value};
use nom::multi::separated_list;
use nom::sequence::{preceded, separated_pair};
use nom::IResult;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Format {
    Table,
    Json,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Mode {
    Genres(Vec<String>),
    Watchlist,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Statement {
    Connect(Backend),
    Login(String),
    Logout,
    Register(String),
    Movies,
    Trending,
    Genres,
    QueryMovie(SearchBy),
    Rate(String, i64),
    Toggle(String),
    Watchlist,
    Ratings,
    Recommend(Mode),
    InsertMovie,
    Format(Format),
}

fn parse_backend(input: &str) -> IResult<&str, Backend> {
    alt((
        value(Backend::Memory, tag("memory")),
        value(Backend::Mongo, tag("mongo")),
    ))(input)
}

fn parse_format(input: &str) -> IResult<&str, Format> {
    alt((
        value(Format::Table, tag("table")),
        value(Format::Json, tag("json")),
    ))(input)
}

fn parse_searchby(input: &str) -> IResult<&str, SearchBy> {
    alt((
        map(preceded(tag("id"), parens(parse_ident)), SearchBy::id),
        map(preceded(tag("title"), parens(parse_string)), SearchBy::title),
        map(preceded(tag("genre"), parens(parse_string)), SearchBy::genre),
    ))(input)
}

fn parse_mode(input: &str) -> IResult<&str, Mode> {
    alt((
        map(
            preceded(
                tag("genres"),
                parens(separated_list(parse_separator, parse_string)),
            ),
            |genres| Mode::Genres(genres.into_iter().map(String::from).collect()),
        ),
        value(Mode::Watchlist, tag("watchlist")),
    ))(input)
}

fn parse_statement(input: &str) -> IResult<&str, Statement> {
    alt((
        map(preceded(tag("connect"), parens(parse_backend)), Statement::Connect),
        map(preceded(tag("login"), parens(parse_ident)), |id| {
            Statement::Login(id.into())
        }),
        value(Statement::Logout, tag("logout")),
        map(preceded(tag("register"), parens(parse_string)), |name| {
            Statement::Register(name.into())
        }),
        value(Statement::Movies, tag("movies")),
        value(Statement::Trending, tag("trending")),
        value(Statement::Genres, tag("genres")),
        map(
            preceded(tag("query_movie"), parens(parse_searchby)),
            Statement::QueryMovie,
        ),
        map(
            preceded(
                tag("rate"),
                parens(separated_pair(parse_ident, parse_separator, parse_number)),
            ),
            |(id, rating)| Statement::Rate(id.into(), rating),
        ),
        map(preceded(tag("toggle"), parens(parse_ident)), |id| {
            Statement::Toggle(id.into())
        }),
        value(Statement::Watchlist, tag("watchlist")),
        value(Statement::Ratings, tag("ratings")),
        map(preceded(tag("recommend"), parens(parse_mode)), Statement::Recommend),
        value(Statement::InsertMovie, tag("insert_movie")),
        map(preceded(tag("format"), parens(parse_format)), Statement::Format),
    ))(input)
}

pub fn parse_line(input: &str) -> Option<Statement> {
    let (_, statement) = all_consuming(parse_statement)(input.trim()).ok()?;
    Some(statement)
}
