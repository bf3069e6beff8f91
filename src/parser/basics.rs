// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use nom::bytes::complete::{is_not, take_while1};
use nom::character::complete::{char, digit1, space0};
use nom::combinator::{map_res, opt, recognize};
use nom::sequence::{delimited, pair};
use nom::IResult;

/// Ids and keywords, hex object ids included
pub(crate) fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}

/// A single quoted, non empty literal
pub(crate) fn parse_string(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), is_not("'"), char('\''))(input)
}

pub(crate) fn parse_number(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse)(input)
}

pub(crate) fn parse_separator(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

/// `inner` wrapped in parentheses, blanks allowed just inside them
pub(crate) fn parens<'a, O, F>(inner: F) -> impl Fn(&'a str) -> IResult<&'a str, O>
where
    F: Fn(&'a str) -> IResult<&'a str, O>,
{
    delimited(pair(char('('), space0), inner, pair(space0, char(')')))
}
