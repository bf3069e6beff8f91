// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use catalog::{Field, NewMovie, Type, Value};
use rustyline::{error::ReadlineError, Editor};
use std::collections::HashMap;

enum Answer {
    Given(Value),
    Skipped,
    Cancelled,
}

fn label(name: &str, optional: bool, ty: Type) -> String {
    let kind = if optional { "optional" } else { "required" };
    format!("{}{} ({}, {}): ", crate::PROMPT, name, kind, ty)
}

fn ask(rl: &mut Editor<()>, name: &str, optional: bool, ty: Type) -> Result<Answer, Error> {
    let msg = label(name, optional, ty);

    loop {
        let line = match rl.readline(&msg) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => return Ok(Answer::Cancelled),
            Err(ReadlineError::Eof) if optional => return Ok(Answer::Skipped),
            Err(ReadlineError::Eof) => {
                log::warn!("Field '{}' is required", name);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let line = line.trim();
        if line.is_empty() && optional {
            return Ok(Answer::Skipped);
        }

        match Value::from_str(line, ty) {
            Ok(value) => return Ok(Answer::Given(value)),
            Err(e) => log::warn!("Invalid value for '{}': {}", name, e),
        }
    }
}

/// Ask for every field of a movie, `None` if the user gave up with CTRL-C
pub(crate) fn read_new_movie(rl: &mut Editor<()>) -> Result<Option<NewMovie>, Error> {
    println!("CTRL-D skips an optional field, CTRL-C cancels");
    let mut prototype: HashMap<&str, Value> = HashMap::new();

    for field in NewMovie::fields() {
        let optional = field.is_optional();
        let (name, ty) = field.into_tuple();

        match ask(rl, name, optional, ty)? {
            Answer::Given(value) => {
                prototype.insert(name, value);
            }
            Answer::Skipped => {}
            Answer::Cancelled => return Ok(None),
        }
    }

    Ok(Some(NewMovie::from_prototype(&prototype)?))
}
