// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

mod parser;
mod utils;

use anyhow::Error;
use catalog::{error::status_of, seed, CatalogStore, Recommendation, Session, ToTable};
use clap::{App, Arg};
use config::{Backend, Config};
use engine::Engine;
use memory_store::MemoryStore;
use mongo_store::MongoStore;
use parser::{Format, Mode, Statement};
use rustyline::Editor;
use serde::Serialize;
use simplelog::{Config as TermConfig, LevelFilter, TermLogger, TerminalMode};

macro_rules! prompt {
    ($ed:ident) => {{
        prompt!($ed, "")
    }};

    ($ed:ident, $db:expr) => {{
        use rustyline::error::ReadlineError;

        let msg = if $db.is_empty() {
            format!("{}", PROMPT)
        } else {
            format!("({}) {}", $db, PROMPT)
        };

        match $ed.readline(&msg) {
            Ok(line) => {
                $ed.add_history_entry(line.as_str());
                Ok(line)
            }

            Err(ReadlineError::Interrupted) => {
                continue;
            }

            Err(ReadlineError::Eof) => {
                if $db.is_empty() {
                    println!("Exiting...Good bye!");
                } else {
                    println!("Disconnecting from {}", $db);
                }

                break;
            }

            Err(e) => Err(e),
        }
    }};
}

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = ">> ";
const DEFAULT_CONFIG: &str = "movie-catalog.toml";

struct Output {
    format: Format,
}

impl Output {
    fn show<T: ToTable + Serialize>(&self, items: &[T], empty: &str) {
        match self.format {
            Format::Json => self.json(items),
            Format::Table if items.is_empty() => println!("{}", empty),
            Format::Table => {
                for item in items {
                    println!("{}", item.to_table());
                }
            }
        }
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Couldn't serialize output: {}", e),
        }
    }

    fn recommendation(&self, recommendation: &Recommendation) {
        match (&recommendation.prompt, self.format) {
            (_, Format::Json) => self.json(recommendation),
            (Some(prompt), Format::Table) => println!("{}", prompt),
            (None, Format::Table) => self.show(&recommendation.movies, "Nothing to recommend"),
        }
    }

    fn error(&self, err: &Error) {
        println!("Error {}: {}", status_of(err), err);
    }
}

struct State {
    session: Option<Session>,
    output: Output,
}

impl State {
    fn logged_in(&self) -> Option<&Session> {
        if self.session.is_none() {
            println!("Login first with login(<user id>)");
        }

        self.session.as_ref()
    }
}

enum Exit {
    Disconnect,
    Quit,
}

fn execute<S: CatalogStore>(
    engine: &Engine<S>,
    rl: &mut Editor<()>,
    state: &mut State,
    statement: Statement,
) -> Result<(), Error> {
    let output = &state.output;

    match statement {
        Statement::Connect(_) => println!("Invalid in this context!"),

        Statement::Login(id) => {
            let session = engine.login(&id)?;
            println!("Logged in as id({})", session.user);
            state.session = Some(session);
        }

        Statement::Logout => match state.session.take() {
            Some(session) => println!("Logged out from id({})", session.user),
            None => println!("Not logged in"),
        },

        Statement::Register(name) => output.show(&[engine.register(&name)?], ""),

        Statement::Movies => output.show(&engine.movies()?, "The catalog is empty"),

        Statement::Trending => output.show(&engine.trending()?, "No trending movies"),

        Statement::Genres => {
            let genres = engine.genres()?;
            match output.format {
                Format::Table => println!("{}", genres),
                Format::Json => output.json(&genres.iter().collect::<Vec<_>>()),
            }
        }

        Statement::QueryMovie(searchby) => {
            let movies = engine.query(&searchby)?;
            output.show(&movies, &format!("No movies found for {}", searchby));
        }

        Statement::Rate(id, rating) => {
            if let Some(session) = state.logged_in() {
                output.show(&[engine.rate(session, &id, rating)?], "");
            }
        }

        Statement::Toggle(id) => {
            if let Some(session) = state.logged_in() {
                let watchlist = engine.toggle_watchlist(session, &id)?;
                match output.format {
                    Format::Json => output.json(&watchlist),
                    Format::Table => println!("Watchlist has {} movies", watchlist.len()),
                }
            }
        }

        Statement::Watchlist => {
            let movies = engine.watchlist(state.session.as_ref())?;
            output.show(&movies, "Watchlist is empty");
        }

        Statement::Ratings => {
            if let Some(session) = state.logged_in() {
                output.show(&engine.user_ratings(session)?, "No ratings yet");
            }
        }

        Statement::Recommend(Mode::Genres(genres)) => {
            output.recommendation(&engine.recommend_by_genres(&genres)?)
        }

        Statement::Recommend(Mode::Watchlist) => {
            output.recommendation(&engine.recommend_for(state.session.as_ref())?)
        }

        Statement::InsertMovie => match utils::read_new_movie(rl)? {
            Some(movie) => output.show(&[engine.add_movie(movie)?], ""),
            None => println!("Insertion cancelled"),
        },

        Statement::Format(format) => {
            state.output.format = format;
            println!("Output format set to {:?}", format);
        }
    }

    Ok(())
}

fn store_connected_prompt<S: CatalogStore>(
    store: &S,
    name: &str,
    config: &Config,
) -> Result<Exit, Error> {
    let engine = Engine::with_config(store, &config.engine);
    let mut rl = Editor::<()>::new();
    let mut state = State {
        session: None,
        output: Output {
            format: Format::Table,
        },
    };

    loop {
        let opt: String = prompt!(rl, name)?;

        match opt.trim() {
            "?" | "h" | "help" => {
                println!("Store help:");
                println!("login(<id>) | logout | register('<name>')");
                println!("movies | trending | genres | watchlist | ratings");
                println!("query_movie(id(<id>) | title('<text>') | genre('<tag>'))");
                println!("rate(<movie id>, <1-5>) | toggle(<movie id>)");
                println!("recommend(genres('<tag>', ...) | watchlist)");
                println!("insert_movie | format(table | json)");
                println!("d | disconnect | q | quit");
            }

            "q" | "quit" => {
                println!("Bye!");
                return Ok(Exit::Quit);
            }

            "d" | "disconnect" => {
                println!("Disconnecting from {}", name);
                break;
            }

            "v" | "version" => {
                println!("version: {}", VERSION);
            }

            empty if empty.is_empty() => {}

            line => match parser::parse_line(line) {
                Some(statement) => {
                    if let Err(e) = execute(&engine, &mut rl, &mut state, statement) {
                        state.output.error(&e);
                    }
                }

                None => println!("Invalid syntax"),
            },
        }
    }

    Ok(Exit::Disconnect)
}

fn connect(backend: Backend, config: &Config) -> Result<Exit, Error> {
    match backend {
        Backend::Memory => {
            let store = match &config.store.seed_path {
                Some(path) => MemoryStore::with_movies(seed::load_movies(path)?)?,
                None => MemoryStore::new(),
            };

            store_connected_prompt(&store, "memory", config)
        }

        Backend::Mongo => {
            let store = MongoStore::from_config(&config.store)?;
            store_connected_prompt(&store, "mongo", config)
        }
    }
}

fn log_level(configured: &str, verbosity: u64) -> LevelFilter {
    let base = configured.parse().unwrap_or(LevelFilter::Info);

    match base as u64 + verbosity {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<(), Error> {
    let matches = App::new("movie-catalog")
        .version(VERSION)
        .about("Interactive shell over the movie catalog")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .default_value(DEFAULT_CONFIG)
                .help("Configuration file, defaults are used if it doesn't exist"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Raise the log level, can be repeated"),
        )
        .get_matches();

    let mut config = Config::load_or_default(matches.value_of("config").unwrap_or(DEFAULT_CONFIG))?;
    config.apply_env(dotenv::vars());

    let level = log_level(&config.log.level, matches.occurrences_of("verbose"));
    TermLogger::init(level, TermConfig::default(), TerminalMode::Mixed)?;

    println!("Welcome to movie-catalog {}", VERSION);
    let mut rl = Editor::<()>::new();

    loop {
        let opt: String = prompt!(rl)?;

        match opt.trim() {
            "?" | "h" | "help" => {
                println!("Main help:");
                println!("h | help                 Shows this help");
                println!("q | quit                 Quit");
                println!("connect(memory | mongo)  Connect to a store");
            }

            "q" | "quit" => {
                println!("Bye!");
                break;
            }

            "v" | "version" => {
                println!("version: {}", VERSION);
            }

            empty if empty.is_empty() => {}

            line => match parser::parse_line(line) {
                Some(Statement::Connect(backend)) => match connect(backend, &config) {
                    Ok(Exit::Quit) => break,
                    Ok(Exit::Disconnect) => {}
                    Err(e) => println!("Error {}: {}", status_of(&e), e),
                },

                Some(_) => println!("Invalid statement in this context!"),
                None => println!("Invalid syntax!"),
            },
        }
    }

    Ok(())
}
