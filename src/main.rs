//! Terminal interface to the Pawnstorm board, for two players sharing one terminal.

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{debug, info, LevelFilter};
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};

use pawnstorm_engine::coretypes::{GameState, Move, Square};
use pawnstorm_engine::Game;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Minimum level of log messages.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
    /// Also write log messages to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Draw pieces as Unicode chess glyphs instead of letters.
    #[arg(long)]
    unicode: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
enum InputKind {
    Exit,
    Newgame,
    Help,
    Moves,
    Click(Square),
    Select(Square),
    Deselect,
    GameMove(Move),
    Error,
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        let s = s.trim().to_ascii_lowercase();
        if let Ok(move_) = s.parse() {
            return Self::GameMove(move_);
        }
        if let Ok(square) = s.parse() {
            return Self::Click(square);
        }

        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            ["select", square] => square.parse().map_or(Self::Error, Self::Select),
            ["deselect" | "cancel"] => Self::Deselect,
            ["exit" | "quit"] => Self::Exit,
            ["new" | "newgame" | "ng"] => Self::Newgame,
            ["help"] => Self::Help,
            ["moves"] => Self::Moves,
            _ => Self::Error,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args)?;
    info!("starting with {args:?}");

    println!("Pawnstorm {}\n", env!("CARGO_PKG_VERSION"));
    println!("Type help for a list of commands.\n");

    let mut game = Game::start_position();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_game(&game, args.unicode);
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input_kind = InputKind::from(line.as_str());
        debug!("input {line:?} read as {input_kind:?}");

        match input_kind {
            InputKind::Exit => break,
            InputKind::Newgame => {
                game = Game::start_position();
                println!("Starting new game...");
            }
            InputKind::Help => print_help(),
            InputKind::Moves => {
                let moves: Vec<String> = game
                    .position()
                    .get_legal_moves()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!("{} legal moves: {}", moves.len(), moves.join(" "));
            }
            InputKind::Click(square) => match game.click(square) {
                Ok(Some(move_info)) => println!("Played {move_info}."),
                Ok(None) => (),
                Err(e) => println!("{e}"),
            },
            InputKind::Select(square) => {
                if let Err(e) = game.select(square) {
                    println!("{e}");
                }
            }
            InputKind::Deselect => game.deselect(),
            InputKind::GameMove(move_) => match game.try_move(move_) {
                Ok(move_info) => println!("Played {move_info}."),
                Err(e) => println!("{e}. No action taken."),
            },
            InputKind::Error => println!("Invalid command: {}", line.trim()),
        }
    }

    info!("exiting after {} moves", game.history().len());
    Ok(())
}

/// Log to stderr, and to a file if one was given.
fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let level = LevelFilter::from(args.log_level);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = &args.log_file {
        let log_file = File::create(path)?;
        loggers.push(WriteLogger::new(level, simplelog::Config::default(), log_file));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn print_game(game: &Game, unicode: bool) {
    println!();
    print!("{}", game.mailbox().pretty_with(game.highlighted(), unicode));
    if let Some(selection) = game.selection() {
        println!("Selected {}.", selection.square);
    }
    if let Some(last_move) = game.last_move() {
        println!("Last move {last_move}.");
    }

    let position = game.position();
    match game.state() {
        GameState::InProgress if position.is_stalemate() => {
            println!("{} is STALEMATED. Type new to start a new game.", game.side_to_move());
        }
        GameState::InProgress if position.is_in_check() => {
            println!("{} to move, in CHECK.", game.side_to_move());
        }
        GameState::InProgress => println!("{} to move.", game.side_to_move()),
        state => println!("{state}! Type new to start a new game."),
    }
}

fn print_help() {
    println!("Commands:");
    println!("<square> => Select a piece, or move the selected piece there.");
    println!("select <square> => Select a piece and show where it can move.");
    println!("deselect | cancel => Clear the current selection.");
    println!("moves => List every legal move for the side to move.");
    println!("new | newgame | ng => Begin a new game.");
    println!("help => Print this help text.");
    println!("exit => End the program.");
    println!("\nTo make a move directly, enter it in coordinate form.");
    println!("Examples: d2d4 -> Move piece on D2 to D4.");
}
