pub mod boardrepr;
pub mod coretypes;
pub mod error;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod movelist;
pub mod perft;
pub mod position;

pub use boardrepr::Mailbox;
pub use error::{Error, ErrorKind};
pub use game::Game;
pub use position::Position;
