pub mod resolver;
pub mod result;
pub mod scoreboard;
pub mod settlement;

pub use resolver::{compute, resolve};
pub use result::GameResult;
pub use scoreboard::{Scoreboard, Standing};
pub use settlement::{
    Hundredths, Rules, SeatSettlement, Settlement, UnknownVariant, Variant, settle,
};
