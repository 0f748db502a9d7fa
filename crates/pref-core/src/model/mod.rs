pub mod entry;
pub mod player;
pub mod seat;
pub mod topology;
pub mod validate;

pub use entry::Entry;
pub use player::{PlayerNumbers, PlayerRecord};
pub use seat::{Seat, UnknownSeat};
pub use topology::Topology;
pub use validate::{
    FieldKind, Parsed, Problem, ValidationOutcome, check_complete, check_names, check_seat,
    is_aggregate_complete, parse, validate,
};
