//! Seat availability: the question wizard and the backend search behind it.

pub mod flow;
pub mod search;

pub use flow::{FlowOutput, SeatFlow, SeatQuery};
pub use search::SeatSearch;
