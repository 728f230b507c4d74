mod aggregator;
mod vote_buffer;

pub use aggregator::{ConfirmedState, StabilityAggregator, Vote};
pub use vote_buffer::{Reading, VoteBuffer};
