pub mod candidate;
pub mod careers;
