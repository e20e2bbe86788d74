pub mod allocator;
pub mod calculator;
pub mod schedule;
pub mod suggestions;
