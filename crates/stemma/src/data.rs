//! Small purpose-built data structures used by the layout phases.

pub mod priority_queue;

pub use priority_queue::PriorityQueue;
