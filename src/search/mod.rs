mod client;
pub mod demo;
mod paper;

pub use client::{SearchClient, SearchOutcome};
pub use paper::PaperRecord;
