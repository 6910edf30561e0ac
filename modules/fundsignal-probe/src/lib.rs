pub mod discovery;
pub mod facts;
pub mod fetcher;
pub mod limiter;
pub mod merge;
pub mod probe;
pub mod queries;
pub mod report;
pub mod score;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

#[cfg(test)]
mod chain_tests;
