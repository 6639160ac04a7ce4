pub mod explanation;
pub mod verdict;
