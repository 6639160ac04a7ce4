pub mod engine;
pub mod schema;
