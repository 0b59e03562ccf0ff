pub mod generator;
pub mod handlers;
pub mod parser;
pub mod prompts;
