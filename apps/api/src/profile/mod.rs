pub mod handlers;
pub mod sections;
