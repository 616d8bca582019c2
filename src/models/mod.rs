pub mod context;
pub mod project;
pub mod token;
pub mod user;
