pub mod algebra;
pub mod config;
pub mod errors;
pub mod facts;
pub mod flow;
pub mod formatter;
pub mod schema;
pub mod session;
pub mod slice;
pub mod types;
