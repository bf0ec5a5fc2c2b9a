//! Database queries

pub mod depot;
pub mod route;
pub mod stop;
pub mod vehicle;
