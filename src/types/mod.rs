//! Type definitions

pub mod coordinates;
pub mod depot;
pub mod job;
pub mod messages;
pub mod route;
pub mod stop;
pub mod traffic;
pub mod vehicle;

pub use coordinates::*;
pub use depot::*;
pub use job::*;
pub use messages::*;
pub use route::*;
pub use stop::*;
pub use traffic::*;
pub use vehicle::*;
