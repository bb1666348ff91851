pub mod limits;
pub mod models;

pub use limits::*;
pub use models::*;
