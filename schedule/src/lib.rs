pub mod board;
pub mod model;
pub mod store;
