pub mod guard;
pub mod lifecycle;
pub mod notify;
pub mod submit;
pub mod types;
