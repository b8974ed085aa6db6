pub mod calculator;
pub mod catalog;
pub mod clock;
pub mod feed;
