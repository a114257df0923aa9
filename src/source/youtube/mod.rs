pub mod common;
pub mod finder;
pub mod live;
