#[cfg(test)]
pub mod mock;
pub mod page;
pub mod youtube;
