pub mod concentration;
pub mod follow_on;
pub mod portfolio;
pub mod windowing;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use portfolio::Portfolio;
