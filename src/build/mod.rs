mod driver;
pub mod generators;

pub use driver::{BuildDriver, DriverState};
