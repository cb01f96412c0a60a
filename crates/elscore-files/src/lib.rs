pub mod dir;

pub use dir::{read_linking, SystemDir};
