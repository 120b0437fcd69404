// Tree assembly and output formats
pub mod builder;
pub mod serialization;

pub use builder::{ParsedQuestion, TreeBuilder};
