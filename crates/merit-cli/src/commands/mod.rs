pub mod completions;
pub mod plan;
pub mod serve;
