pub mod lab;
pub mod types;
