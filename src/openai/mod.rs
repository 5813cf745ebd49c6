pub mod client;
pub mod shape;
