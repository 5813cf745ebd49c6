pub mod audit;
pub mod bridge;
pub mod chunk;
pub mod config;
pub mod framing;
pub mod markup;
pub mod paths;
pub mod pipeline;
pub mod session_cache;
pub mod types;
pub mod util;
