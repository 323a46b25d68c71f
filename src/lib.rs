// src/lib.rs

// module declarations
pub mod alias;
pub mod config;
pub mod cors;
pub mod errors;
pub mod server;

// re-exports
pub use alias::*;
pub use config::*;
pub use cors::*;
pub use errors::*;
pub use server::*;
