//! Browser-based capture of authentication artifacts.

pub mod server;

pub use server::AuthServer;
