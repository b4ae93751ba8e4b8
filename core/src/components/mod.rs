pub mod generator;
pub mod server;
