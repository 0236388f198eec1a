pub mod serve;
pub mod server;
