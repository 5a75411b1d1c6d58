// Library interface for blinknote modules
// This allows tests and the binary to import modules

pub mod cli;
pub mod client;
pub mod extraction;
pub mod gateway;
pub mod history;
pub mod llm;
pub mod prompt;
pub mod server;
pub mod summary;
