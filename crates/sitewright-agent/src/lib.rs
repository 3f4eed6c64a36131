pub mod applier;
pub mod client;
pub mod config;
pub mod pipeline;
pub mod response_parser;
pub mod selector;
