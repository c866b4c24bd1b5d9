pub mod config;
pub mod error;
pub mod grading_server;
pub mod parser;
pub mod prompt;
pub mod service;
pub mod structs;
pub mod upstream;
pub mod utils;
pub mod validator;
pub mod webserver;
