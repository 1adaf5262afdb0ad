pub mod checksum;
pub mod commands;
pub mod error;
pub mod http;
pub mod installer;
pub mod manifest;
pub mod platform;
pub mod runtime;
