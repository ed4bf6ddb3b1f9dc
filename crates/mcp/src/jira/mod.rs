//! JIRA tool server.

mod core;
pub mod schemas;
mod tools;

pub use core::JiraMcpCore;
