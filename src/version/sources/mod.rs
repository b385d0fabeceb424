//! Tag source implementations

pub mod git_command;
pub mod refs;
pub mod smart_http;

pub use git_command::GitCommandSource;
pub use smart_http::SmartHttpSource;
