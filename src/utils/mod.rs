pub mod dirs;
pub mod format;
pub mod http;
pub mod rate_limit;
