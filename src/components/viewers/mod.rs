pub mod body;
pub mod cookies;
pub mod headers;
pub mod timeline;
