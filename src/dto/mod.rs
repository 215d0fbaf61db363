//! DTO modules that bridge services with templates and the backend API.

pub mod api;
pub mod screen;
