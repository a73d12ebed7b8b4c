// DTO layer - request/response objects for the HTTP API
pub mod auth;
pub mod common;
pub mod dish;
pub mod family;
pub mod ingredient;
pub mod menu;
