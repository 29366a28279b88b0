//! Multi-tenant media drive: per-user file/folder trees whose bytes live on
//! an image CDN, with star, trash and folder-upload reconstruction.

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod media;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
