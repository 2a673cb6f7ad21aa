pub mod aggregate;
pub mod app;
pub mod carousel;
pub mod config;
pub mod error;
pub mod models;
pub mod reviews;
pub mod tmdb;
pub mod view;
