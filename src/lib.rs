pub mod api;
pub mod cancel;
pub mod config;
pub mod error;
pub mod feed;
pub mod format;
pub mod generator;
pub mod html;
pub mod loader;
pub mod logging;
pub mod tui;
pub mod types;
pub mod view;
pub mod web;
