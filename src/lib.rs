pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod controllers;
pub mod editor;
pub mod error;
pub mod guard;
pub mod models;
pub mod notify;
pub mod session;

#[cfg(test)]
pub mod testing;
