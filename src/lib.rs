pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod services;
pub mod storage;

#[cfg(test)]
mod test;
