pub mod app;
pub mod azure;
pub mod config;
pub mod events;
pub mod import;
pub mod logging;
pub mod session;
pub mod table;
pub mod ui;
