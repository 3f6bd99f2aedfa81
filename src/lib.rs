pub mod adaptive;
pub mod config;
pub mod logging;
pub mod replay;
