pub mod config;
pub mod http;
pub mod i18n;
