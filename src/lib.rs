rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod check;
pub mod config;
pub mod deck;
pub mod event;
pub mod source;
pub mod store;
pub mod ui;
