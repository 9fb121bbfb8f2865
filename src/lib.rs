//! bucket-bot - a channel bot that serves and collects quotes in named buckets

pub mod application;
pub mod domain;
pub mod infrastructure;
