//! Core types shared by the preview front ends

pub mod config;

pub use config::PreviewConfig;
