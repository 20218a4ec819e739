//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types shared by layout and camera code
//! - Handle-based collections for back-end resources
//! - Logging setup

pub mod math;
pub mod collections;
pub mod logging;
