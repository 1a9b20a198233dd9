//! Command handlers

pub mod config;
pub mod link;
pub mod profile;
pub mod social;
pub mod status;
