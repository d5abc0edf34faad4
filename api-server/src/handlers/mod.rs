//! HTTP handlers

pub mod health;
pub mod status;
pub mod analysis;
pub mod demo;
