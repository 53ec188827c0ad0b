//! trackfit CLI library.
//!
//! This crate provides the core functionality for the trackfit CLI,
//! including job loading, mood presets, ffmpeg helpers and the commands.

pub mod commands;
pub mod job;
pub mod logging;
pub mod media;
pub mod mood;
pub mod pipeline;
