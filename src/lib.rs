//! Cloud Registry Library
//!
//! An in-memory registry of document stores and virtual machines, with
//! disk and memory usage accounting and a small command-script language
//! for driving it.

pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod script;
