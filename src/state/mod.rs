/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The deck configuration file (config.rs)
/// - The card queue and its rendered layers (deck.rs)

pub mod config;
pub mod data;
pub mod deck;
