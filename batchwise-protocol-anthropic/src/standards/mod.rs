//! Protocol standards

pub mod anthropic;
