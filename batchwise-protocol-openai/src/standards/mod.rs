//! Protocol standards

pub mod openai;
