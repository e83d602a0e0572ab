//! Melascope DX core: risk profiling and safety-constrained LLM advisories.
//!
//! Turns a classifier `(label, confidence)` pair into a deterministic
//! [`risk::RiskProfile`] and an advisory or chat reply generated under fixed
//! safety instructions. See [`advisory::Advisor`] for the entry point.

pub mod advisory;
pub mod classification;
pub mod config;
pub mod error;
pub mod gateway;
pub mod message;
pub mod prompt;
pub mod risk;
pub mod screen;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;
