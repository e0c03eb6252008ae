//! Cross-crate flows. Every role runs in this process on `127.0.0.1:0`.

#[cfg(test)]
mod support;

pub mod broker;
pub mod direct;
pub mod readiness;
