//! Cross-crate tests driving the engine client against a scripted
//! in-process engine.

#[cfg(test)]
mod helpers;

#[cfg(test)]
mod engine_tests;
