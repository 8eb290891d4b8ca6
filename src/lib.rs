// src/lib.rs — CopyBloom library root

pub mod cli;
pub mod generate;
pub mod infra;
pub mod provider;
pub mod quality;
pub mod store;
