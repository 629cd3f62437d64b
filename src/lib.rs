#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod config;
pub mod filesystem;
pub mod game;
pub mod interpreter;
pub mod output;
pub mod session;
