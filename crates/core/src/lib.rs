#![deny(warnings)]

pub mod companion;
pub mod config;
pub mod crisis;
pub mod emotion;
pub mod respond;
pub mod session;
pub mod util;
