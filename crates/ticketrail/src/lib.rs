#![doc = include_str!("../README.md")]

mod allocator;
mod config;
mod error;
mod ledger;
mod types;


pub use crate::allocator::*;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::ledger::*;
pub use crate::types::*;
