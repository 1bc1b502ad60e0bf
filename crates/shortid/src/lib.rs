#![doc = include_str!("../README.md")]

mod broker;
mod candidate;
pub mod codec;
mod error;
mod length;
mod mutex;
mod rand;
mod registry;
mod scope;
mod time;

pub use crate::broker::*;
pub use crate::candidate::*;
pub use crate::codec::CodecError;
pub use crate::error::*;
pub use crate::length::*;
pub use crate::rand::*;
pub use crate::registry::*;
pub use crate::scope::*;
pub use crate::time::*;
