#[macro_use]
extern crate serde;

#[macro_use]
extern crate lazy_static;

mod ballot;
pub mod canonical;
mod credential;
mod election;
mod error;
mod generate;
mod group;
pub mod hash;
pub mod proof;
mod registry;
pub mod signature;
mod verify;

pub use ballot::*;
pub use credential::*;
pub use election::*;
pub use error::*;
pub use generate::*;
pub use group::*;
pub use registry::*;
pub use verify::*;
