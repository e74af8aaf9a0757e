#[cfg(feature = "zip")]
extern crate zip;

pub mod error;
pub mod frontend;
#[cfg(target_arch = "wasm32")]
mod js;
pub mod k7;
pub mod keybuf;
pub mod keymap;
pub mod pulse;

pub use error::TapeError;
pub use k7::{decode, encode, TapeBuffer};
