mod codec;
mod error;
mod text;

pub use codec::ALPHABET;
pub(crate) use codec::*;
pub use error::*;
pub use text::*;
