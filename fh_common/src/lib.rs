mod price;

pub mod helpers;
mod secret;

pub use price::{Price, PriceConversionError};
pub use secret::Secret;
