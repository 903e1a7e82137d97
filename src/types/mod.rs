pub mod price;
pub mod signals;

pub use price::*;
pub use signals::*;
