pub mod market;
pub mod price;
pub mod ratio;
pub mod summary;
pub mod transfer;
pub mod whale;

pub use market::*;
pub use price::*;
pub use ratio::*;
pub use summary::*;
pub use transfer::*;
pub use whale::*;
