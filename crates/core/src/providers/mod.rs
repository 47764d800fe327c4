pub mod proxy;
pub mod traits;
