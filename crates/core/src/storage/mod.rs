pub mod backend;
pub mod manager;
pub mod transfer;
