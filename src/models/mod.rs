// src/models/mod.rs
pub mod auth;
pub mod checkin;
pub mod disclosure;
pub mod driver;
pub mod fare;
pub mod navigation;
pub mod safety;
pub mod trip;
pub mod wallet;

pub use checkin::*;
pub use disclosure::*;
pub use driver::*;
pub use fare::*;
pub use trip::*;
pub use wallet::*;
