//! Request / response models

pub mod requests;
pub mod traffic;

pub use requests::*;
pub use traffic::*;
