mod layout;

pub mod homepage;
pub mod question;
pub mod quiz;

pub use layout::{page, render, titled};
