pub mod homepage;
pub mod question;
pub mod quiz;
