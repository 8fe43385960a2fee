pub mod account;
pub mod common;
pub mod meroshare;
pub mod share;
