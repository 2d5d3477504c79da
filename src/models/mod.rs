pub mod auth;
pub mod business;
pub mod client;
pub mod follow;
pub mod menu;
pub mod promotion;
pub mod qr_code;
pub mod redemption;
pub mod user;
