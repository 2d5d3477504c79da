pub mod business;
pub mod cleanup;
pub mod cleanup_scheduler;
pub mod client;
pub mod expiry;
pub mod follow;
pub mod menu;
pub mod metrics;
pub mod promotion;
pub mod qr_code;
pub mod redemption;
pub mod reservation;

#[cfg(test)]
pub(crate) mod fixtures;
