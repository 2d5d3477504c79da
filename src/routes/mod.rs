pub mod businesses;
pub mod cleanup;
pub mod clients;
pub mod follows;
pub mod health;
pub mod menu;
pub mod metrics;
pub mod promotions;
pub mod qr_codes;
pub mod redemptions;
pub mod reservations;
