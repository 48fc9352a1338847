//! Core domain types for the barbershop coordination system.
//!
//! This crate contains shared types used across all packages:
//! - Customer and barber identifiers
//! - Shop configuration, admission outcomes and statistics
//! - Events for observing the coordination protocol

mod events;
mod shop;

pub use events::{ActorKind, ShopEvent};
pub use shop::{
    Admission, BarberId, CustomerId, DEFAULT_BARBERS, DEFAULT_CHAIRS, ShopConfig, ShopStats,
    VisitOutcome,
};
