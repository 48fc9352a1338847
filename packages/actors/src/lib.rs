//! Actor system for the barbershop coordination problem.
//!
//! # Architecture
//!
//! - `ShopActor` - single event loop owning all shared state: waiting
//!   chairs, barber slots and the drop/served counters. Suspended callers
//!   are reply ports parked inside the state.
//! - `BarberActor` - long-lived service loop per barber, cancelled
//!   cooperatively at its idle point.
//! - `visit` - one-shot customer flow (check in, wait out the cut, pay).
//! - `Barbershop` - facade that opens, staffs and closes a shop.
//!
//! # Usage
//!
//! ```ignore
//! use shop_actors::Barbershop;
//! use shop_core::{CustomerId, ShopConfig};
//!
//! let shop = Barbershop::open(ShopConfig::new(2, 3), cut_time).await?;
//! let outcome = shop.visit(CustomerId(1)).await?;
//! shop.close().await?;
//! ```

mod barber_actor;
mod barbershop;
mod customer;
mod messages;
mod shop_actor;

pub use barber_actor::{BarberActor, BarberArgs};
pub use barbershop::Barbershop;
pub use customer::visit;
pub use messages::{BarberMessage, ShopError, ShopMessage};
pub use shop_actor::{ShopActor, ShopActorState};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
