//! Event types for observing the shop's coordination protocol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BarberId, CustomerId};

/// Which kind of actor an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Customer,
    Barber,
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorKind::Customer => write!(f, "customer"),
            ActorKind::Barber => write!(f, "barber"),
        }
    }
}

/// Events emitted by the shop for every observable protocol transition.
///
/// The event stream replaces console printing: each event carries the acting
/// actor's kind and id plus a human-readable description, so observers can
/// assert on ordering without parsing text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ShopEvent {
    // Customer events
    /// A customer found the waiting area and every barber full and left.
    CustomerTurnedAway {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },
    /// A customer took a waiting chair.
    CustomerTookChair {
        customer: CustomerId,
        chairs_left: usize,
        timestamp: DateTime<Utc>,
    },
    /// A customer moved to a barber's service chair.
    CustomerSeated {
        customer: CustomerId,
        barber: BarberId,
        chairs_left: usize,
        timestamp: DateTime<Utc>,
    },
    /// A customer is waiting for their cut to be finished.
    CustomerAwaitingCut {
        customer: CustomerId,
        barber: BarberId,
        timestamp: DateTime<Utc>,
    },
    /// A customer paid and said good-bye to the barber.
    CustomerPaid {
        customer: CustomerId,
        barber: BarberId,
        timestamp: DateTime<Utc>,
    },

    // Barber events
    /// A barber went to sleep because no customers were around.
    BarberSleeping {
        barber: BarberId,
        timestamp: DateTime<Utc>,
    },
    /// A barber started cutting a customer's hair.
    CutStarted {
        barber: BarberId,
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },
    /// A barber finished a cut and is waiting to be paid.
    CutFinished {
        barber: BarberId,
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },
    /// A paid barber called in the next customer.
    BarberCalling {
        barber: BarberId,
        timestamp: DateTime<Utc>,
    },
}

impl ShopEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ShopEvent::CustomerTurnedAway { timestamp, .. } => *timestamp,
            ShopEvent::CustomerTookChair { timestamp, .. } => *timestamp,
            ShopEvent::CustomerSeated { timestamp, .. } => *timestamp,
            ShopEvent::CustomerAwaitingCut { timestamp, .. } => *timestamp,
            ShopEvent::CustomerPaid { timestamp, .. } => *timestamp,
            ShopEvent::BarberSleeping { timestamp, .. } => *timestamp,
            ShopEvent::CutStarted { timestamp, .. } => *timestamp,
            ShopEvent::CutFinished { timestamp, .. } => *timestamp,
            ShopEvent::BarberCalling { timestamp, .. } => *timestamp,
        }
    }

    /// Which kind of actor this event belongs to.
    pub fn actor(&self) -> ActorKind {
        match self {
            ShopEvent::CustomerTurnedAway { .. }
            | ShopEvent::CustomerTookChair { .. }
            | ShopEvent::CustomerSeated { .. }
            | ShopEvent::CustomerAwaitingCut { .. }
            | ShopEvent::CustomerPaid { .. } => ActorKind::Customer,
            ShopEvent::BarberSleeping { .. }
            | ShopEvent::CutStarted { .. }
            | ShopEvent::CutFinished { .. }
            | ShopEvent::BarberCalling { .. } => ActorKind::Barber,
        }
    }

    /// The id of the acting actor.
    pub fn actor_id(&self) -> u64 {
        match self {
            ShopEvent::CustomerTurnedAway { customer, .. }
            | ShopEvent::CustomerTookChair { customer, .. }
            | ShopEvent::CustomerSeated { customer, .. }
            | ShopEvent::CustomerAwaitingCut { customer, .. }
            | ShopEvent::CustomerPaid { customer, .. } => customer.0 as u64,
            ShopEvent::BarberSleeping { barber, .. }
            | ShopEvent::CutStarted { barber, .. }
            | ShopEvent::CutFinished { barber, .. }
            | ShopEvent::BarberCalling { barber, .. } => barber.0 as u64,
        }
    }

    /// The customer this event concerns, if any.
    pub fn customer(&self) -> Option<CustomerId> {
        match self {
            ShopEvent::CustomerTurnedAway { customer, .. }
            | ShopEvent::CustomerTookChair { customer, .. }
            | ShopEvent::CustomerSeated { customer, .. }
            | ShopEvent::CustomerAwaitingCut { customer, .. }
            | ShopEvent::CustomerPaid { customer, .. }
            | ShopEvent::CutStarted { customer, .. }
            | ShopEvent::CutFinished { customer, .. } => Some(*customer),
            ShopEvent::BarberSleeping { .. } | ShopEvent::BarberCalling { .. } => None,
        }
    }

    /// The barber this event concerns, if any.
    pub fn barber(&self) -> Option<BarberId> {
        match self {
            ShopEvent::CustomerSeated { barber, .. }
            | ShopEvent::CustomerAwaitingCut { barber, .. }
            | ShopEvent::CustomerPaid { barber, .. }
            | ShopEvent::BarberSleeping { barber, .. }
            | ShopEvent::CutStarted { barber, .. }
            | ShopEvent::CutFinished { barber, .. }
            | ShopEvent::BarberCalling { barber, .. } => Some(*barber),
            ShopEvent::CustomerTurnedAway { .. } | ShopEvent::CustomerTookChair { .. } => None,
        }
    }

    /// The acting actor's message, without the actor prefix.
    pub fn description(&self) -> String {
        match self {
            ShopEvent::CustomerTurnedAway { .. } => {
                "leaves the shop because of no available waiting chairs".to_string()
            }
            ShopEvent::CustomerTookChair { chairs_left, .. } => {
                format!("takes a waiting chair, {} chairs left", chairs_left)
            }
            ShopEvent::CustomerSeated {
                barber,
                chairs_left,
                ..
            } => format!(
                "moves to the service chair of {}, {} chairs left",
                barber, chairs_left
            ),
            ShopEvent::CustomerAwaitingCut { .. } => {
                "waits for the hair-cut to be done".to_string()
            }
            ShopEvent::CustomerPaid { barber, .. } => {
                format!("pays and says good-bye to {}", barber)
            }
            ShopEvent::BarberSleeping { .. } => "sleeps because of no customers".to_string(),
            ShopEvent::CutStarted { customer, .. } => {
                format!("starts a hair-cut service for {}", customer)
            }
            ShopEvent::CutFinished { customer, .. } => {
                format!("is done with the hair-cut service for {}", customer)
            }
            ShopEvent::BarberCalling { .. } => "calls in another customer".to_string(),
        }
    }
}

impl std::fmt::Display for ShopEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}]: {}",
            self.actor(),
            self.actor_id(),
            self.description()
        )
    }
}
