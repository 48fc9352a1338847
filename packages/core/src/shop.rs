//! Shop domain types: identifiers, configuration and outcomes.

use serde::{Deserialize, Serialize};

/// Number of barbers used when a shop is opened with zero barbers.
pub const DEFAULT_BARBERS: usize = 1;

/// Number of waiting chairs used when a shop is opened with zero chairs.
pub const DEFAULT_CHAIRS: usize = 3;

/// Unique identifier for a customer within one simulation run.
///
/// Customer ids are ephemeral: assigned on arrival, removed from all shop
/// state once the customer departs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u32);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "customer[{}]", self.0)
    }
}

/// Identifier for a barber, an index into the shop's barber slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarberId(pub usize);

impl std::fmt::Display for BarberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "barber[{}]", self.0)
    }
}

/// Configuration for a shop, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Number of barber slots.
    pub barbers: usize,
    /// Waiting-area capacity.
    pub chairs: usize,
}

impl ShopConfig {
    /// Create a shop configuration.
    ///
    /// The constructor is forgiving: a zero barber count falls back to
    /// [`DEFAULT_BARBERS`] and a zero chair count to [`DEFAULT_CHAIRS`].
    pub fn new(barbers: usize, chairs: usize) -> Self {
        Self {
            barbers: if barbers == 0 { DEFAULT_BARBERS } else { barbers },
            chairs: if chairs == 0 { DEFAULT_CHAIRS } else { chairs },
        }
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BARBERS, DEFAULT_CHAIRS)
    }
}

/// Outcome of a customer's check-in request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "admission", rename_all = "snake_case")]
pub enum Admission {
    /// The customer has been placed in a barber's chair.
    Seated { barber: BarberId },
    /// Both the waiting area and every barber were full; the customer left.
    TurnedAway,
}

/// Terminal outcome of one customer's visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VisitOutcome {
    /// The customer was served and has paid.
    Served { barber: BarberId },
    /// The customer was turned away at the door.
    TurnedAway,
}

impl VisitOutcome {
    /// Whether this visit ended with a completed service.
    pub fn is_served(&self) -> bool {
        matches!(self, VisitOutcome::Served { .. })
    }
}

/// Snapshot of a shop's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopStats {
    /// Customers currently occupying waiting chairs.
    pub waiting: usize,
    /// Customers turned away since the shop opened. Monotonic.
    pub dropped: u64,
    /// Customers that departed after paying. Monotonic.
    pub served: u64,
}

impl ShopStats {
    /// Total customers whose visit has reached a terminal outcome.
    pub fn outcomes(&self) -> u64 {
        self.served + self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sizes_fall_back_to_defaults() {
        let config = ShopConfig::new(0, 0);
        assert_eq!(config.barbers, DEFAULT_BARBERS);
        assert_eq!(config.chairs, DEFAULT_CHAIRS);

        let config = ShopConfig::new(4, 2);
        assert_eq!(config.barbers, 4);
        assert_eq!(config.chairs, 2);
    }
}
