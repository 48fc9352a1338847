//! Shop actor: the single coordination domain of the barbershop.
//!
//! All shared state (waiting chairs, barber slots, counters) lives inside
//! this actor, so every protocol transition executes one at a time. Callers
//! that must wait do so by having their reply port parked in the state;
//! firing a parked port is the wake-up.

use std::collections::VecDeque;

use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use shop_core::{Admission, BarberId, CustomerId, ShopConfig, ShopEvent, ShopStats};
use tokio::sync::broadcast;

use crate::messages::ShopMessage;

/// Per-barber slot record.
#[derive(Debug, Default)]
struct BarberSlot {
    /// Customer in this barber's chair, if any.
    occupant: Option<CustomerId>,
    /// True while the cut is in progress.
    in_service: bool,
    /// True between payment and hand-off to the next customer.
    paid: bool,
    /// Barber parked in `NextCustomer`, waiting for an assignment.
    dozing: Option<RpcReplyPort<CustomerId>>,
    /// Customer parked in `AwaitCut` until the cut is finished.
    cut_done: Option<RpcReplyPort<()>>,
    /// Barber parked in `FinishCut` until the customer has paid.
    settle: Option<RpcReplyPort<()>>,
}

/// A customer in the waiting area, with their suspended check-in.
#[derive(Debug)]
struct WaitingCustomer {
    customer: CustomerId,
    admission: RpcReplyPort<Admission>,
}

/// State for the shop actor.
pub struct ShopActorState {
    config: ShopConfig,
    slots: Vec<BarberSlot>,
    /// Waiting customers in arrival order. Never longer than `config.chairs`.
    waiting: VecDeque<WaitingCustomer>,
    dropped: u64,
    served: u64,
    /// Event broadcaster.
    event_tx: Option<broadcast::Sender<ShopEvent>>,
}

impl ShopActorState {
    /// Create state for a shop with the given configuration.
    pub fn new(config: ShopConfig) -> Self {
        let slots = (0..config.barbers).map(|_| BarberSlot::default()).collect();
        Self {
            config,
            slots,
            waiting: VecDeque::new(),
            dropped: 0,
            served: 0,
            event_tx: None,
        }
    }

    /// Set the event broadcaster.
    pub fn with_event_tx(mut self, tx: broadcast::Sender<ShopEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Broadcast an event.
    fn emit(&self, event: ShopEvent) {
        tracing::debug!("{}", event);
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    fn chairs_left(&self) -> usize {
        self.config.chairs - self.waiting.len()
    }

    /// Index of a slot with no occupant, if any.
    fn idle_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.occupant.is_none())
    }

    /// Index of the slot currently holding this customer, if any.
    fn slot_of(&self, customer: CustomerId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.occupant == Some(customer))
    }

    fn stats(&self) -> ShopStats {
        ShopStats {
            waiting: self.waiting.len(),
            dropped: self.dropped,
            served: self.served,
        }
    }

    /// Seat a customer in slot `index` and start service.
    ///
    /// If the barber is dozing, this fires the targeted wake-up; only the
    /// assigned barber is disturbed.
    fn seat(&mut self, index: usize, customer: CustomerId) {
        let barber = BarberId(index);
        self.slots[index].occupant = Some(customer);
        self.slots[index].in_service = true;
        self.emit(ShopEvent::CustomerSeated {
            customer,
            barber,
            chairs_left: self.chairs_left(),
            timestamp: Utc::now(),
        });

        if let Some(dozing) = self.slots[index].dozing.take() {
            self.emit(ShopEvent::CutStarted {
                barber,
                customer,
                timestamp: Utc::now(),
            });
            let _ = dozing.send(customer);
        }
    }

    /// Record payment for slot `index` and hand the chair over.
    ///
    /// Fires the customer's completion wait and the barber's payment wait,
    /// then promotes the head of the queue straight into the freed chair so
    /// the barber never takes a second nap between customers.
    fn settle_up(
        &mut self,
        index: usize,
        customer: CustomerId,
        cut_done: RpcReplyPort<()>,
        settle: RpcReplyPort<()>,
    ) {
        let barber = BarberId(index);

        self.slots[index].paid = true;
        self.served += 1;
        self.emit(ShopEvent::CustomerPaid {
            customer,
            barber,
            timestamp: Utc::now(),
        });
        let _ = cut_done.send(());
        let _ = settle.send(());

        self.slots[index].occupant = None;
        self.slots[index].paid = false;
        self.emit(ShopEvent::BarberCalling {
            barber,
            timestamp: Utc::now(),
        });

        if let Some(next) = self.waiting.pop_front() {
            self.seat(index, next.customer);
            let _ = next.admission.send(Admission::Seated { barber });
        }
    }
}

/// Shop actor owning all coordination state.
pub struct ShopActor;

impl Actor for ShopActor {
    type Msg = ShopMessage;
    type State = ShopActorState;
    type Arguments = ShopActorState;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            barbers = args.config.barbers,
            chairs = args.config.chairs,
            "opening the shop"
        );
        Ok(args)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            ShopMessage::CheckIn { customer, reply } => {
                // A customer id lives in exactly one place at a time.
                if state.slot_of(customer).is_some()
                    || state.waiting.iter().any(|w| w.customer == customer)
                {
                    return Err(format!("{} checked in while already in the shop", customer).into());
                }

                if let Some(index) = state.idle_slot() {
                    // Direct assignment: an idle barber means the queue is
                    // bypassed, even when every waiting chair is taken.
                    let barber = BarberId(index);
                    state.seat(index, customer);
                    let _ = reply.send(Admission::Seated { barber });
                } else if state.waiting.len() < state.config.chairs {
                    state.emit(ShopEvent::CustomerTookChair {
                        customer,
                        chairs_left: state.chairs_left() - 1,
                        timestamp: Utc::now(),
                    });
                    // Park the reply; a freed barber fires it on promotion.
                    state.waiting.push_back(WaitingCustomer {
                        customer,
                        admission: reply,
                    });
                } else {
                    state.dropped += 1;
                    state.emit(ShopEvent::CustomerTurnedAway {
                        customer,
                        timestamp: Utc::now(),
                    });
                    let _ = reply.send(Admission::TurnedAway);
                }
            }

            ShopMessage::AwaitCut { customer, reply } => {
                let Some(index) = state.slot_of(customer) else {
                    return Err(format!("{} awaits a cut but occupies no chair", customer).into());
                };
                let barber = BarberId(index);
                state.emit(ShopEvent::CustomerAwaitingCut {
                    customer,
                    barber,
                    timestamp: Utc::now(),
                });

                if state.slots[index].in_service {
                    if state.slots[index].cut_done.is_some() {
                        return Err(format!("{} awaits the same cut twice", customer).into());
                    }
                    state.slots[index].cut_done = Some(reply);
                } else {
                    // The cut already finished; the barber is parked waiting
                    // for payment. Settle both waits in one transition.
                    let Some(settle) = state.slots[index].settle.take() else {
                        return Err(format!("{} is out of service but not awaiting payment", barber).into());
                    };
                    state.settle_up(index, customer, reply, settle);
                }
            }

            ShopMessage::NextCustomer { barber, reply } => {
                let index = barber.0;
                if index >= state.slots.len() {
                    return Err(format!("unknown {} asked for a customer", barber).into());
                }
                if state.slots[index].dozing.is_some() {
                    return Err(format!("{} asked for a customer twice", barber).into());
                }

                match state.slots[index].occupant {
                    // Assignment won the race; start cutting right away.
                    Some(customer) => {
                        state.emit(ShopEvent::CutStarted {
                            barber,
                            customer,
                            timestamp: Utc::now(),
                        });
                        let _ = reply.send(customer);
                    }
                    None => {
                        state.emit(ShopEvent::BarberSleeping {
                            barber,
                            timestamp: Utc::now(),
                        });
                        state.slots[index].dozing = Some(reply);
                    }
                }
            }

            ShopMessage::FinishCut { barber, reply } => {
                let index = barber.0;
                if index >= state.slots.len() {
                    return Err(format!("unknown {} finished a cut", barber).into());
                }
                let Some(customer) = state.slots[index].occupant else {
                    return Err(format!("{} finished a cut for an empty chair", barber).into());
                };
                if !state.slots[index].in_service {
                    return Err(format!("{} finished the same cut twice", barber).into());
                }
                if state.slots[index].paid {
                    return Err(format!("{} was paid before the cut finished", barber).into());
                }

                state.slots[index].in_service = false;
                state.slots[index].paid = false;
                state.emit(ShopEvent::CutFinished {
                    barber,
                    customer,
                    timestamp: Utc::now(),
                });

                match state.slots[index].cut_done.take() {
                    // The customer is already waiting: record payment and
                    // hand the chair over now.
                    Some(cut_done) => state.settle_up(index, customer, cut_done, reply),
                    // Park the barber until the customer shows up to pay.
                    None => state.slots[index].settle = Some(reply),
                }
            }

            ShopMessage::GetStats { reply } => {
                let _ = reply.send(state.stats());
            }

            ShopMessage::Shutdown => {
                tracing::info!(
                    served = state.served,
                    dropped = state.dropped,
                    "closing the shop"
                );
                myself.stop(None);
            }
        }

        Ok(())
    }
}
