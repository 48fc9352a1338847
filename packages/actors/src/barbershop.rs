//! Barbershop facade: opens the shop, staffs it, and closes it down.

use std::time::Duration;

use ractor::{Actor, ActorRef};
use shop_core::{BarberId, CustomerId, ShopConfig, ShopEvent, ShopStats, VisitOutcome};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::barber_actor::{BarberActor, BarberArgs};
use crate::customer;
use crate::messages::{ShopError, ShopMessage, call_shop};
use crate::shop_actor::{ShopActor, ShopActorState};

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Sequence for unique actor names; ractor's registry is process-wide.
static SHOP_SEQ: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// A running barbershop: one shop actor plus its barber actors.
pub struct Barbershop {
    shop: ActorRef<ShopMessage>,
    event_tx: broadcast::Sender<ShopEvent>,
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Barbershop {
    /// Open a shop and staff it with `config.barbers` barbers, each taking
    /// `cut_time` per customer.
    pub async fn open(config: ShopConfig, cut_time: Duration) -> Result<Self, ShopError> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let seq = SHOP_SEQ.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let state = ShopActorState::new(config).with_event_tx(event_tx.clone());
        let (shop, shop_handle) = Actor::spawn(Some(format!("shop-{}", seq)), ShopActor, state)
            .await
            .map_err(|e| ShopError::Messaging(e.to_string()))?;

        let mut handles = vec![shop_handle];
        for i in 0..config.barbers {
            let args = BarberArgs {
                barber: BarberId(i),
                shop: shop.clone(),
                cut_time,
                cancel: cancel.clone(),
            };
            let (_, handle) =
                Actor::spawn(Some(format!("shop-{}-barber-{}", seq, i)), BarberActor, args)
                    .await
                    .map_err(|e| ShopError::Messaging(e.to_string()))?;
            handles.push(handle);
        }

        Ok(Self {
            shop,
            event_tx,
            cancel,
            handles,
        })
    }

    /// The shop actor, for callers driving the protocol directly.
    pub fn shop(&self) -> &ActorRef<ShopMessage> {
        &self.shop
    }

    /// Subscribe to the shop's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ShopEvent> {
        self.event_tx.subscribe()
    }

    /// Run one customer visit against this shop.
    pub async fn visit(&self, customer: CustomerId) -> Result<VisitOutcome, ShopError> {
        customer::visit(&self.shop, customer).await
    }

    /// Snapshot of the shop's counters.
    pub async fn stats(&self) -> Result<ShopStats, ShopError> {
        call_shop(&self.shop, |reply| ShopMessage::GetStats { reply }).await
    }

    /// Customers turned away since the shop opened.
    pub async fn dropped_count(&self) -> Result<u64, ShopError> {
        Ok(self.stats().await?.dropped)
    }

    /// Close the shop: send the barbers home, stop the shop actor and wait
    /// for everything to wind down.
    ///
    /// Call this only after all submitted customers have departed; barbers
    /// mid-cut finish their current customer before leaving.
    pub async fn close(self) -> Result<(), ShopError> {
        self.cancel.cancel();
        self.shop
            .send_message(ShopMessage::Shutdown)
            .map_err(|e| ShopError::Messaging(e.to_string()))?;

        for handle in self.handles {
            let _ = handle.await;
        }
        Ok(())
    }
}
