//! Message types for actor communication.

use ractor::rpc::CallResult;
use ractor::{ActorRef, RpcReplyPort};
use shop_core::{Admission, BarberId, CustomerId, ShopStats};

/// Messages for the ShopActor.
///
/// Every blocking operation of the protocol is a request carrying an
/// [`RpcReplyPort`]; the shop holds the port until the awaited condition
/// holds, so a pending reply is the message-passing equivalent of a
/// monitor wait.
#[derive(Debug)]
pub enum ShopMessage {
    /// A customer asks to be admitted for a cut.
    ///
    /// Replies immediately with `TurnedAway` or a direct seating; for a
    /// customer who takes a waiting chair, the reply fires only once a
    /// freed barber picks them from the front of the queue.
    CheckIn {
        customer: CustomerId,
        reply: RpcReplyPort<Admission>,
    },

    /// A seated customer waits for their cut to be done.
    ///
    /// The reply fires once the cut is finished and the payment has been
    /// recorded, after which the customer departs.
    AwaitCut {
        customer: CustomerId,
        reply: RpcReplyPort<()>,
    },

    /// A barber asks for the next customer, sleeping until one is assigned.
    NextCustomer {
        barber: BarberId,
        reply: RpcReplyPort<CustomerId>,
    },

    /// A barber reports the cut finished.
    ///
    /// The reply fires once the customer has paid and the chair has been
    /// handed over, freeing the barber for another round.
    FinishCut {
        barber: BarberId,
        reply: RpcReplyPort<()>,
    },

    /// Snapshot the shop's counters.
    GetStats { reply: RpcReplyPort<ShopStats> },

    /// Close the shop.
    Shutdown,
}

/// Messages for the BarberActor.
#[derive(Debug)]
pub enum BarberMessage {
    /// Serve the next customer, then schedule another round.
    Tend,
}

/// Error type for shop operations.
///
/// Protocol outcomes (a turned-away customer) are never errors; these only
/// surface when the shop itself has gone away under a caller.
#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    #[error("shop is closed")]
    Closed,

    #[error("messaging error: {0}")]
    Messaging(String),
}

/// Issue a request to the shop and wait for its reply.
pub(crate) async fn call_shop<TReply, F>(
    shop: &ActorRef<ShopMessage>,
    request: F,
) -> Result<TReply, ShopError>
where
    TReply: Send + 'static,
    F: FnOnce(RpcReplyPort<TReply>) -> ShopMessage,
{
    match ractor::rpc::call(shop, request, None).await {
        Ok(CallResult::Success(value)) => Ok(value),
        // The shop dropped our reply port or stopped mid-request.
        Ok(_) => Err(ShopError::Closed),
        Err(e) => Err(ShopError::Messaging(e.to_string())),
    }
}
