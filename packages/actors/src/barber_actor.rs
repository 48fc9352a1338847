//! Barber actor: the long-lived service loop.

use std::time::Duration;

use ractor::rpc::CallResult;
use ractor::{Actor, ActorProcessingErr, ActorRef};
use shop_core::{BarberId, CustomerId};
use tokio_util::sync::CancellationToken;

use crate::messages::{BarberMessage, ShopMessage};

/// State for a barber actor.
pub struct BarberActorState {
    barber: BarberId,
    shop: ActorRef<ShopMessage>,
    cut_time: Duration,
    cancel: CancellationToken,
}

/// Barber actor arguments.
pub struct BarberArgs {
    pub barber: BarberId,
    pub shop: ActorRef<ShopMessage>,
    /// How long one cut takes.
    pub cut_time: Duration,
    /// Cooperative shutdown signal, honored while the chair is empty.
    pub cancel: CancellationToken,
}

/// Barber actor that repeatedly serves customers until cancelled.
pub struct BarberActor;

impl Actor for BarberActor {
    type Msg = BarberMessage;
    type State = BarberActorState;
    type Arguments = BarberArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("starting {}", args.barber);

        // Kick off the service loop.
        myself.send_message(BarberMessage::Tend)?;

        Ok(BarberActorState {
            barber: args.barber,
            shop: args.shop,
            cut_time: args.cut_time,
            cancel: args.cancel,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            BarberMessage::Tend => {
                let barber = state.barber;

                // Sleep until a customer lands in the chair. Cancellation is
                // only honored here: once a customer is assigned, the cut and
                // the payment handshake always run to completion, so no
                // admitted customer is ever abandoned.
                let customer: CustomerId = tokio::select! {
                    _ = state.cancel.cancelled() => {
                        tracing::info!("{} goes home", barber);
                        myself.stop(None);
                        return Ok(());
                    }
                    result = ractor::rpc::call(
                        &state.shop,
                        |reply| ShopMessage::NextCustomer { barber, reply },
                        None,
                    ) => {
                        match result {
                            Ok(CallResult::Success(customer)) => customer,
                            // The shop is gone; nothing left to tend.
                            _ => {
                                myself.stop(None);
                                return Ok(());
                            }
                        }
                    }
                };

                tracing::debug!("{} cutting hair for {}", barber, customer);
                tokio::time::sleep(state.cut_time).await;

                // Report the cut done and wait to be paid. The customer
                // always pays, so this wait is bounded.
                let result = ractor::rpc::call(
                    &state.shop,
                    |reply| ShopMessage::FinishCut { barber, reply },
                    None,
                )
                .await;
                if !matches!(result, Ok(CallResult::Success(()))) {
                    myself.stop(None);
                    return Ok(());
                }

                myself.send_message(BarberMessage::Tend)?;
            }
        }

        Ok(())
    }
}
