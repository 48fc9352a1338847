//! Customer flow: one check-in, one cut, one payment, never a retry.

use ractor::ActorRef;
use shop_core::{Admission, CustomerId, VisitOutcome};

use crate::messages::{ShopError, ShopMessage, call_shop};

/// Run one customer's visit from arrival to departure.
///
/// A turned-away visit is a normal outcome, not an error; `Err` means the
/// shop itself went away mid-visit. The call suspends while the customer is
/// in a waiting chair and again while the cut is in progress.
pub async fn visit(
    shop: &ActorRef<ShopMessage>,
    customer: CustomerId,
) -> Result<VisitOutcome, ShopError> {
    let admission = call_shop(shop, |reply| ShopMessage::CheckIn { customer, reply }).await?;

    let barber = match admission {
        Admission::TurnedAway => return Ok(VisitOutcome::TurnedAway),
        Admission::Seated { barber } => barber,
    };

    // Wait out the cut; the reply fires once payment has been recorded.
    call_shop(shop, |reply| ShopMessage::AwaitCut { customer, reply }).await?;

    Ok(VisitOutcome::Served { barber })
}
