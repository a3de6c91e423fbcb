//! Async front for the cart store.
//!
//! Mutations take the lock, apply, and release it. Checkout holds the lock
//! only to enter and to settle the pending phase; the network call runs
//! unlocked so reads and other mutations proceed while it is in flight.
//!
//! The submission and its settlement run on a spawned task, so a caller
//! that goes away mid-checkout (a dropped HTTP request) never strands the
//! cart in the loading phase.

use std::sync::Arc;
use std::time::Duration;

use shopfront_core::{CartAction, CartError, CartState, CartStorage, CartStore, CheckoutError};
use tokio::sync::Mutex;
use tracing::{Instrument, Span, error, info, instrument, warn};

use super::checkout::CheckoutSubmitter;

/// Shared cart: one store, one submitter, one checkout timeout.
#[derive(Debug)]
pub struct CartService<S, C> {
    store: Arc<Mutex<CartStore<S>>>,
    submitter: Arc<C>,
    checkout_timeout: Duration,
}

impl<S, C> CartService<S, C>
where
    S: CartStorage + Send + 'static,
    C: CheckoutSubmitter + 'static,
{
    /// Wrap `store`, submitting checkouts through `submitter`.
    pub fn new(store: CartStore<S>, submitter: C, checkout_timeout: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            submitter: Arc::new(submitter),
            checkout_timeout,
        }
    }

    /// Current cart state.
    pub async fn snapshot(&self) -> CartState {
        self.store.lock().await.state().clone()
    }

    /// Apply an action and return the resulting state.
    ///
    /// # Errors
    ///
    /// Returns the store's error for a rejected action
    /// ([`CartError::InvalidQuantity`] for an update to `0`); state is unchanged.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, action: CartAction) -> Result<CartState, CartError> {
        let mut store = self.store.lock().await;
        store.dispatch(action)?;
        warn_on_mixed_currencies(store.state());
        Ok(store.state().clone())
    }

    /// Submit the cart for checkout and return the settled state.
    ///
    /// A failed or timed-out submission is not an error here: it is
    /// recorded in the returned state's `error`. Dropping the returned
    /// future does not cancel the submission; the cart still settles.
    ///
    /// # Errors
    ///
    /// - [`CartError::CheckoutInProgress`] if another checkout is pending
    /// - [`CartError::EmptyCart`] if there are no items
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<CartState, CartError> {
        let lines = self.store.lock().await.begin_checkout()?;

        let store = Arc::clone(&self.store);
        let submitter = Arc::clone(&self.submitter);
        let timeout = self.checkout_timeout;
        let settle = tokio::spawn(
            async move {
                let outcome =
                    match tokio::time::timeout(timeout, submitter.create_checkout(&lines)).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err(CheckoutError::Timeout(timeout)),
                    };

                match &outcome {
                    Ok(checkout) => info!(checkout_id = %checkout.id, "Checkout created"),
                    Err(e) => warn!(error = %e, "Checkout failed"),
                }

                let mut store = store.lock().await;
                store.complete_checkout(outcome);
                store.state().clone()
            }
            .instrument(Span::current()),
        );

        match settle.await {
            Ok(state) => Ok(state),
            Err(e) => {
                error!(error = %e, "Checkout task did not finish");
                let mut store = self.store.lock().await;
                if store.state().is_loading() {
                    store.complete_checkout(Err(CheckoutError::Network(e.to_string())));
                }
                Ok(store.state().clone())
            }
        }
    }
}

fn warn_on_mixed_currencies(state: &CartState) {
    if state.has_mixed_currencies() {
        warn!(
            currency = %state.currency_code(),
            "Cart holds items in more than one currency; totals use the first item's currency"
        );
    }
}
