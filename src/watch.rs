//! Blocking watch loop over a single catalog endpoint.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::CatalogError;
use crate::types::QueryResponse;

/// A change observed by a watch: the index that produced it and the payload
/// at that index. `payload` is `None` while the resource does not exist.
#[derive(Debug, Clone)]
pub struct WatchEvent<T> {
    pub index: u64,
    pub payload: Option<T>,
}

/// Repeatedly long-polls one endpoint, feeding the last seen index back as
/// the wait index of the next query.
///
/// A watch is one sequential stream of queries with its own private index
/// state. Run one watch per endpoint of interest; independent watches may
/// share a client, they only contend on the transport.
pub struct Watch<T, Q>
where
    Q: FnMut(u64) -> Result<QueryResponse<T>, CatalogError>,
{
    query: Q,
    last_index: u64,
    cancel: Option<Arc<AtomicBool>>,
    payload: PhantomData<T>,
}

impl<T, Q> Watch<T, Q>
where
    Q: FnMut(u64) -> Result<QueryResponse<T>, CatalogError>,
{
    pub fn new(query: Q) -> Self {
        Watch {
            query,
            last_index: 0,
            cancel: None,
            payload: PhantomData,
        }
    }

    /// Resume from a previously observed index instead of starting at 0.
    pub fn from_index(mut self, index: u64) -> Self {
        self.last_index = index;
        self
    }

    /// Cooperative cancellation. The flag is checked before each query is
    /// issued; a query already in flight completes on its own wait deadline
    /// rather than being aborted.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The index of the last emitted change, 0 before the first one.
    pub fn last_index(&self) -> u64 {
        self.last_index
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    /// Block until the endpoint changes, the watch is cancelled (`Ok(None)`),
    /// or a query fails.
    ///
    /// A long poll that comes back with the index unchanged is a server-side
    /// wait timeout, not a change, and is re-issued immediately. A failed
    /// query is returned once and the watch stays usable; whether and when
    /// to call again is the caller's retry policy.
    pub fn next_change(&mut self) -> Result<Option<WatchEvent<T>>, CatalogError> {
        loop {
            if self.cancelled() {
                debug!("watch cancelled");
                return Ok(None);
            }
            let resp = (self.query)(self.last_index)?;
            let index = resp.meta.modify_index;
            if self.last_index != 0 && index == self.last_index {
                trace!(index, "wait elapsed without change, re-issuing");
                continue;
            }
            debug!(from = self.last_index, to = index, "endpoint changed");
            self.last_index = index;
            return Ok(Some(WatchEvent {
                index,
                payload: resp.body,
            }));
        }
    }

    /// Drive the watch until it is cancelled or the error policy gives up.
    ///
    /// `on_error` supplies the backoff: return how long to pause before the
    /// next attempt, or `None` to stop and surface the error. The loop never
    /// retries on its own account.
    pub fn run<F, E>(mut self, mut on_change: F, mut on_error: E) -> Result<(), CatalogError>
    where
        F: FnMut(WatchEvent<T>),
        E: FnMut(&CatalogError) -> Option<Duration>,
    {
        loop {
            match self.next_change() {
                Ok(Some(event)) => on_change(event),
                Ok(None) => return Ok(()),
                Err(err) => match on_error(&err) {
                    Some(pause) => {
                        debug!(error = %err, ?pause, "watch query failed, backing off");
                        thread::sleep(pause);
                    }
                    None => return Err(err),
                },
            }
        }
    }
}
