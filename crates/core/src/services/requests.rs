//! Service request queue
//!
//! Fire-and-forget service calls are queued here by the game and executed by
//! a [`ServiceDispatcher`] on the boundary side, so no game thread ever waits
//! on the host.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use tunnel_platform::{BridgeError, PlatformBridge, ServiceRequest};

/// Create a bounded request channel feeding `bridge`
pub fn request_channel(
    capacity: usize,
    bridge: Arc<dyn PlatformBridge>,
) -> (RequestQueue, ServiceDispatcher) {
    let capacity = capacity.max(1);
    let (sender, receiver) = bounded(capacity);
    (
        RequestQueue { sender },
        ServiceDispatcher {
            receiver,
            bridge,
            capacity,
        },
    )
}

/// Sending half of the request channel
#[derive(Debug, Clone)]
pub struct RequestQueue {
    sender: Sender<ServiceRequest>,
}

impl RequestQueue {
    /// Queue a request without blocking
    ///
    /// # Returns
    /// `false` if the queue is full or the dispatcher is gone (request is dropped)
    pub fn submit(&self, request: ServiceRequest) -> bool {
        match self.sender.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(request)) => {
                tracing::warn!("Service queue full, dropping {}", request.name());
                false
            }
            Err(TrySendError::Disconnected(request)) => {
                tracing::error!("Service dispatcher gone, dropping {}", request.name());
                false
            }
        }
    }

    /// Number of requests waiting
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}

/// Receiving half, executes requests against the bridge
pub struct ServiceDispatcher {
    receiver: Receiver<ServiceRequest>,
    bridge: Arc<dyn PlatformBridge>,
    capacity: usize,
}

impl ServiceDispatcher {
    /// Execute every request currently queued
    ///
    /// Returns the number of requests executed.
    pub fn pump(&self) -> usize {
        let mut count = 0;

        // At most one queue's worth, so a busy producer cannot starve the caller
        while let Ok(request) = self.receiver.try_recv() {
            self.dispatch(&request);
            count += 1;

            if count >= self.capacity {
                break;
            }
        }

        count
    }

    /// Execute requests until every sender is dropped
    pub fn run(self) {
        for request in self.receiver.iter() {
            self.dispatch(&request);
        }
        tracing::debug!("Service dispatcher finished");
    }

    /// Run on a dedicated named thread
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("tunnel-services".into())
            .spawn(move || self.run())
    }

    fn dispatch(&self, request: &ServiceRequest) {
        tracing::debug!("Dispatching {}", request.name());
        settle(request.name(), self.bridge.post(request));
    }
}

/// Resolve a bridge result
///
/// Integration errors panic: a missing entrypoint means a broken build.
/// Every other failure is logged and yields `None`.
pub(crate) fn settle<T>(what: &str, result: Result<T, BridgeError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_integration_error() => panic!("{}: {}", what, e),
        Err(e) => {
            tracing::error!("{}: {}", what, e);
            None
        }
    }
}
