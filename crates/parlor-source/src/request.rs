/// Identifier for one outstanding puzzle-load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    /// Returns the raw ticket number, for logging.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic ticket issuer enforcing last-request-wins.
///
/// A session issues a fresh ticket per load request. A response is applied
/// only if it settles the current ticket; responses for superseded or
/// invalidated tickets are dropped, so an arbitrarily delayed response can
/// never overwrite newer state.
#[derive(Debug, Default, Clone)]
pub struct RequestTracker {
    next: u64,
    current: Option<u64>,
}

impl RequestTracker {
    /// Creates a tracker with no outstanding request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding any outstanding one.
    pub fn issue(&mut self) -> RequestId {
        self.next += 1;
        self.current = Some(self.next);
        RequestId(self.next)
    }

    /// Returns true if a request is outstanding.
    #[must_use]
    pub fn has_outstanding(&self) -> bool {
        self.current.is_some()
    }

    /// Settles the ticket if it is the current one.
    ///
    /// Returns true exactly when the response carrying this id should be
    /// applied; stale and already-settled tickets return false.
    pub fn settle(&mut self, id: RequestId) -> bool {
        if self.current == Some(id.0) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Drops the outstanding ticket, if any, without settling it.
    ///
    /// Used when a session is cancelled mid-load; the eventual response
    /// will no longer match anything.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
