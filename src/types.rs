use serde::{Deserialize, Serialize};

/// Which tier of the fallback chain satisfied a document load.
///
/// A load is never an error: when the remote gateway is unreachable the
/// repositories degrade to the local store and finally to the built-in
/// defaults. The origin lets the presentation layer surface "showing
/// offline data" without branching on error values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    /// Fresh data from the remote backend.
    Remote,
    /// The last locally persisted document.
    LocalFallback,
    /// The built-in default document.
    Defaults,
}

/// Origin of a blog post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListOrigin {
    /// Fresh listing in authoritative server order.
    Server,
    /// The remote call failed; this is the last listing we saw.
    StaleCache,
    /// No connectivity and no cache; fixed placeholder posts.
    Placeholder,
}

/// Outcome of a save.
///
/// `LocalOnly` is a degraded success: the document is safe in the local
/// store but not durable on the backend until a later save goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Remote,
    LocalOnly,
}
