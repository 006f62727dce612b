//! Login state observer trait.

/// Observer notified when the logged-in state changes.
///
/// Notifications arrive after the mutation they report, and on login after
/// the credential store already reflects it, so an observer may reload
/// caches or re-read credentials immediately.
///
/// Callbacks are synchronous and run on the task driving the operation;
/// keep them short and hand heavy work off elsewhere.
pub trait LoginObserver: Send + Sync {
    /// Called with the new logged-in flag.
    fn login_state_changed(&self, logged_in: bool);
}
