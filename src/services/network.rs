/// Control handle onto the external network engine. The only operation the
/// response pane needs is cancelling whatever request is currently running.
pub trait RequestHandle: Send + Sync {
    fn cancel_current_request(&self);
}

/// Stand-in used when no network engine is wired up.
pub struct NoopRequestHandle;

impl RequestHandle for NoopRequestHandle {
    fn cancel_current_request(&self) {
        log::debug!("cancel requested with no request in flight");
    }
}
