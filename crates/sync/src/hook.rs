/// Notification seam fired after every successful rebuild, so an external
/// collaborator can diff old and new docs. Fire-and-forget: the update
/// cycle never waits on it and never sees its failures.
pub trait RebuildHook: Send + Sync {
    fn compare_docs(&self);
}

/// Hook that does nothing, for hosts without a diffing step.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl RebuildHook for NoopHook {
    fn compare_docs(&self) {}
}
