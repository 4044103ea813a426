use kube::runtime::controller::Action;
use tokio::time::Duration;


/// Whether, and how soon, the caller should run another reconciliation pass.
///
/// A hint never blocks: it is returned to the caller, which decides how to
/// schedule the next pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequeueHint {
    pub requeue: bool,
    pub after: Duration,
}

impl RequeueHint {
    /// Nothing left to do until the next change or periodic resync
    pub fn done() -> Self {
        RequeueHint::default()
    }

    /// Run another pass after `after`
    pub fn after(after: Duration) -> Self {
        RequeueHint { requeue: true, after }
    }

    /// Combine two hints, keeping the sooner requeue
    pub fn merge(self, other: RequeueHint) -> Self {
        match (self.requeue, other.requeue) {
            (true, true) => RequeueHint::after(self.after.min(other.after)),
            (true, false) => self,
            (false, _) => other,
        }
    }

    /// Turn the hint into a controller Action, falling back to the periodic
    /// `resync` interval when no requeue was requested
    pub fn into_action(self, resync: Duration) -> Action {
        if self.requeue {
            Action::requeue(self.after)
        } else {
            Action::requeue(resync)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_does_not_requeue() {
        let hint = RequeueHint::done();
        assert!(!hint.requeue);
        assert_eq!(hint.after, Duration::ZERO);
    }

    #[test]
    fn test_merge_keeps_sooner_requeue() {
        let soon = RequeueHint::after(Duration::from_secs(5));
        let later = RequeueHint::after(Duration::from_secs(30));

        assert_eq!(soon.merge(later), soon);
        assert_eq!(later.merge(soon), soon);
        assert_eq!(RequeueHint::done().merge(later), later);
        assert_eq!(later.merge(RequeueHint::done()), later);
        assert_eq!(RequeueHint::done().merge(RequeueHint::done()), RequeueHint::done());
    }

    #[test]
    fn test_into_action() {
        assert_eq!(
            RequeueHint::after(Duration::from_secs(5)).into_action(Duration::from_secs(30)),
            Action::requeue(Duration::from_secs(5))
        );
        assert_eq!(
            RequeueHint::done().into_action(Duration::from_secs(30)),
            Action::requeue(Duration::from_secs(30))
        );
    }
}
