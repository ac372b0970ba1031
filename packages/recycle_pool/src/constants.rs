// A poisoned lock means some thread panicked while mutating the pool bookkeeping. We cannot
// trust the owned/free accounting after that, so we panic too.
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - the pool bookkeeping \
    may be inconsistent and continued execution is not safe";
