use std::time::{Duration, Instant};

/// Wall-clock bound of a single solve.
///
/// The solver samples the clock between state transitions and once per
/// propagation round, so a solve overshoots its deadline by at most one
/// round of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// A deadline that never expires
    pub fn none() -> Deadline {
        Deadline(None)
    }

    pub fn at(instant: Instant) -> Deadline {
        Deadline(Some(instant))
    }

    /// Expires `duration` from now
    pub fn after(duration: Duration) -> Deadline {
        // Durations too large to be represented are as good as no deadline.
        Deadline(Instant::now().checked_add(duration))
    }

    /// The stricter of the two deadlines
    pub fn earliest(self, other: Deadline) -> Deadline {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Deadline(Some(a.min(b))),
            (a, b) => Deadline(a.or(b)),
        }
    }

    pub fn instant(&self) -> Option<Instant> {
        self.0
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        match self.0 {
            Some(instant) => Instant::now() >= instant,
            None => false,
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Deadline::none()
    }
}

impl From<Duration> for Deadline {
    fn from(duration: Duration) -> Self {
        Deadline::after(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_never_expires() {
        assert!(!Deadline::none().is_expired());
    }

    #[test]
    fn past_instant_is_expired() {
        assert!(Deadline::at(Instant::now()).is_expired());
    }

    #[test]
    fn earliest_picks_the_stricter_bound() {
        let now = Instant::now();
        let soon = Deadline::at(now);
        let later = Deadline::at(now + Duration::from_secs(60));
        assert_eq!(soon.earliest(later), soon);
        assert_eq!(later.earliest(soon), soon);
        assert_eq!(Deadline::none().earliest(later), later);
        assert_eq!(Deadline::none().earliest(Deadline::none()), Deadline::none());
    }
}
