use chrono::{DateTime, Utc};

/// A port that provides the **current instant** for the library.
///
/// # Purpose
/// This trait abstracts access to "now" so that:
///
/// - Expiration logic does **not** depend on system time
/// - Implementations can be swapped (system clock, fixed clock, mock, etc.)
/// - Tests can be deterministic and time-independent
///
/// # Design Notes
/// - The instant is always UTC; timezone handling does not belong at this
///   layer.
/// - This trait represents an **external capability**, similar to a
///   Repository or a Mailer.
///
/// # Typical Implementations
/// - `SystemClock`: Uses the OS / runtime clock
/// - `FixedClock`: Returns a constant instant (for testing)
pub trait Clock: Send + Sync {
    /// Returns the current instant as a [`DateTime<Utc>`].
    ///
    /// Implementations decide how "now" is determined
    /// (e.g. system time, fixed value, mocked time source).
    fn now(&self) -> DateTime<Utc>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Test implementation of `Clock` that always returns a fixed instant.
    struct FixedClock {
        at: DateTime<Utc>,
    }

    impl FixedClock {
        fn new(at: DateTime<Utc>) -> Self {
            Self { at }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn fixed_clock_returns_given_instant() {
        let at = Utc.timestamp_opt(1_000, 0).unwrap();
        let clock = FixedClock::new(at);

        assert_eq!(clock.now(), at);
    }

    #[test]
    fn clock_trait_object_works() {
        let at = Utc.timestamp_opt(2_000, 0).unwrap();
        let clock: Box<dyn Clock> = Box::new(FixedClock::new(at));

        assert_eq!(clock.now(), at);
    }
}
