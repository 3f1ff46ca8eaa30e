use chrono::{DateTime, Utc};

use crate::time::clock::Clock;

/// A [`Clock`] implementation backed by the system clock.
///
/// # Overview
/// `SystemClock` reports the operating system's current time in UTC.
/// It carries no state and no configuration, so a shared unit value is
/// all callers ever need.
///
/// # Responsibility
/// - Selecting the clock is the responsibility of the **composition root**.
/// - Library logic should treat `Clock` as a trusted source; the default
///   expiration checks on [`crate::auth::User`] use this implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
