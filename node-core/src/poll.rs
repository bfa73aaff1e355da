//! Begrenzte Polling-Schleife
//!
//! Prüft eine Bedingung in festen Abständen, bis sie erfüllt ist oder
//! das Zeitbudget aufgebraucht ist. Es gibt keine Abbruchmöglichkeit.

use crate::traits::Clock;

/// Bedingung wurde innerhalb des Budgets nicht erfüllt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedOut {
    pub waited_ms: u64,
}

/// Pollt `predicate` alle `interval_ms` bis maximal `max_wait_ms`
///
/// Gibt bei Erfolg die verstrichene Zeit in Millisekunden zurück.
pub async fn poll<C, F>(
    clock: &mut C,
    interval_ms: u64,
    max_wait_ms: u64,
    predicate: F,
) -> Result<u64, TimedOut>
where
    C: Clock,
    F: FnMut() -> bool,
{
    poll_with(clock, interval_ms, max_wait_ms, predicate, |_| {}).await
}

/// Wie [`poll`], ruft aber nach jedem erfolglosen Intervall `on_retry` mit
/// der bisher verstrichenen Zeit auf
///
/// Die Zeit wird über die Clock gemessen, nicht durch Aufsummieren der
/// Intervalle.
pub async fn poll_with<C, F, R>(
    clock: &mut C,
    interval_ms: u64,
    max_wait_ms: u64,
    mut predicate: F,
    mut on_retry: R,
) -> Result<u64, TimedOut>
where
    C: Clock,
    F: FnMut() -> bool,
    R: FnMut(u64),
{
    let start = clock.now_ms();

    loop {
        let elapsed = clock.now_ms().saturating_sub(start);
        if predicate() {
            return Ok(elapsed);
        }
        if elapsed >= max_wait_ms {
            return Err(TimedOut { waited_ms: elapsed });
        }

        clock.sleep_ms(interval_ms).await;
        on_retry(clock.now_ms().saturating_sub(start));
    }
}
