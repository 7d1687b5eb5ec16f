// src/scrape/pace.rs
use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};

/// Rate-limited iterator adapter: yields the first item immediately and every
/// following item no sooner than `period` after the previous one.
///
/// A slow consumer does not earn a burst afterwards; missed ticks are delayed,
/// not replayed.
pub struct Paced<I> {
    inner: I,
    ticker: Option<Interval>,
}

impl<I: Iterator> Paced<I> {
    /// Must be called inside a tokio runtime. A zero `period` disables pacing.
    pub fn new(inner: I, period: Duration) -> Self {
        let ticker = (!period.is_zero()).then(|| {
            let mut t = interval(period);
            t.set_missed_tick_behavior(MissedTickBehavior::Delay);
            t
        });
        Self { inner, ticker }
    }

    pub async fn next(&mut self) -> Option<I::Item> {
        let item = self.inner.next()?;
        if let Some(t) = self.ticker.as_mut() {
            t.tick().await;
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn items_are_spaced_by_period() {
        let start = Instant::now();
        let mut paced = Paced::new(vec![1, 2, 3].into_iter(), Duration::from_millis(500));
        let mut stamps = Vec::new();
        while let Some(i) = paced.next().await {
            stamps.push((i, start.elapsed()));
        }
        assert_eq!(stamps.len(), 3);
        assert_eq!(stamps[0].1, Duration::ZERO);
        assert!(stamps[1].1 >= Duration::from_millis(500));
        assert!(stamps[2].1 >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_source_does_not_wait() {
        let start = Instant::now();
        let mut paced = Paced::new(std::iter::once("only"), Duration::from_secs(5));
        assert_eq!(paced.next().await, Some("only"));
        assert_eq!(paced.next().await, None);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn zero_period_disables_pacing() {
        let mut paced = Paced::new(0..100, Duration::ZERO);
        let mut n = 0;
        while paced.next().await.is_some() {
            n += 1;
        }
        assert_eq!(n, 100);
    }
}
