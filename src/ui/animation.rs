/// Fixed-duration offset animations
///
/// Driven by frame timestamps; the animation itself holds no clock.

use cgmath::Vector2;
use std::time::{Duration, Instant};

/// Motion of a card offset from one point to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    from: Vector2<f32>,
    to: Vector2<f32>,
    started: Instant,
    duration: Duration,
}

impl Animation {
    pub fn new(from: Vector2<f32>, to: Vector2<f32>, started: Instant, duration: Duration) -> Self {
        Self { from, to, started, duration }
    }

    /// Linear progress in `0.0..=1.0`
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Offset at `now`, eased out
    pub fn value(&self, now: Instant) -> Vector2<f32> {
        let t = ease_out_cubic(self.progress(now));
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let start = Instant::now();
        let animation = Animation::new(
            Vector2::new(100.0, 20.0),
            Vector2::new(390.0, 0.0),
            start,
            Duration::from_millis(250),
        );

        assert_eq!(animation.value(start), Vector2::new(100.0, 20.0));
        assert!(!animation.is_finished(start + Duration::from_millis(249)));
        assert!(animation.is_finished(start + Duration::from_millis(250)));
        assert_eq!(animation.value(start + Duration::from_secs(1)), Vector2::new(390.0, 0.0));
    }

    #[test]
    fn test_eases_monotonically() {
        let start = Instant::now();
        let animation = Animation::new(
            Vector2::new(0.0, 0.0),
            Vector2::new(100.0, 0.0),
            start,
            Duration::from_millis(200),
        );

        let mut last = 0.0;
        for ms in (0..=200).step_by(20) {
            let x = animation.value(start + Duration::from_millis(ms)).x;
            assert!(x >= last);
            last = x;
        }
    }

    #[test]
    fn test_zero_duration() {
        let start = Instant::now();
        let animation = Animation::new(
            Vector2::new(5.0, 5.0),
            Vector2::new(0.0, 0.0),
            start,
            Duration::ZERO,
        );

        assert!(animation.is_finished(start));
        assert_eq!(animation.value(start), Vector2::new(0.0, 0.0));
    }
}
