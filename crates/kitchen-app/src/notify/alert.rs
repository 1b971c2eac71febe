//! Full-screen new-order alert.

use std::time::Duration;
use tokio::time::Instant;

pub const ALERT_TTL: Duration = Duration::from_secs(5);

/// At most one alert is shown; a newer alert replaces the current one and
/// restarts the dismissal timer.
#[derive(Debug)]
pub struct AlertOverlay {
    ttl: Duration,
    current: Option<(Instant, String)>,
}

impl Default for AlertOverlay {
    fn default() -> Self {
        Self::new(ALERT_TTL)
    }
}

impl AlertOverlay {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn show(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some((now + self.ttl, text.into()));
    }

    pub fn current(&mut self, now: Instant) -> Option<&str> {
        if self.current.as_ref().is_some_and(|(until, _)| *until <= now) {
            self.current = None;
        }
        self.current.as_ref().map(|(_, text)| text.as_str())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_alert_restarts_the_timer() {
        let start = Instant::now();
        let mut overlay = AlertOverlay::default();
        overlay.show("Farofa x1", start);
        overlay.show("Arroz x2", start + Duration::from_secs(4));

        assert_eq!(overlay.current(start + Duration::from_secs(6)), Some("Arroz x2"));
        assert_eq!(overlay.current(start + Duration::from_secs(9)), None);
    }

    #[test]
    fn dismiss_clears() {
        let now = Instant::now();
        let mut overlay = AlertOverlay::default();
        overlay.show("Picanha x1", now);
        overlay.dismiss();
        assert_eq!(overlay.current(now), None);
    }
}
