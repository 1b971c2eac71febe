//! Plain-text rendering of the board, the salon cards and the notification overlay.

use crate::card_actor::ProductCard;
use crate::config::Timings;
use crate::countdown::{Badge, Countdown, Tier};
use crate::model::Order;
use crate::notify::{AlertOverlay, Notice, ToastKind, ToastTray};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use tokio::time::Instant;

/// How much of each ticket the board shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Density {
    /// One line per ticket.
    Compact,
    #[default]
    Normal,
    /// Items plus the tier, with spacing between tickets.
    Comfortable,
}

impl Density {
    /// Case-insensitive match on the same names the `--density` flag accepts.
    pub fn parse(raw: &str) -> Option<Self> {
        <Self as clap::ValueEnum>::from_str(raw.trim(), true).ok()
    }
}

fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Healthy => "on time",
        Tier::Warning => "hurry",
        Tier::Critical => "late",
    }
}

pub fn render_board(orders: &[Order], now: DateTime<Utc>, density: Density) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Kitchen board ({} active)", orders.len());
    if orders.is_empty() {
        out.push_str("  No active orders\n");
        return out;
    }

    for (n, order) in orders.iter().enumerate() {
        let countdown = Countdown::compute(order, now);
        let badge = Badge::for_order(order, &countdown);
        let n = n + 1;
        match density {
            Density::Compact => {
                let _ = writeln!(
                    out,
                    "{n:>3}. {} {badge:>6} {:<10} {}",
                    order.id.short(),
                    order.status,
                    order.summary()
                );
            }
            Density::Normal | Density::Comfortable => {
                let _ = writeln!(
                    out,
                    "{n:>3}. {} [{badge}] {} {} min",
                    order.id.short(),
                    order.status,
                    countdown.minutes_left()
                );
                for item in &order.items {
                    let _ = writeln!(out, "       - {} x{}", item.product_name, item.quantity);
                }
                if density == Density::Comfortable {
                    let _ = writeln!(out, "       {}", tier_label(countdown.tier));
                    out.push('\n');
                }
            }
        }
    }
    out
}

pub fn render_cards(cards: &[ProductCard]) -> String {
    let mut out = String::new();
    if cards.is_empty() {
        out.push_str("  No products match\n");
        return out;
    }
    for (n, card) in cards.iter().enumerate() {
        let product = &card.product;
        let mut state = Vec::new();
        if !product.available {
            state.push("unavailable".to_string());
        }
        if let Some(order) = &card.normal {
            state.push(format!("sent {}", order.id.short()));
        }
        if let Some(order) = &card.urgent {
            state.push(format!("URGENT {}", order.id.short()));
        }
        let _ = writeln!(
            out,
            "{:>3}. {:<28} {:<18} {:>3} min  {}",
            n + 1,
            product.name,
            product.category,
            product.prep_minutes(),
            state.join(", ")
        );
    }
    out
}

/// Toasts and the new-order alert as the terminal shows them.
pub struct Presenter {
    toasts: ToastTray,
    alert: AlertOverlay,
}

impl Presenter {
    pub fn new(timings: &Timings) -> Self {
        Self {
            toasts: ToastTray::new(timings.toast),
            alert: AlertOverlay::new(timings.alert),
        }
    }

    /// Takes one notice. Returns the number of beeps to play, if any.
    pub fn handle(&mut self, notice: Notice, now: Instant) -> Option<u32> {
        match notice {
            Notice::Toast(toast) => self.toasts.push(toast, now),
            Notice::Alert(text) => self.alert.show(text, now),
            Notice::Beep(times) => return Some(times),
        }
        None
    }

    pub fn dismiss_alert(&mut self) {
        self.alert.dismiss();
    }

    /// Lines to draw above the current screen.
    pub fn overlay(&mut self, now: Instant) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(text) = self.alert.current(now) {
            lines.push(format!("*** NEW ORDER: {text} ***"));
        }
        for toast in self.toasts.visible(now) {
            let mark = match toast.kind {
                ToastKind::Success => "ok",
                ToastKind::Failure => "!!",
            };
            match &toast.description {
                Some(description) => lines.push(format!("[{mark}] {}: {description}", toast.title)),
                None => lines.push(format!("[{mark}] {}", toast.title)),
            }
        }
        lines
    }
}

pub fn bell(times: u32) -> String {
    "\x07".repeat(times as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, OrderItem, OrderStatus, ProductForm, ProductId};
    use crate::notify::Toast;
    use std::time::Duration;

    fn order(id: &str, urgent: bool) -> Order {
        Order {
            id: OrderId::from(id),
            created_at: Utc::now(),
            status: OrderStatus::Pending,
            is_urgent: urgent,
            items: vec![OrderItem {
                product_id: ProductId::from("p-farofa"),
                product_name: "Farofa".into(),
                quantity: 2,
                prep_seconds: 180,
            }],
        }
    }

    #[test]
    fn board_densities() {
        let orders = vec![order("aaaaaaaa-1", true), order("bbbbbbbb-2", false)];
        let now = orders[0].created_at;

        let compact = render_board(&orders, now, Density::Compact);
        assert!(compact.starts_with("Kitchen board (2 active)"));
        assert!(compact.contains("#aaaaaaaa URGENT Pending    Farofa x2"));
        assert_eq!(compact.lines().count(), 3);

        let comfortable = render_board(&orders, now, Density::Comfortable);
        assert!(comfortable.contains("[100%] Pending 3 min"));
        assert!(comfortable.contains("on time"));

        assert!(render_board(&[], now, Density::Normal).contains("No active orders"));
    }

    #[test]
    fn density_names_match_the_flag() {
        assert_eq!(Density::parse("compact"), Some(Density::Compact));
        assert_eq!(Density::parse(" Comfortable "), Some(Density::Comfortable));
        assert_eq!(Density::parse("NORMAL"), Some(Density::Normal));
        assert_eq!(Density::parse("tiny"), None);
    }

    #[test]
    fn cards_show_outstanding_orders() {
        let product = ProductForm {
            name: "Farofa".into(),
            category: "Guarnições".into(),
            prep_seconds: 180,
            ..ProductForm::default()
        }
        .into_product(ProductId::from("p-farofa"));
        let mut card = ProductCard::new(product);
        card.normal = Some(order("cccccccc-3", false));

        let text = render_cards(&[card]);
        assert!(text.contains("Farofa"));
        assert!(text.contains("sent #cccccccc"));
    }

    #[test]
    fn presenter_expires_notices() {
        let mut presenter = Presenter::new(&Timings::default());
        let start = Instant::now();
        presenter.handle(Notice::Alert("Farofa x2".into()), start);
        presenter.handle(
            Notice::Toast(Toast {
                kind: ToastKind::Failure,
                title: "Could not send order".into(),
                description: Some("API unavailable".into()),
            }),
            start,
        );
        assert_eq!(presenter.handle(Notice::Beep(3), start), Some(3));

        let lines = presenter.overlay(start + Duration::from_secs(1));
        assert_eq!(
            lines,
            vec![
                "*** NEW ORDER: Farofa x2 ***".to_string(),
                "[!!] Could not send order: API unavailable".to_string(),
            ]
        );
        assert_eq!(presenter.overlay(start + Duration::from_secs(4)).len(), 1);
        assert!(presenter.overlay(start + Duration::from_secs(5)).is_empty());
    }
}
