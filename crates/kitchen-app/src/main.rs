//! # Kitchen Front of House
//!
//! Terminal surfaces over the order/product API.
//!
//! - `kitchen` - the live board; `done <n>`, `sound`, `density <mode>`, `quit`
//! - `salon` - product cards; `send <n>`, `urgent <n>`, `hold <n>`, `complete <n>`,
//!   `filter q|cat|all|available|sort|clear ...`, `quit`
//! - `products` - catalog management
//! - `search <query>` - quick search
//!
//! `--offline` runs everything against an in-memory API that publishes its own
//! hub events, so no server is needed.

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use kitchen_app::api::{InMemoryApi, KitchenApi, RestApi, SortKey};
use kitchen_app::catalog::{self, CatalogFilter, Debouncer};
use kitchen_app::clients::{Gesture, ProductsClient, UrgentButton};
use kitchen_app::config::{AppConfig, Timings};
use kitchen_app::hub::{self, HubEvent};
use kitchen_app::lifecycle::FrontOfHouse;
use kitchen_app::model::{parse_tags, DishType, ProductForm, ProductId};
use kitchen_app::notify::{Notice, Notifier, SoundCue};
use kitchen_app::terminal::{bell, render_board, render_cards, Density, Presenter};
use replica_actor::tracing::setup_tracing;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc::UnboundedReceiver};
use tokio::time::{interval, sleep, Instant};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "kitchen-app", about = "Kitchen front-of-house terminal")]
struct Cli {
    /// Use the in-memory API instead of KITCHEN_API_BASE / KITCHEN_HUB_URL.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    screen: Screen,
}

#[derive(Subcommand)]
enum Screen {
    /// Live kitchen board.
    Kitchen {
        #[arg(long, value_enum, default_value_t = Density::Normal)]
        density: Density,
        /// Enable the new-order beeps from the start.
        #[arg(long)]
        sound: bool,
    },
    /// Product cards for submitting orders.
    Salon {
        /// Comma-separated categories to show.
        #[arg(long = "cat", value_delimiter = ',')]
        categories: Vec<String>,
    },
    /// Catalog management.
    Products {
        #[command(subcommand)]
        command: ProductsCommand,
    },
    /// Quick search by name or tag.
    Search { query: String },
}

impl Screen {
    fn is_live(&self) -> bool {
        matches!(self, Screen::Kitchen { .. } | Screen::Salon { .. })
    }
}

#[derive(Subcommand)]
enum ProductsCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value_t = 300)]
        prep_seconds: u32,
        /// Comma-separated tags.
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long)]
        recurring: bool,
        #[arg(long)]
        portion: bool,
        #[arg(long)]
        unavailable: bool,
    },
    Toggle {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing();

    let config = AppConfig::from_env(cli.offline)?;
    info!(offline = cli.offline, "Starting kitchen-app");

    if cli.offline {
        let (events, receiver) = broadcast::channel(256);
        let api = Arc::new(InMemoryApi::demo().with_events(events));
        return run(api, Some(receiver), cli.screen, &config.timings).await;
    }

    let base = config
        .api_base
        .as_ref()
        .context("KITCHEN_API_BASE is not set")?;
    let api = Arc::new(RestApi::new(base.as_str())?);

    let events = if cli.screen.is_live() {
        let url = config.hub_url()?;
        let hub = hub::shared(url.as_str())?;
        let events = hub.subscribe();
        match hub.ensure_started().await {
            Ok(()) => Some(events),
            Err(e) => {
                warn!(error = %e, "Live updates unavailable");
                None
            }
        }
    } else {
        None
    };

    run(api, events, cli.screen, &config.timings).await
}

async fn run<A: KitchenApi + 'static>(
    api: Arc<A>,
    events: Option<broadcast::Receiver<HubEvent>>,
    screen: Screen,
    timings: &Timings,
) -> anyhow::Result<()> {
    let (notifier, notices) = Notifier::channel();

    match screen {
        Screen::Kitchen { density, sound } => {
            let cue = SoundCue::default();
            if sound {
                cue.unlock();
            }
            let mut front = FrontOfHouse::new(api, notifier, cue);
            if let Some(events) = events {
                front.follow(events);
            }
            let result = kitchen(&front, density, timings, notices).await;
            front.shutdown().await.map_err(anyhow::Error::msg)?;
            result
        }
        Screen::Salon { categories } => {
            let mut front = FrontOfHouse::new(api, notifier, SoundCue::default());
            if let Some(events) = events {
                front.follow(events);
            }
            let filter = if categories.is_empty() {
                CatalogFilter::default()
            } else {
                CatalogFilter::with_categories(categories)
            };
            let result = salon(&front, filter, timings, notices).await;
            front.shutdown().await.map_err(anyhow::Error::msg)?;
            result
        }
        Screen::Products { command } => {
            let client = ProductsClient::new(api, notifier);
            let result = products(&client, command).await;
            print_toasts(notices);
            result
        }
        Screen::Search { query } => {
            for product in catalog::quick_search(&*api, &query).await? {
                println!("{:<12} {:<28} {}", product.id, product.name, product.category);
            }
            Ok(())
        }
    }
}

fn pick<'a, T>(items: &'a [T], raw: &str) -> Option<&'a T> {
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| items.get(i))
}

fn draw(presenter: &mut Presenter, body: &str) {
    print!("\x1b[2J\x1b[H");
    for line in presenter.overlay(Instant::now()) {
        println!("{line}");
    }
    print!("{body}");
}

fn print_toasts(mut notices: UnboundedReceiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        if let Notice::Toast(toast) = notice {
            match toast.description {
                Some(description) => println!("{}: {description}", toast.title),
                None => println!("{}", toast.title),
            }
        }
    }
}

async fn kitchen(
    front: &FrontOfHouse,
    mut density: Density,
    timings: &Timings,
    mut notices: UnboundedReceiver<Notice>,
) -> anyhow::Result<()> {
    // A failed mount is already on screen as a toast
    let _ = front.board.mount().await;

    let mut presenter = Presenter::new(timings);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = interval(timings.tick);
    let mut orders = front.board.orders().await?;

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            Some(notice) = notices.recv() => {
                if let Some(times) = presenter.handle(notice, Instant::now()) {
                    print!("{}", bell(times));
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let mut words = line.split_whitespace();
                match (words.next(), words.next()) {
                    (Some("done"), Some(n)) => match pick(&orders, n) {
                        Some(order) => {
                            let _ = front.board.complete(order.id.clone()).await;
                        }
                        None => println!("No order {n}"),
                    },
                    (Some("sound"), _) => front.sound.unlock(),
                    (Some("density"), Some(mode)) => match Density::parse(mode) {
                        Some(mode) => density = mode,
                        None => println!("Unknown density {mode}"),
                    },
                    (Some("dismiss"), _) => presenter.dismiss_alert(),
                    (Some("quit"), _) => break,
                    (Some(other), _) => println!("Unknown command {other}"),
                    (None, _) => {}
                }
            }
        }
        orders = front.board.orders().await?;
        draw(&mut presenter, &render_board(&orders, Utc::now(), density));
    }
    Ok(())
}

async fn salon(
    front: &FrontOfHouse,
    mut filter: CatalogFilter,
    timings: &Timings,
    mut notices: UnboundedReceiver<Notice>,
) -> anyhow::Result<()> {
    let (mut debouncer, mut searches) = Debouncer::new(timings.search_debounce);
    let mut presenter = Presenter::new(timings);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Load failures are shown as toasts and keep the previous cards
    let _ = front.cards.load(&filter.to_query()).await;
    let mut cards = front.cards.cards().await?;
    draw(&mut presenter, &render_cards(&cards));

    loop {
        tokio::select! {
            Some(notice) = notices.recv() => {
                presenter.handle(notice, Instant::now());
            }
            Some(q) = searches.recv() => {
                filter.q = q;
                let _ = front.cards.load(&filter.to_query()).await;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let mut words = line.split_whitespace();
                let command = words.next();
                let arg = words.next();
                let rest: Vec<&str> = words.collect();

                match (command, arg) {
                    (Some("send"), Some(n)) => {
                        if let Some(card) = pick(&cards, n) {
                            let _ = front.cards.send_normal(&card.product.id).await;
                        }
                    }
                    (Some(gesture @ ("urgent" | "hold")), Some(n)) => {
                        if let Some(card) = pick(&cards, n) {
                            let mut button = UrgentButton::with_hold(
                                front.cards.clone(),
                                card.product.id.clone(),
                                timings.hold,
                            );
                            button.press();
                            if gesture == "hold" {
                                sleep(timings.hold + Duration::from_millis(20)).await;
                            }
                            if let Gesture::Cancelled = button.release().await {
                                println!("Hold cancelled");
                            }
                        }
                    }
                    (Some("complete"), Some(n)) => {
                        if let Some(card) = pick(&cards, n) {
                            let _ = front.cards.complete_one(&card.product.id).await;
                        }
                    }
                    (Some("filter"), Some(what)) => {
                        let value = rest.join(" ");
                        let reload = match what {
                            "q" => {
                                debouncer.push(value);
                                false
                            }
                            "cat" => {
                                filter.toggle_category(&value);
                                true
                            }
                            "all" => {
                                filter.toggle_show_all();
                                true
                            }
                            "available" => {
                                filter.only_available = !filter.only_available;
                                true
                            }
                            "sort" => match SortKey::parse(&value) {
                                Some(sort) => {
                                    filter.sort = sort;
                                    true
                                }
                                None => {
                                    println!("Unknown sort {value}");
                                    false
                                }
                            },
                            "clear" => {
                                filter.clear();
                                true
                            }
                            other => {
                                println!("Unknown filter {other}");
                                false
                            }
                        };
                        if reload {
                            let _ = front.cards.load(&filter.to_query()).await;
                        }
                    }
                    (Some("quit"), _) => break,
                    (Some(other), _) => println!("Unknown command {other}"),
                    (None, _) => {}
                }
            }
        }
        cards = front.cards.cards().await?;
        draw(&mut presenter, &render_cards(&cards));
    }

    debouncer.cancel();
    Ok(())
}

async fn products(client: &ProductsClient, command: ProductsCommand) -> anyhow::Result<()> {
    match command {
        ProductsCommand::List => {
            for product in client.list().await? {
                println!(
                    "{:<38} {:<28} {:<18} {:>3} min {:<6} {}",
                    product.id,
                    product.name,
                    product.category,
                    product.prep_minutes(),
                    product.dish_type.as_str(),
                    if product.available { "available" } else { "off" }
                );
            }
        }
        ProductsCommand::Add {
            name,
            category,
            prep_seconds,
            tags,
            recurring,
            portion,
            unavailable,
        } => {
            let form = ProductForm {
                name,
                category,
                prep_seconds,
                available: !unavailable,
                tags: parse_tags(&tags),
                is_recurring: recurring,
                dish_type: if portion {
                    DishType::Portion
                } else {
                    DishType::Dish
                },
            };
            let product = client.create(&form).await?;
            println!("{}", product.id);
        }
        ProductsCommand::Toggle { id } => {
            let product = client.get(&ProductId(id)).await?;
            let product = client.toggle_available(&product).await?;
            println!(
                "{} is now {}",
                product.name,
                if product.available { "available" } else { "off" }
            );
        }
        ProductsCommand::Delete { id } => client.delete(&ProductId(id)).await?,
    }
    Ok(())
}
