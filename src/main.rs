use iced::widget::{button, canvas, column, container, row, text, Stack};
use iced::{window, Alignment, Element, Length, Size, Subscription, Task, Theme};
use serde_json::Value;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

mod error;
mod media;
mod state;
mod ui;

use error::FetchError;
use media::loader::{fetch_remote, RemoteImage};
use media::AssetRegistry;
use state::config::DeckConfig;
use state::data::{CardKey, ContainerSize, SwipeDirection};
use state::deck::{CardStack, LayerStyle};
use ui::canvas::{CardLayer, Gesture};
use ui::detail::Profile;
use ui::swipe::{is_tap, Release, SwipeCard, SwipeTiming};

/// Height of the tab bar above the card stack
const NAV_HEIGHT: f32 = 56.0;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Match,
    Detail,
}

/// Main application state
struct SwipeMatch {
    /// The card queue
    deck: CardStack,
    /// Gesture state per stack slot (0 = top)
    slots: Vec<SwipeCard>,
    /// Window size; its width is the swipe viewport
    viewport: Size,
    tab: Tab,
    /// Payload handed to the detail screen
    detail: Option<Value>,
    profile: Profile,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Window size measured or changed
    Resized(Size),
    /// Pointer activity on a stack slot
    Gesture(usize, Gesture),
    /// Animation frame
    Tick(Instant),
    /// Remote image fetch finished
    ImageLoaded {
        key: CardKey,
        token: u64,
        result: Result<RemoteImage, FetchError>,
    },
    /// User picked a tab
    SwitchTab(Tab),
}

impl SwipeMatch {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = DeckConfig::load();
        let registry = AssetRegistry::scan(&config.assets_dir);
        let cards = config.cards(&registry);
        let stack_size = config.stack_size();

        tracing::info!("🃏 Swipe Match initialized with {} cards", cards.len());

        let deck = CardStack::new(cards, &registry, config.policy, stack_size);
        let timing = SwipeTiming {
            exit: config.exit_duration(),
            settle: config.settle_duration(),
        };

        let mut app = SwipeMatch::with_deck(deck, timing);

        let measure = window::get_latest()
            .and_then(window::get_size)
            .map(Message::Resized);
        let loads = app.start_loads();

        (app, Task::batch([measure, loads]))
    }

    /// State for `deck` with one gesture slot per rendered layer
    fn with_deck(deck: CardStack, timing: SwipeTiming) -> Self {
        let slots = (0..deck.stack_size())
            .map(|slot| SwipeCard::new(timing, slot != 0))
            .collect();

        SwipeMatch {
            deck,
            slots,
            viewport: Size::ZERO,
            tab: Tab::Match,
            detail: None,
            profile: Profile::placeholder(),
        }
    }

    /// Whether the card in `slot` draws anything (and so may be dragged)
    fn slot_is_renderable(&self, slot: usize) -> bool {
        self.deck
            .visible()
            .find(|(visible, _)| *visible == slot)
            .is_some_and(|(_, entry)| entry.image.is_renderable())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Resized(size) => {
                self.viewport = size;
                let container = ContainerSize::new(size.width, (size.height - NAV_HEIGHT).max(0.0));
                self.deck.measure(container);
                Task::none()
            }
            Message::Gesture(slot, gesture) => {
                // A card with an invalid source is invisible and inert
                if !self.slot_is_renderable(slot) {
                    return Task::none();
                }
                let Some(card) = self.slots.get_mut(slot) else {
                    return Task::none();
                };

                match gesture {
                    Gesture::Granted => {
                        card.grant();
                    }
                    Gesture::Moved(delta) => card.drag(delta),
                    Gesture::Released(delta) => {
                        let release = card.release(delta, self.viewport.width, Instant::now());
                        if release == Some(Release::SettleBack) && is_tap(delta) {
                            self.open_detail();
                        }
                    }
                }
                Task::none()
            }
            Message::Tick(now) => {
                let exits: Vec<SwipeDirection> =
                    self.slots.iter_mut().filter_map(|card| card.tick(now)).collect();

                if exits.is_empty() {
                    return Task::none();
                }
                for direction in exits {
                    self.on_swipe(direction);
                }
                self.start_loads()
            }
            Message::ImageLoaded { key, token, result } => {
                match self.deck.entry_mut(key) {
                    Some(entry) => {
                        entry.image.finish_load(token, result);
                    }
                    // The card left the deck before the fetch finished
                    None => tracing::debug!("Dropping image result for card {}", key),
                }
                Task::none()
            }
            Message::SwitchTab(tab) => {
                self.tab = tab;
                Task::none()
            }
        }
    }

    /// The top card finished flying off in `direction`
    fn on_swipe(&mut self, direction: SwipeDirection) {
        if let Some(decision) = self.deck.dismiss(direction) {
            tracing::info!(
                "Swiped {:?} on card {} at {}, {} cards in deck",
                decision.direction,
                decision.key,
                decision.at.format("%H:%M:%S"),
                self.deck.len()
            );
        }

        // Every slot has a new occupant now
        for card in &mut self.slots {
            card.reset();
        }
    }

    /// Hand the top card's payload to the detail screen
    fn open_detail(&mut self) {
        if let Some(entry) = self.deck.top() {
            tracing::debug!("Opening detail for card {}", entry.card.key);
            self.detail = Some(entry.card.data.clone());
            self.tab = Tab::Detail;
        }
    }

    /// Start remote fetches for visible cards that need one
    fn start_loads(&mut self) -> Task<Message> {
        let mut tasks = Vec::new();

        for (key, token, uri) in self.deck.pending_loads() {
            let (task, handle) = Task::perform(fetch_remote(uri), move |result| {
                Message::ImageLoaded { key, token, result }
            })
            .abortable();

            if let Some(entry) = self.deck.entry_mut(key) {
                entry.image.begin_load(token, Some(handle.abort_on_drop()));
            }
            tasks.push(task);
        }

        Task::batch(tasks)
    }

    fn subscription(&self) -> Subscription<Message> {
        let resize = window::resize_events().map(|(_id, size)| Message::Resized(size));

        if self.slots.iter().any(SwipeCard::is_animating) {
            Subscription::batch([resize, window::frames().map(Message::Tick)])
        } else {
            resize
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let tab_button = |label: &'static str, tab: Tab| {
            let tab_button = button(text(label)).padding(10);
            if self.tab == tab {
                tab_button
            } else {
                tab_button.on_press(Message::SwitchTab(tab))
            }
        };

        let nav = row![
            tab_button("Match", Tab::Match),
            tab_button("Detail", Tab::Detail),
            container(text(format!(
                "♥ {}   ✕ {}",
                self.deck.count(SwipeDirection::Right),
                self.deck.count(SwipeDirection::Left)
            )))
            .width(Length::Fill)
            .align_x(Alignment::End),
        ]
        .spacing(10)
        .padding(8)
        .height(Length::Fixed(NAV_HEIGHT))
        .align_y(Alignment::Center);

        let body = match self.tab {
            Tab::Match => self.match_view(),
            Tab::Detail => ui::detail::view(&self.profile, self.detail.as_ref()),
        };

        column![nav, body].into()
    }

    /// The card stack, top card painted last
    fn match_view(&self) -> Element<'_, Message> {
        if self.deck.is_empty() {
            return container(text("Out of cards").size(24))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        }

        let layers: Vec<Element<'_, Message>> = self
            .deck
            .paint_order()
            .into_iter()
            .filter_map(|(slot, entry)| {
                let card = self.slots.get(slot)?;
                let layer = CardLayer {
                    slot,
                    handle: entry.image.handle().cloned(),
                    render: entry.image.render_size(),
                    renderable: entry.image.is_renderable(),
                    offset: card.offset(),
                    style: LayerStyle::for_slot(slot),
                    disabled: card.is_disabled() || !entry.image.is_renderable(),
                    reset_token: card.reset_token(),
                };

                Some(
                    canvas(layer)
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .into(),
                )
            })
            .collect();

        Stack::with_children(layers)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("swipe_match=info")),
        )
        .init();

    iced::application("Swipe Match", SwipeMatch::update, SwipeMatch::view)
        .subscription(SwipeMatch::subscription)
        .theme(SwipeMatch::theme)
        .window_size(Size::new(390.0, 844.0))
        .centered()
        .run_with(SwipeMatch::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector2;
    use iced::widget::image::Handle;
    use serde_json::json;
    use state::config::DeckPolicy;
    use state::data::Card;
    use std::time::Duration;

    fn card(key: u64) -> Card {
        Card {
            key: CardKey(key),
            source: json!({
                "uri": format!("https://example.com/{}.png", key),
                "width": 1200,
                "height": 800,
            }),
            data: json!({ "name": format!("card {}", key) }),
        }
    }

    fn app(cards: Vec<Card>, policy: DeckPolicy) -> SwipeMatch {
        let deck = CardStack::new(cards, &AssetRegistry::default(), policy, 2);
        let mut app = SwipeMatch::with_deck(deck, SwipeTiming::default());
        let _ = app.update(Message::Resized(Size::new(390.0, 844.0)));
        app
    }

    fn drag(app: &mut SwipeMatch, dx: f32) {
        let delta = Vector2::new(dx, 0.0);
        let _ = app.update(Message::Gesture(0, Gesture::Granted));
        let _ = app.update(Message::Gesture(0, Gesture::Moved(delta)));
        let _ = app.update(Message::Gesture(0, Gesture::Released(delta)));
    }

    #[test]
    fn test_swipe_right_rotates_deck_once() {
        let mut app = app(vec![card(0), card(1), card(2)], DeckPolicy::Cycle);
        let tokens: Vec<u64> = app.slots.iter().map(SwipeCard::reset_token).collect();

        drag(&mut app, 150.0);
        assert!(app.slots[0].is_animating());
        assert_eq!(app.deck.order(), vec![CardKey(0), CardKey(1), CardKey(2)]);

        let done = Instant::now() + Duration::from_secs(1);
        let _ = app.update(Message::Tick(done));

        assert_eq!(app.deck.order(), vec![CardKey(1), CardKey(2), CardKey(0)]);
        assert_eq!(app.deck.count(SwipeDirection::Right), 1);
        assert_eq!(app.slots[0].offset(), Vector2::new(0.0, 0.0));
        for (card, before) in app.slots.iter().zip(tokens) {
            assert!(card.reset_token() > before);
        }

        // Later frames don't dismiss again
        let _ = app.update(Message::Tick(done + Duration::from_secs(1)));
        assert_eq!(app.deck.history().len(), 1);
        assert_eq!(app.tab, Tab::Match);
    }

    #[test]
    fn test_short_drag_settles_back() {
        let mut app = app(vec![card(0), card(1)], DeckPolicy::Cycle);

        drag(&mut app, 130.0);
        let _ = app.update(Message::Tick(Instant::now() + Duration::from_secs(1)));

        assert_eq!(app.deck.order(), vec![CardKey(0), CardKey(1)]);
        assert!(app.deck.history().is_empty());
        assert_eq!(app.tab, Tab::Match);
    }

    #[test]
    fn test_tap_opens_detail_with_payload() {
        let mut app = app(vec![card(0), card(1)], DeckPolicy::Cycle);

        drag(&mut app, 2.0);

        assert_eq!(app.tab, Tab::Detail);
        assert_eq!(app.detail, Some(json!({ "name": "card 0" })));
    }

    #[test]
    fn test_load_for_consumed_card_is_ignored() {
        let mut app = app(vec![card(0), card(1)], DeckPolicy::Finite);

        drag(&mut app, -200.0);
        let _ = app.update(Message::Tick(Instant::now() + Duration::from_secs(1)));
        assert_eq!(app.deck.order(), vec![CardKey(1)]);

        let _ = app.update(Message::ImageLoaded {
            key: CardKey(0),
            token: 1,
            result: Ok(RemoteImage {
                handle: Handle::from_rgba(1, 1, vec![0, 0, 0, 255]),
                size: state::data::IntrinsicSize::new(10.0, 10.0),
            }),
        });

        assert_eq!(app.deck.order(), vec![CardKey(1)]);
        assert_eq!(app.deck.count(SwipeDirection::Left), 1);
    }

    #[test]
    fn test_unrenderable_top_card_is_inert() {
        let broken = Card {
            key: CardKey(0),
            source: json!(true),
            data: json!(null),
        };
        let mut app = app(vec![broken, card(1)], DeckPolicy::Cycle);

        drag(&mut app, 200.0);

        assert!(!app.slots[0].is_animating());
        assert_eq!(app.slots[0].offset(), Vector2::new(0.0, 0.0));
        assert_eq!(app.deck.order(), vec![CardKey(0), CardKey(1)]);
    }

    #[test]
    fn test_release_before_resize_settles_back() {
        let registry = AssetRegistry::default();
        let deck = CardStack::new(vec![card(0), card(1)], &registry, DeckPolicy::Cycle, 2);
        let mut app = SwipeMatch::with_deck(deck, SwipeTiming::default());

        drag(&mut app, 200.0);
        let _ = app.update(Message::Tick(Instant::now() + Duration::from_secs(1)));

        assert_eq!(app.deck.order(), vec![CardKey(0), CardKey(1)]);
    }
}
