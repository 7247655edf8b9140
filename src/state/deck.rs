/// The card stack
///
/// Holds the ordered card queue, decides which cards are visible and how
/// each layer is styled, rotates the queue when the top card is dismissed,
/// and owns the measured container size shared by every visible image.

use chrono::Utc;
use std::collections::VecDeque;

use super::config::DeckPolicy;
use super::data::{Card, CardKey, ContainerSize, Decision, SwipeDirection};
use crate::media::{AssetRegistry, DynamicImage};

/// Opacity lost per layer below the top
const OPACITY_STEP: f32 = 0.25;
/// Scale lost per layer below the top
const SCALE_STEP: f32 = 0.05;

/// A card together with its image sizing state
pub struct DeckEntry {
    pub card: Card,
    pub image: DynamicImage,
}

/// Cosmetic depth cue for a stack slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub opacity: f32,
    pub scale: f32,
}

impl LayerStyle {
    /// Style of slot `slot` (0 = top)
    pub fn for_slot(slot: usize) -> Self {
        let depth = slot as f32;
        Self {
            opacity: (1.0 - OPACITY_STEP * depth).max(0.0),
            scale: (1.0 - SCALE_STEP * depth).max(0.0),
        }
    }
}

/// Ordered queue of cards with layered rendering
pub struct CardStack {
    entries: VecDeque<DeckEntry>,
    policy: DeckPolicy,
    stack_size: usize,
    container: ContainerSize,
    history: Vec<Decision>,
}

impl CardStack {
    pub fn new(
        cards: Vec<Card>,
        registry: &AssetRegistry,
        policy: DeckPolicy,
        stack_size: usize,
    ) -> Self {
        let entries = cards
            .into_iter()
            .map(|card| {
                let image = DynamicImage::mount(&card.source, registry);
                DeckEntry { card, image }
            })
            .collect();

        Self {
            entries,
            policy,
            stack_size: stack_size.max(1),
            container: ContainerSize::default(),
            history: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    /// Keys in queue order
    pub fn order(&self) -> Vec<CardKey> {
        self.entries.iter().map(|entry| entry.card.key).collect()
    }

    /// The interactive card
    pub fn top(&self) -> Option<&DeckEntry> {
        self.entries.front()
    }

    /// Visible entries with their slot, logical order (top first)
    pub fn visible(&self) -> impl Iterator<Item = (usize, &DeckEntry)> {
        self.entries.iter().take(self.stack_size).enumerate()
    }

    /// Visible entries in paint order: the top card comes last
    pub fn paint_order(&self) -> Vec<(usize, &DeckEntry)> {
        let mut layers: Vec<_> = self.visible().collect();
        layers.reverse();
        layers
    }

    pub fn entry_mut(&mut self, key: CardKey) -> Option<&mut DeckEntry> {
        self.entries.iter_mut().find(|entry| entry.card.key == key)
    }

    /// Record a measured container size.
    ///
    /// Only an actual change fans out to the visible images; returns
    /// whether it did.
    pub fn measure(&mut self, size: ContainerSize) -> bool {
        if size == self.container {
            return false;
        }

        tracing::debug!("Container resized to {}x{}", size.width, size.height);
        self.container = size;
        self.sync_visible();
        true
    }

    /// Remove the top card after it left in `direction`.
    ///
    /// Cycling puts it at the back; the relative order of the other cards
    /// never changes.
    pub fn dismiss(&mut self, direction: SwipeDirection) -> Option<Decision> {
        let entry = self.entries.pop_front()?;
        let key = entry.card.key;

        let decision = Decision {
            key,
            direction,
            at: Utc::now(),
        };
        self.history.push(decision.clone());

        match self.policy {
            DeckPolicy::Cycle => self.entries.push_back(entry),
            DeckPolicy::Finite => {
                tracing::debug!("Card {} consumed, {} left", key, self.entries.len());
            }
        }

        self.sync_visible();
        Some(decision)
    }

    /// Remote fetches the visible cards still need, as (key, token, uri)
    pub fn pending_loads(&mut self) -> Vec<(CardKey, u64, String)> {
        let stack_size = self.stack_size;
        self.entries
            .iter_mut()
            .take(stack_size)
            .filter_map(|entry| {
                let (token, uri) = entry.image.load_request()?;
                Some((entry.card.key, token, uri))
            })
            .collect()
    }

    pub fn history(&self) -> &[Decision] {
        &self.history
    }

    /// Number of decisions made in `direction`
    pub fn count(&self, direction: SwipeDirection) -> usize {
        self.history()
            .iter()
            .filter(|decision| decision.direction == direction)
            .count()
    }

    /// Push the current container size into every visible image
    fn sync_visible(&mut self) {
        let container = self.container;
        for entry in self.entries.iter_mut().take(self.stack_size) {
            entry.image.set_container(container);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(key: u64, width: u32, height: u32) -> Card {
        Card {
            key: CardKey(key),
            source: json!({
                "uri": format!("https://example.com/{}.png", key),
                "width": width,
                "height": height,
            }),
            data: json!({ "id": key }),
        }
    }

    fn deck(count: u64, policy: DeckPolicy) -> CardStack {
        let cards = (0..count).map(|key| card(key, 1200, 800)).collect();
        CardStack::new(cards, &AssetRegistry::default(), policy, 2)
    }

    #[test]
    fn test_cyclic_rotation() {
        let mut stack = deck(3, DeckPolicy::Cycle);

        let decision = stack.dismiss(SwipeDirection::Right).unwrap();
        assert_eq!(decision.key, CardKey(0));
        assert_eq!(decision.direction, SwipeDirection::Right);
        assert_eq!(stack.order(), vec![CardKey(1), CardKey(2), CardKey(0)]);

        stack.dismiss(SwipeDirection::Left);
        assert_eq!(stack.order(), vec![CardKey(2), CardKey(0), CardKey(1)]);
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_finite_consumption() {
        let mut stack = deck(3, DeckPolicy::Finite);

        stack.dismiss(SwipeDirection::Left);
        assert_eq!(stack.order(), vec![CardKey(1), CardKey(2)]);

        stack.dismiss(SwipeDirection::Left);
        stack.dismiss(SwipeDirection::Right);
        assert!(stack.is_empty());
        assert!(stack.dismiss(SwipeDirection::Right).is_none());
        assert_eq!(stack.history().len(), 3);
    }

    #[test]
    fn test_history_counts() {
        let mut stack = deck(3, DeckPolicy::Cycle);
        stack.dismiss(SwipeDirection::Right);
        stack.dismiss(SwipeDirection::Right);
        stack.dismiss(SwipeDirection::Left);

        assert_eq!(stack.count(SwipeDirection::Right), 2);
        assert_eq!(stack.count(SwipeDirection::Left), 1);
        assert_eq!(stack.history()[0].key, CardKey(0));
    }

    #[test]
    fn test_paint_order_puts_top_last() {
        let stack = deck(3, DeckPolicy::Cycle);

        let slots: Vec<(usize, CardKey)> = stack
            .paint_order()
            .into_iter()
            .map(|(slot, entry)| (slot, entry.card.key))
            .collect();

        assert_eq!(slots, vec![(1, CardKey(1)), (0, CardKey(0))]);
    }

    #[test]
    fn test_layer_style() {
        assert_eq!(LayerStyle::for_slot(0), LayerStyle { opacity: 1.0, scale: 1.0 });

        let second = LayerStyle::for_slot(1);
        assert!(second.opacity < 1.0 && second.scale < 1.0);
        let third = LayerStyle::for_slot(2);
        assert!(third.opacity < second.opacity && third.scale < second.scale);
    }

    #[test]
    fn test_measure_only_on_change() {
        let mut stack = deck(3, DeckPolicy::Cycle);

        assert!(stack.measure(ContainerSize::new(300.0, 600.0)));
        assert!(!stack.measure(ContainerSize::new(300.0, 600.0)));

        let size = stack.top().unwrap().image.render_size();
        assert_eq!((size.render_width, size.render_height), (300.0, 200.0));
    }

    #[test]
    fn test_card_entering_view_gets_container() {
        let mut stack = deck(3, DeckPolicy::Cycle);
        stack.measure(ContainerSize::new(300.0, 600.0));

        // Card 2 is outside the two visible slots until the first dismissal
        let hidden = stack.entry_mut(CardKey(2)).unwrap().image.render_size();
        assert_eq!(hidden.render_width, 0.0);

        stack.dismiss(SwipeDirection::Left);
        let shown = stack.entry_mut(CardKey(2)).unwrap().image.render_size();
        assert_eq!((shown.render_width, shown.render_height), (300.0, 200.0));
    }

    #[test]
    fn test_pending_loads_only_for_visible() {
        let cards = vec![
            Card { key: CardKey(0), source: json!("https://example.com/0.png"), data: json!(null) },
            Card { key: CardKey(1), source: json!("https://example.com/1.png"), data: json!(null) },
            Card { key: CardKey(2), source: json!("https://example.com/2.png"), data: json!(null) },
        ];
        let mut stack = CardStack::new(cards, &AssetRegistry::default(), DeckPolicy::Cycle, 2);

        let loads = stack.pending_loads();
        let keys: Vec<CardKey> = loads.iter().map(|(key, _, _)| *key).collect();
        assert_eq!(keys, vec![CardKey(0), CardKey(1)]);

        for (key, token, _) in loads {
            stack.entry_mut(key).unwrap().image.begin_load(token, None);
        }
        assert!(stack.pending_loads().is_empty());

        stack.dismiss(SwipeDirection::Right);
        let keys: Vec<CardKey> = stack.pending_loads().iter().map(|(key, _, _)| *key).collect();
        assert_eq!(keys, vec![CardKey(2)]);
    }
}
