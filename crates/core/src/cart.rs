//! Cart state and its reconciliation rules.
//!
//! ## Invariants
//!
//! - `total` equals the exact sum of every item's price.
//! - No two items share the same `(id, kind)` pair.
//!
//! Every transition re-sums the whole cart instead of adjusting the total
//! incrementally, so add/remove cycles cannot drift. Deserialization enforces
//! both invariants too, which repairs carts persisted by older builds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::catalog::{Event, Package};
use crate::types::Price;

/// What a cart line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartItemKind {
    Event,
    Package,
}

impl CartItemKind {
    /// Lowercase name, as used in the persisted cart.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Package => "package",
        }
    }
}

impl std::fmt::Display for CartItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line in the cart.
///
/// Only `id`, `kind` and `price` take part in reconciliation; everything
/// else travels along untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: CartItemKind,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CartItem {
    /// Create a bare cart item.
    #[must_use]
    pub fn new(id: Uuid, kind: CartItemKind, price: Price) -> Self {
        Self {
            id,
            kind,
            price,
            title: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether this item has the given identity.
    #[must_use]
    pub fn matches(&self, id: Uuid, kind: CartItemKind) -> bool {
        self.id == id && self.kind == kind
    }
}

impl From<&Event> for CartItem {
    fn from(event: &Event) -> Self {
        let mut item = Self::new(event.id.as_uuid(), CartItemKind::Event, event.price)
            .with_title(event.title.clone());
        item.extra.insert(
            "start_date".to_string(),
            serde_json::Value::String(event.start_date.to_rfc3339()),
        );
        item.extra.insert(
            "venue_id".to_string(),
            serde_json::Value::String(event.venue_id.to_string()),
        );
        item
    }
}

impl From<&Package> for CartItem {
    fn from(package: &Package) -> Self {
        let mut item = Self::new(package.id.as_uuid(), CartItemKind::Package, package.price)
            .with_title(package.name.clone());
        item.extra.insert(
            "duration_days".to_string(),
            serde_json::Value::from(package.duration_days),
        );
        item
    }
}

/// Contents of the shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "RawCartState")]
pub struct CartState {
    items: Vec<CartItem>,
    total: Price,
}

/// Unchecked on-disk shape; converted through [`CartState::from_items`].
#[derive(Deserialize)]
struct RawCartState {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl From<RawCartState> for CartState {
    fn from(raw: RawCartState) -> Self {
        Self::from_items(raw.items)
    }
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Price::ZERO,
        }
    }

    /// Build a cart from arbitrary items, dropping later duplicates.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut deduped: Vec<CartItem> = Vec::new();
        for item in items {
            if !deduped.iter().any(|i| i.matches(item.id, item.kind)) {
                deduped.push(item);
            }
        }
        Self::with_recomputed_total(deduped)
    }

    fn with_recomputed_total(items: Vec<CartItem>) -> Self {
        let total = items.iter().map(|item| item.price).sum();
        Self { items, total }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of all item prices.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an item with this identity is in the cart.
    #[must_use]
    pub fn contains(&self, id: Uuid, kind: CartItemKind) -> bool {
        self.items.iter().any(|item| item.matches(id, kind))
    }

    /// The cart with `item` appended.
    ///
    /// Returns an identical cart if an item with the same `(id, kind)` is
    /// already present.
    #[must_use]
    pub fn with_item(&self, item: CartItem) -> Self {
        if self.contains(item.id, item.kind) {
            return self.clone();
        }

        let mut items = self.items.clone();
        items.push(item);
        Self::with_recomputed_total(items)
    }

    /// The cart without any item matching `(id, kind)`.
    #[must_use]
    pub fn without_item(&self, id: Uuid, kind: CartItemKind) -> Self {
        let items = self
            .items
            .iter()
            .filter(|item| !item.matches(id, kind))
            .cloned()
            .collect();
        Self::with_recomputed_total(items)
    }
}
