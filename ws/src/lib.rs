//! WishStore - persisted set-collection store
//!
//! Keeps an ordered collection of uniquely keyed items in memory and mirrors
//! it to a single durable key-value slot after every mutation. The storefront
//! wishlist is the concrete instance: [`CollectionItem`] keyed by product id.
//!
//! # Layout
//!
//! ```text
//! {slot_dir}/
//! ├── handloom.wishlist.json   # JSON array of items, rewritten on every flush
//! └── handloom.wishlist.lock   # advisory write lock
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wishstore::{CollectionItem, FileSlot, Wishlist};
//!
//! let slot = FileSlot::open(".wishstore")?;
//! let mut wishlist = Wishlist::open(slot, wishstore::DEFAULT_SLOT_KEY)?;
//! wishlist.add(CollectionItem::new(1, "Ikat Saree", 4200.0, 5600.0, "/img/ikat.jpg"))?;
//! assert!(wishlist.contains(&1));
//! ```

pub mod cli;
pub mod config;
mod error;
mod item;
mod observer;
mod slot;
mod store;

pub use error::{SlotError, StoreError, StoreResult};
pub use item::{CollectionItem, Keyed};
pub use observer::{Change, ChangeKind, SubscriptionId};
pub use slot::{DurableSlot, FileSlot, MemorySlot};
pub use store::PersistedCollectionStore;

/// Default slot key for the storefront wishlist
pub const DEFAULT_SLOT_KEY: &str = "handloom.wishlist";

/// The storefront wishlist: collection items keyed by product id
pub type Wishlist<S> = PersistedCollectionStore<CollectionItem, S>;
