/* # Why an ItemStore trait?

The trait abstracts how the item list is persisted:

1. JsonFileStore: the real flat-file backend
2. MemoryStore: fast, isolated tests without filesystem setup

The original design rewrote a file inline in the request handler with no
abstraction at all; pulling the store behind a trait makes the handler
testable and gives a single place to hang the persistence contract.
*/

use std::sync::Arc;

use parking_lot::RwLock;

use stockroom_base::StockroomResult;

use crate::item::Item;

/// Trait for item list storage implementations.
///
/// The item list is an insertion-ordered sequence that only grows; there is
/// no update or delete operation. Every save rewrites the full list.
pub trait ItemStore: Send + Sync + 'static {
    /// Load the full item list.
    ///
    /// A store that has never been written returns its seed content after
    /// writing it out, so the first load is observable on disk and every
    /// later load returns the same records.
    fn load(&self) -> StockroomResult<Vec<Item>>;

    /// Persist the full item list, replacing whatever was stored before.
    fn save(&mut self, items: &[Item]) -> StockroomResult<()>;

    /// Append one item and persist the grown list.
    ///
    /// Returns the updated list. This is a full read-modify-write; callers
    /// must go through [`StoreHandle`] so concurrent appends in the same
    /// process are serialized.
    fn append(&mut self, item: Item) -> StockroomResult<Vec<Item>> {
        let mut items = self.load()?;
        items.push(item);
        self.save(&items)?;
        Ok(items)
    }
}

/* # Why StoreHandle with a RwLock?

Requests are handled on server threads; two submissions arriving together
would both do load-push-save and the slower one would silently drop the
faster one's item. The write lock in append() serializes the read-modify-write
within the process. (Separate processes writing the same file still race;
that is outside this application's scope.)
*/

/// A thread-safe handle to an item store.
///
/// Cheap to clone (Arc) with interior mutability (RwLock), following the
/// same pattern as `PalHandle` in stockroom_base.
#[derive(Clone)]
pub struct StoreHandle(Arc<RwLock<dyn ItemStore>>);

impl StoreHandle {
    /// Create a new StoreHandle wrapping the given store implementation.
    pub fn new<S: ItemStore>(store: S) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    /// Load the full item list.
    ///
    /// See [`ItemStore::load`] for details.
    pub fn load(&self) -> StockroomResult<Vec<Item>> {
        self.0.read().load()
    }

    /// Persist the full item list.
    ///
    /// See [`ItemStore::save`] for details.
    pub fn save(&self, items: &[Item]) -> StockroomResult<()> {
        self.0.write().save(items)
    }

    /// Append one item under the write lock.
    ///
    /// See [`ItemStore::append`] for details.
    pub fn append(&self, item: Item) -> StockroomResult<Vec<Item>> {
        self.0.write().append(item)
    }
}
