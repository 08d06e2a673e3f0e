/* # Why provide an in-memory store implementation?

Service and rendering tests want a store with known content and no
filesystem. MemoryStore keeps the list in a Vec and implements the same
contract as the file-backed store, minus persistence.
*/

use stockroom_base::StockroomResult;

use crate::item::Item;
use crate::store::traits::ItemStore;

/// An in-memory item store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Vec<Item>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given items.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl ItemStore for MemoryStore {
    fn load(&self) -> StockroomResult<Vec<Item>> {
        Ok(self.items.clone())
    }

    fn save(&mut self, items: &[Item]) -> StockroomResult<()> {
        self.items = items.to_vec();
        Ok(())
    }
}
