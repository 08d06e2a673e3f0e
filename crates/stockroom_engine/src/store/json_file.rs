/* # Why a pretty-printed JSON array on disk?

The store file doubles as a human-readable inventory: people open items.json
in an editor to see what is in stock. Pretty-printing costs nothing at this
scale and keeps diffs reviewable.
*/

use tracing::{debug, instrument, warn};

use stockroom_base::{FilePath, PalHandle, ResultExt, StockroomResult};

use crate::item::Item;
use crate::store::traits::ItemStore;

/// Item store backed by a single JSON file.
///
/// The file holds one JSON array of item objects. A missing file is created
/// with the seed records on first load; a file that exists but does not parse
/// is treated as an empty list so the application stays usable, and the next
/// save overwrites the corrupt content.
pub struct JsonFileStore {
    pal: PalHandle,
    path: FilePath,
    seed: Vec<Item>,
}

impl JsonFileStore {
    pub fn new(pal: PalHandle, path: FilePath, seed: Vec<Item>) -> Self {
        Self { pal, path, seed }
    }
}

impl ItemStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path))]
    fn load(&self) -> StockroomResult<Vec<Item>> {
        if !self.pal.file_exists(&self.path)? {
            debug!("store file missing, writing seed records");
            write_items(&self.pal, &self.path, &self.seed)?;
            return Ok(self.seed.clone());
        }

        let bytes = self
            .pal
            .read_file_to_bytes(&self.path)
            .with_context(|| format!("Loading item store '{}'", self.path))?;

        match serde_json::from_slice::<Vec<Item>>(&bytes) {
            Ok(items) => Ok(items),
            Err(error) => {
                // Fail soft on corrupt content: an unreadable store must not
                // take the whole application down.
                warn!(%error, path = %self.path, "store file is not a valid item list, treating as empty");
                Ok(vec![])
            }
        }
    }

    #[instrument(skip(self, items), fields(path = %self.path, count = items.len()))]
    fn save(&mut self, items: &[Item]) -> StockroomResult<()> {
        write_items(&self.pal, &self.path, items)
    }
}

fn write_items(pal: &PalHandle, path: &FilePath, items: &[Item]) -> StockroomResult<()> {
    let json = serde_json::to_string_pretty(items)
        .map_err(|e| stockroom_base::err!("Failed to serialize item store {}: {}", path, e))?;
    pal.write_file(path, json.as_bytes())
        .with_context(|| format!("Writing item store '{}'", path))?;
    Ok(())
}
