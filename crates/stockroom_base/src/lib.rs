/* # Why have stockroom_base as a core library?

stockroom_base provides the foundational error handling, tracing setup, and
the platform abstraction layer used across all crates. This keeps error
handling consistent and prevents circular dependencies between crates.
*/

pub mod error;
pub mod pal;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{ResultExt, StockroomError, StockroomResult};
pub use pal::{FilePath, MockPal, Pal, PalHandle, RealPal};
