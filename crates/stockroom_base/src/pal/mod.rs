/* # What is the Platform Abstraction Layer?

The PAL provides a trait-based abstraction over filesystem and HTTP server
operations:
- Testability: MockPal allows deterministic unit tests without filesystem or
  network access
- Flexibility: switch between the real filesystem and in-memory implementations
- Consistency: all filesystem operations use the same error handling

Code depends on the abstraction (Pal trait), not on the concrete
implementations (RealPal or MockPal).
*/

mod file_path;
pub mod http;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{Pal, PalHandle};
