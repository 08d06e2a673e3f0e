pub mod config;
pub mod flash;
pub mod form;
pub mod gallery;
pub mod item;
pub mod render;
pub mod service;
pub mod store;

pub use config::{load_config, Config};
pub use flash::Flash;
pub use form::FormData;
pub use item::{validate_submission, Item, ValidationError};
pub use service::AppService;
pub use store::{ItemStore, JsonFileStore, MemoryStore, StoreHandle};
