/* # Why is the CLI minimal and hardcoded?

The CLI is intentionally kept minimal with no argument parsing:

1. No clap or similar dependency needed
2. Clear conventions: an optional `stockroom.toml` in the current directory
   is the only configuration surface
3. Arguments can be added later when use cases emerge

The workflow:
1. Change to the directory holding your store file and images
2. Run `stockroom`
3. Open the printed address in a browser

Exit codes:
- 0: Clean shutdown
- 1: Error (config parsing failed, store unreadable, server failed to bind)
*/

use std::env;
use std::process;
use std::time::Duration;

use stockroom_base::pal::http::HttpServerConfig;
use stockroom_base::tracing::init_tracing;
use stockroom_base::{FilePath, PalHandle, RealPal};
use stockroom_engine::store::{JsonFileStore, StoreHandle};
use stockroom_engine::{load_config, AppService};

fn main() {
    init_tracing().unwrap();

    let current_dir = env::current_dir().unwrap_or_else(|e| {
        eprintln!("Error: Failed to get current directory: {}", e);
        process::exit(1);
    });

    let pal = PalHandle::new(RealPal::new(current_dir));

    let config_path = FilePath::from("stockroom.toml");
    let config = match load_config(&pal, &config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config from stockroom.toml: {}", e);
            process::exit(1);
        }
    };

    println!("Configuration loaded: {}", config.title);

    let store = StoreHandle::new(JsonFileStore::new(
        pal.clone(),
        FilePath::from(config.store_path.as_str()),
        config.seed_items(),
    ));

    // Load once up front so the store file is seeded before the first request
    // and an unreadable store surfaces immediately instead of mid-request.
    match store.load() {
        Ok(items) => println!("Store ready with {} items", items.len()),
        Err(e) => {
            eprintln!("Error: Failed to open item store: {}", e);
            process::exit(1);
        }
    }

    let server_config = HttpServerConfig::new(config.host.clone()).with_port(config.port);
    let service = AppService::new(store, config.clone(), pal.clone());

    let handle = match pal.start_http_server(Box::new(service), server_config) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: Failed to start HTTP server: {}", e);
            process::exit(1);
        }
    };

    println!("Listening on http://{}", handle.address(&config.host));

    while !handle.is_shutdown() {
        std::thread::sleep(Duration::from_millis(250));
    }
}
