pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod poller;
pub mod source;
pub mod state;
pub mod stats;
pub mod storage;
pub mod targets;
pub mod ui;
pub mod winner;

pub use app::router;
pub use config::Config;
pub use poller::spawn_poller;
pub use source::StoreClient;
pub use state::AppState;
pub use storage::load_winners;
pub use targets::TargetTable;
