pub mod config_io;
pub mod lock;
pub mod persist;
pub mod state;
pub mod store;
