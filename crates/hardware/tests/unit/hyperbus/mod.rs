pub mod burst_window;
pub mod timeouts;
pub mod transactions;
