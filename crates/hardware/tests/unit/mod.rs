pub mod cdc;
pub mod hyperbus;
pub mod sim;
