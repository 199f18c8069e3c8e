pub mod harness;
pub mod mocks;

pub use harness::LinkHarness;
