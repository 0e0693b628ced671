pub mod asx;
pub mod client;
pub mod eodhd;
pub mod model;
pub mod numeric;
pub mod rate_limit;
pub mod realtime;

pub use client::MarketDataClient;
pub use model::{MarketBar, RealTimeQuote};
