pub mod level2;
pub mod pool;
pub mod quote;

pub use level2::{decode_u64_vec, Level, Level2Snapshot, FLOAT_SCALAR};
pub use pool::{fetch_pool, parse_pool, Pool, PoolRegistry};
pub use quote::{simulate_market_buy, simulate_market_sell, QuoteProvider, Quoter, SwapQuote};
