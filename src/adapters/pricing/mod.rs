//! Pricing oracle adapters.
//!
//! - `static_table` - fixed prices from configuration or built-in list prices
//! - `http_oracle` - remote price service

mod http_oracle;
mod static_table;

pub use http_oracle::HttpPricingOracle;
pub use static_table::StaticPriceTable;
