//! Multi-currency handling and exchange-rate resolution.

pub mod code;
pub mod conversion;
pub mod error;
pub mod resolver;
pub mod types;

pub use code::normalize_code;
pub use conversion::convert_amount;
pub use error::{ProviderError, RateStoreError};
pub use resolver::{ExchangeRates, RateProvider, RateResolver, RateStore, ResolverPolicy};
pub use types::{CachedRate, Conversion, RateOrigin, RateResolution, ResolutionMethod};
