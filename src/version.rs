#[cfg(not(feature = "clipboard"))]
pub const SHORT: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "clipboard")]
pub const SHORT: &str = concat!(env!("CARGO_PKG_VERSION"), " (features: clipboard)");

pub const LONG: &str = SHORT;
