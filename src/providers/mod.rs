pub mod apilayer;
pub mod ecb;
pub mod util;

pub use apilayer::ApiLayerProvider;
pub use ecb::EcbProvider;
