// ============================================================================
// spark-observable - Property Proxy Module
// Change notification for plain values through a declared schema
// ============================================================================

mod property_proxy;
mod schema;

pub use property_proxy::PropertyProxy;
pub use schema::Schema;
