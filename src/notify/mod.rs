// ============================================================================
// spark-observable - Notification Module
// Handler registries and the change-notification contract
// ============================================================================

pub mod handlers;
pub mod notifier;

pub use handlers::{HandlerId, HandlerList, Subscription};
pub use notifier::{
    ChangeNotifier, CollectionHandler, NotifyCollectionChanged, NotifyPropertyChanged,
    PropertyHandler,
};
