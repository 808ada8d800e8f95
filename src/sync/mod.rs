mod channel;
#[cfg(not(target_arch = "wasm32"))]
mod hub;

pub(crate) use channel::SyncChannel;

use crate::models::SyncEvent;
use leptos::prelude::*;

/// Anything a flow can announce a change through.
///
/// Flows publish after awaiting the backend, so they take this instead of a
/// borrowed channel; a view hands over its stored handle.
pub(crate) trait SyncPublisher {
    fn publish_event(&self, event: &SyncEvent);
}

impl SyncPublisher for SyncChannel {
    fn publish_event(&self, event: &SyncEvent) {
        self.publish(event);
    }
}

impl<P: SyncPublisher + ?Sized> SyncPublisher for &P {
    fn publish_event(&self, event: &SyncEvent) {
        (**self).publish_event(event);
    }
}

/// `None` is single-tab mode.
impl<P: SyncPublisher> SyncPublisher for Option<P> {
    fn publish_event(&self, event: &SyncEvent) {
        if let Some(publisher) = self {
            publisher.publish_event(event);
        }
    }
}

impl SyncPublisher for StoredValue<Option<SyncChannel>, LocalStorage> {
    fn publish_event(&self, event: &SyncEvent) {
        // Gone after unmount; nothing left to notify through.
        let _ = self.try_with_value(|channel| channel.publish_event(event));
    }
}
