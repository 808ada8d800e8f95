//! In-process stand-in for the browser's broadcast transport, used on
//! non-wasm targets. One hub per thread; endpoints are grouped by name.

use super::channel::Inbox;
use crate::models::SyncEvent;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct Endpoint {
    id: u64,
    name: String,
    inbox: Weak<Inbox>,
}

#[derive(Default)]
struct Hub {
    next_id: u64,
    endpoints: Vec<Endpoint>,
}

thread_local! {
    static HUB: RefCell<Hub> = RefCell::new(Hub::default());
}

pub(super) fn register(name: &str, inbox: &Rc<Inbox>) -> u64 {
    HUB.with(|hub| {
        let mut hub = hub.borrow_mut();
        hub.next_id += 1;
        let id = hub.next_id;
        hub.endpoints.push(Endpoint {
            id,
            name: name.to_string(),
            inbox: Rc::downgrade(inbox),
        });
        id
    })
}

pub(super) fn unregister(id: u64) {
    HUB.with(|hub| hub.borrow_mut().endpoints.retain(|e| e.id != id));
}

/// Queues `event` on every other live endpoint named `name`.
pub(super) fn publish(name: &str, from: u64, event: &SyncEvent) {
    let targets: Vec<Rc<Inbox>> = HUB.with(|hub| {
        let mut hub = hub.borrow_mut();
        hub.endpoints.retain(|e| e.inbox.strong_count() > 0);
        hub.endpoints
            .iter()
            .filter(|e| e.id != from && e.name == name)
            .filter_map(|e| e.inbox.upgrade())
            .collect()
    });

    for inbox in targets {
        inbox.push(event.clone());
    }
}

#[cfg(test)]
pub(super) fn endpoint_count(name: &str) -> usize {
    HUB.with(|hub| {
        hub.borrow()
            .endpoints
            .iter()
            .filter(|e| e.name == name && e.inbox.strong_count() > 0)
            .count()
    })
}
