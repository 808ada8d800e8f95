use crate::config::SyncConfig;
use crate::error::FlowError;
use crate::models::SyncEvent;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

type Handler = Box<dyn FnMut(SyncEvent)>;

/// Inbound side of one endpoint: a typed queue plus the handler draining it.
#[derive(Default)]
pub(super) struct Inbox {
    queue: RefCell<VecDeque<SyncEvent>>,
    handler: RefCell<Option<Handler>>,
    dispatching: Cell<bool>,
    closed: Cell<bool>,
}

impl Inbox {
    pub(super) fn push(&self, event: SyncEvent) {
        if self.closed.get() {
            return;
        }
        self.queue.borrow_mut().push_back(event);
    }

    /// Runs the handler once per queued event, in arrival order.
    ///
    /// Events that arrive while the handler runs are appended to the queue
    /// and picked up by the outer loop; the handler is never re-entered.
    pub(super) fn dispatch(&self) -> usize {
        if self.dispatching.replace(true) {
            return 0;
        }

        let mut delivered = 0;
        while !self.closed.get() {
            let Some(mut handler) = self.handler.borrow_mut().take() else {
                break;
            };
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                self.restore_handler(handler);
                break;
            };

            handler(event);
            delivered += 1;
            self.restore_handler(handler);
        }

        self.dispatching.set(false);
        delivered
    }

    fn restore_handler(&self, handler: Handler) {
        let mut slot = self.handler.borrow_mut();
        // A handler installed (or a close) during the call wins.
        if slot.is_none() && !self.closed.get() {
            *slot = Some(handler);
        }
    }

    fn close(&self) {
        self.closed.set(true);
        self.queue.borrow_mut().clear();
        self.handler.borrow_mut().take();
    }
}

enum Transport {
    #[cfg(target_arch = "wasm32")]
    Browser {
        channel: web_sys::BroadcastChannel,
        _on_message: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::MessageEvent)>,
    },
    #[cfg(not(target_arch = "wasm32"))]
    Local { endpoint_id: u64 },
    Closed,
}

/// Same-origin, cross-tab publish/subscribe endpoint.
///
/// Every open endpoint with the same name receives what the others publish;
/// the publisher never receives its own events. Delivery is best effort and
/// nothing is persisted. The handle is released on `close` or drop.
pub(crate) struct SyncChannel {
    name: String,
    inbox: Rc<Inbox>,
    transport: Transport,
}

impl SyncChannel {
    pub(crate) fn open(config: &SyncConfig) -> Result<Self, FlowError> {
        let name = config.channel_name.clone();
        let inbox = Rc::new(Inbox::default());
        let transport = Self::connect(&name, &inbox)?;

        log::debug!("sync channel '{name}' opened");
        Ok(Self {
            name,
            inbox,
            transport,
        })
    }

    /// Like `open`, but logs and returns `None` when cross-tab sync is not
    /// available so the caller keeps working in single-tab mode.
    pub(crate) fn open_or_degrade(config: &SyncConfig) -> Option<Self> {
        match Self::open(config) {
            Ok(channel) => Some(channel),
            Err(e) => {
                log::info!("continuing without cross-tab sync: {e}");
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn connect(name: &str, inbox: &Rc<Inbox>) -> Result<Transport, FlowError> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let channel = web_sys::BroadcastChannel::new(name)
            .map_err(|e| FlowError::ChannelUnavailable(format!("{e:?}")))?;

        let target = Rc::downgrade(inbox);
        let on_message = Closure::wrap(Box::new(move |ev: web_sys::MessageEvent| {
            let Some(inbox) = target.upgrade() else {
                return;
            };
            let raw = js_sys::JSON::stringify(&ev.data())
                .ok()
                .map(String::from)
                .unwrap_or_default();
            match serde_json::from_str::<SyncEvent>(&raw) {
                Ok(event) => {
                    inbox.push(event);
                    inbox.dispatch();
                }
                Err(e) => log::warn!("dropping malformed sync message: {e}"),
            }
        }) as Box<dyn FnMut(web_sys::MessageEvent)>);

        channel.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        Ok(Transport::Browser {
            channel,
            _on_message: on_message,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn connect(name: &str, inbox: &Rc<Inbox>) -> Result<Transport, FlowError> {
        let endpoint_id = super::hub::register(name, inbox);
        Ok(Transport::Local { endpoint_id })
    }

    #[cfg(test)]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_closed(&self) -> bool {
        matches!(self.transport, Transport::Closed)
    }

    /// Fire-and-forget. Failures are logged, never returned.
    pub(crate) fn publish(&self, event: &SyncEvent) {
        match &self.transport {
            #[cfg(target_arch = "wasm32")]
            Transport::Browser { channel, .. } => {
                let posted = serde_json::to_string(event)
                    .map_err(|e| format!("{e}"))
                    .and_then(|json| js_sys::JSON::parse(&json).map_err(|e| format!("{e:?}")))
                    .and_then(|value| channel.post_message(&value).map_err(|e| format!("{e:?}")));
                if let Err(e) = posted {
                    log::warn!("sync publish on '{}' failed: {e}", self.name);
                }
            }
            #[cfg(not(target_arch = "wasm32"))]
            Transport::Local { endpoint_id } => {
                super::hub::publish(&self.name, *endpoint_id, event);
            }
            Transport::Closed => {
                log::debug!("publish on closed channel '{}' ignored", self.name);
            }
        }
    }

    /// Installs the handler, replacing any previous one, and delivers
    /// whatever is already queued.
    pub(crate) fn subscribe(&self, handler: impl FnMut(SyncEvent) + 'static) {
        if self.is_closed() {
            return;
        }
        *self.inbox.handler.borrow_mut() = Some(Box::new(handler));
        self.inbox.dispatch();
    }

    /// Delivers queued inbound events to the handler. Returns how many ran.
    ///
    /// The browser transport dispatches on every message by itself; the
    /// in-process transport leaves it to the receiver.
    #[cfg(test)]
    pub(crate) fn dispatch_pending(&self) -> usize {
        self.inbox.dispatch()
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.inbox.queue.borrow().len()
    }

    pub(crate) fn close(&mut self) {
        match std::mem::replace(&mut self.transport, Transport::Closed) {
            #[cfg(target_arch = "wasm32")]
            Transport::Browser { channel, .. } => {
                channel.set_onmessage(None);
                channel.close();
            }
            #[cfg(not(target_arch = "wasm32"))]
            Transport::Local { endpoint_id } => {
                super::hub::unregister(endpoint_id);
            }
            Transport::Closed => return,
        }
        self.inbox.close();
        log::debug!("sync channel '{}' closed", self.name);
    }
}

impl Drop for SyncChannel {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SyncChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncChannel")
            .field("name", &self.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::models::Bookmark;
    use chrono::{TimeZone, Utc};

    fn cfg(name: &str) -> SyncConfig {
        SyncConfig::new(name)
    }

    fn delete(id: &str) -> SyncEvent {
        SyncEvent::Delete { id: id.to_string() }
    }

    fn recorder(channel: &SyncChannel) -> Rc<RefCell<Vec<SyncEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        channel.subscribe(move |ev| sink.borrow_mut().push(ev));
        seen
    }

    #[test]
    fn test_publish_reaches_other_endpoints_but_not_self() {
        let a = SyncChannel::open(&cfg("ch-self")).expect("open a");
        let b = SyncChannel::open(&cfg("ch-self")).expect("open b");
        let seen_a = recorder(&a);
        let seen_b = recorder(&b);

        a.publish(&delete("1"));
        assert_eq!(a.dispatch_pending(), 0);
        assert_eq!(b.dispatch_pending(), 1);

        assert!(seen_a.borrow().is_empty());
        assert_eq!(*seen_b.borrow(), vec![delete("1")]);
    }

    #[test]
    fn test_channels_with_other_names_are_isolated() {
        let a = SyncChannel::open(&cfg("ch-one")).expect("open a");
        let b = SyncChannel::open(&cfg("ch-two")).expect("open b");
        a.publish(&delete("1"));
        assert_eq!(b.pending(), 0);
    }

    #[test]
    fn test_delivery_preserves_post_order() {
        let a = SyncChannel::open(&cfg("ch-order")).expect("open a");
        let b = SyncChannel::open(&cfg("ch-order")).expect("open b");
        let seen = recorder(&b);

        let insert = SyncEvent::Insert {
            bookmark: Bookmark {
                id: "1".to_string(),
                title: "Docs".to_string(),
                url: "https://docs.example.com".to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            },
        };
        a.publish(&insert);
        a.publish(&delete("1"));
        b.dispatch_pending();

        assert_eq!(*seen.borrow(), vec![insert, delete("1")]);
    }

    #[test]
    fn test_events_queue_until_subscribed() {
        let a = SyncChannel::open(&cfg("ch-queue")).expect("open a");
        let b = SyncChannel::open(&cfg("ch-queue")).expect("open b");
        a.publish(&delete("1"));
        assert_eq!(b.pending(), 1);

        let seen = recorder(&b);
        assert_eq!(*seen.borrow(), vec![delete("1")]);
        assert_eq!(b.pending(), 0);
    }

    #[test]
    fn test_closed_endpoint_stops_receiving() {
        let a = SyncChannel::open(&cfg("ch-close")).expect("open a");
        let mut b = SyncChannel::open(&cfg("ch-close")).expect("open b");
        let seen = recorder(&b);

        b.close();
        assert!(b.is_closed());
        b.close();

        a.publish(&delete("1"));
        assert_eq!(b.dispatch_pending(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_dropped_endpoint_is_unregistered() {
        let a = SyncChannel::open(&cfg("ch-drop")).expect("open a");
        {
            let _b = SyncChannel::open(&cfg("ch-drop")).expect("open b");
            assert_eq!(super::super::hub::endpoint_count("ch-drop"), 2);
        }
        assert_eq!(super::super::hub::endpoint_count("ch-drop"), 1);
        a.publish(&delete("1"));
    }

    #[test]
    fn test_handler_publishing_during_dispatch_does_not_reenter() {
        let a = Rc::new(SyncChannel::open(&cfg("ch-reenter")).expect("open a"));
        let b = Rc::new(SyncChannel::open(&cfg("ch-reenter")).expect("open b"));

        // b echoes every delete back; a counts what it gets.
        let echo = b.clone();
        b.subscribe(move |ev| {
            if let SyncEvent::Delete { id } = ev {
                echo.publish(&SyncEvent::Delete {
                    id: format!("{id}-echo"),
                });
            }
        });
        let seen_a = recorder(&a);

        a.publish(&delete("1"));
        a.publish(&delete("2"));
        assert_eq!(b.dispatch_pending(), 2);
        assert_eq!(a.dispatch_pending(), 2);
        assert_eq!(*seen_a.borrow(), vec![delete("1-echo"), delete("2-echo")]);
    }
}
