/// Typed tab lifecycle events and their dispatcher
///
/// Browser listeners push events into an `EventSender`; a single
/// `EventPump` task hands them to every subscribed handler, one event at a
/// time and in arrival order. A handler's awaits never let the next event in.
use std::rc::Rc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::{Error, Result};
use crate::tab_data::{ActiveInfo, ChangeInfo, Tab};

#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    Created(Tab),
    Updated {
        tab_id: i32,
        change: ChangeInfo,
        tab: Tab,
    },
    Activated(ActiveInfo),
    Removed {
        tab_id: i32,
    },
    /// Already open when the background started
    Discovered(Tab),
}

#[async_trait(?Send)]
pub trait TabEventHandler {
    async fn handle(&self, event: &TabEvent) -> Result<()>;
}

#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Rc<dyn TabEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: Rc<dyn TabEventHandler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    /// Freeze the subscriber list and open the event queue
    pub fn start(self) -> (EventSender, EventPump) {
        let (tx, rx) = mpsc::unbounded();
        (
            EventSender { tx },
            EventPump {
                rx,
                handlers: self.handlers,
            },
        )
    }
}

#[derive(Clone)]
pub struct EventSender {
    tx: UnboundedSender<TabEvent>,
}

impl EventSender {
    pub fn send(&self, event: TabEvent) -> Result<()> {
        self.tx
            .unbounded_send(event)
            .map_err(|_| Error::DispatcherClosed)
    }
}

pub struct EventPump {
    rx: UnboundedReceiver<TabEvent>,
    handlers: Vec<Rc<dyn TabEventHandler>>,
}

impl EventPump {
    /// Deliver events until every sender is dropped
    pub async fn run(mut self) {
        while let Some(event) = self.rx.next().await {
            for handler in &self.handlers {
                if let Err(e) = handler.handle(&event).await {
                    log::error!("Tab event handler failed on {:?}: {}", event, e);
                }
            }
        }
        log::debug!("Tab event queue closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{create_test_tab, yield_now};
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        log: RefCell<Vec<String>>,
        fail_on_removed: bool,
    }

    #[async_trait(?Send)]
    impl TabEventHandler for Recorder {
        async fn handle(&self, event: &TabEvent) -> Result<()> {
            let name = match event {
                TabEvent::Created(tab) | TabEvent::Discovered(tab) => format!("tab {:?}", tab.id),
                TabEvent::Updated { tab_id, .. } => format!("updated {}", tab_id),
                TabEvent::Activated(info) => format!("activated {}", info.tab_id),
                TabEvent::Removed { tab_id } => format!("removed {}", tab_id),
            };
            self.log.borrow_mut().push(format!("begin {}", name));
            yield_now().await;
            self.log.borrow_mut().push(format!("end {}", name));

            if self.fail_on_removed && matches!(event, TabEvent::Removed { .. }) {
                return Err(Error::Storage("boom".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_events_delivered_in_order_without_overlap() {
        let recorder = Rc::new(Recorder::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(recorder.clone());
        let (sender, pump) = dispatcher.start();

        sender.send(TabEvent::Created(create_test_tab(1, "https://a.com", "A"))).unwrap();
        sender
            .send(TabEvent::Activated(ActiveInfo { tab_id: 1, window_id: 1 }))
            .unwrap();
        sender.send(TabEvent::Removed { tab_id: 1 }).unwrap();
        drop(sender);

        block_on(pump.run());

        assert_eq!(
            *recorder.log.borrow(),
            vec![
                "begin tab Some(1)",
                "end tab Some(1)",
                "begin activated 1",
                "end activated 1",
                "begin removed 1",
                "end removed 1",
            ]
        );
    }

    #[test]
    fn test_every_subscriber_sees_each_event() {
        let first = Rc::new(Recorder {
            fail_on_removed: true,
            ..Recorder::default()
        });
        let second = Rc::new(Recorder::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(first.clone()).subscribe(second.clone());
        let (sender, pump) = dispatcher.start();

        sender.send(TabEvent::Removed { tab_id: 4 }).unwrap();
        sender.send(TabEvent::Removed { tab_id: 5 }).unwrap();
        drop(sender);
        block_on(pump.run());

        // A failing handler does not stop delivery
        assert_eq!(first.log.borrow().len(), 4);
        assert_eq!(second.log.borrow().len(), 4);
    }

    #[test]
    fn test_send_after_pump_dropped() {
        let (sender, pump) = EventDispatcher::new().start();
        drop(pump);

        let err = sender.send(TabEvent::Removed { tab_id: 1 }).unwrap_err();

        assert!(matches!(err, Error::DispatcherClosed));
    }
}
