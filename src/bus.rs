use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::model::note::NoteId;

new_key_type! {
    pub struct SubscriptionId;
}

/// Notification topics shared between the panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    ListNext,
    ListPrior,
    LostFocus,
    NewNote,
    DetailDelete,
    DetailFocus,
    ListMoved,
}

impl Topic {
    pub fn name(&self) -> &'static str {
        match self {
            Topic::ListNext => "list:next",
            Topic::ListPrior => "list:prior",
            Topic::LostFocus => "lost:focus",
            Topic::NewNote => "top:new-note",
            Topic::DetailDelete => "detail:delete",
            Topic::DetailFocus => "detail:focus",
            Topic::ListMoved => "list:moved",
        }
    }
}

/// Handlers a subscription can route to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listener {
    SelectNext,
    SelectPrior,
    RestoreFocus,
    CommitDeletion(NoteId),
    RequestNewNote,
    DeleteSelected,
    FocusDetail,
}

pub type Delivered = SmallVec<[Listener; 4]>;

#[derive(Debug)]
struct Subscription {
    topic: Topic,
    listener: Listener,
    once: bool,
}

/// Observer registry with a queue of pending notifications.
///
/// `emit` only queues; `poll` delivers one topic at a time, so a handler that
/// emits again never re-enters the bus.
#[derive(Debug, Default)]
pub struct EventBus {
    subscriptions: SlotMap<SubscriptionId, Subscription>,
    queue: VecDeque<Topic>,
}

impl EventBus {
    pub fn on(&mut self, topic: Topic, listener: Listener) -> SubscriptionId {
        self.subscribe(topic, listener, false)
    }

    /// Subscribe for a single delivery.
    pub fn once(&mut self, topic: Topic, listener: Listener) -> SubscriptionId {
        self.subscribe(topic, listener, true)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(id).is_some()
    }

    pub fn emit(&mut self, topic: Topic) {
        tracing::trace!("emit {}", topic.name());
        self.queue.push_back(topic);
    }

    /// Deliver the oldest queued topic; one-shot subscriptions it reaches are removed.
    pub fn poll(&mut self) -> Option<(Topic, Delivered)> {
        let topic = self.queue.pop_front()?;

        let mut delivered = Delivered::new();
        let mut spent: SmallVec<[SubscriptionId; 2]> = SmallVec::new();
        for (id, sub) in &self.subscriptions {
            if sub.topic != topic {
                continue;
            }
            delivered.push(sub.listener.clone());
            if sub.once {
                spent.push(id);
            }
        }
        for id in spent {
            self.subscriptions.remove(id);
        }

        Some((topic, delivered))
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    fn subscribe(&mut self, topic: Topic, listener: Listener, once: bool) -> SubscriptionId {
        self.subscriptions.insert(Subscription {
            topic,
            listener,
            once,
        })
    }
}
