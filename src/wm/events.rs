//! Events Module
//!
//! Observable state changes of the window manager, and the subscriber list the
//! shell publishes them through.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shared::Geometry;
use crate::wm::WindowId;
use crate::wm::resize::ResizeDirection;
use crate::wm::snap::SnapZone;

// ============================================================================
// Window manager events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WmEvent {
    /// A window was created for an application
    WindowOpened {
        id: WindowId,
        app_name: String,
        title: String,
        geometry: Geometry,
    },

    /// A window was closed and unregistered
    WindowClosed { id: WindowId, app_name: String },

    /// A window was brought to front
    WindowFocused { id: WindowId, z_index: u32 },

    WindowMinimized { id: WindowId, app_name: String },

    WindowRestored { id: WindowId, app_name: String },

    WindowMaximized { id: WindowId },

    WindowUnmaximized { id: WindowId },

    /// A window was moved or resized
    WindowGeometryChanged { id: WindowId, geometry: Geometry },

    /// Title bar drag started (pointer captured)
    WindowDragStarted { id: WindowId },

    /// Title bar drag ended (pointer released or capture lost)
    WindowDragEnded { id: WindowId },

    WindowResizeStarted {
        id: WindowId,
        direction: ResizeDirection,
    },

    WindowResizeEnded { id: WindowId },

    /// Zone under the pointer changed during a drag
    SnapPreviewChanged { id: WindowId, zone: SnapZone },

    /// Escape pressed: transient notifications should be dismissed
    NotificationsCleared,
}

// ============================================================================
// Subscribers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&WmEvent)>;

/// Explicit observer list. Subscribers stay registered until unsubscribed.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&WmEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        debug!("Event subscriber {} registered", id.0);
        id
    }

    /// Returns `false` if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Deliver to every subscriber in subscription order
    pub fn publish(&mut self, event: &WmEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
