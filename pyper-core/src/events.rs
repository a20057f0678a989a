use std::fmt;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::access::AccessSnapshot;
use crate::permissions::RoleName;
use crate::tenant::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

static LISTENER_ID: AtomicU64 = AtomicU64::new(1);

fn next_listener_id() -> ListenerId {
    ListenerId(LISTENER_ID.fetch_add(1, Ordering::Relaxed))
}

/// Which part of the access context changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessEventKind {
    TenantChanged,
    RoleChanged,
}

/// A change applied by one of the access context setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessChange {
    Tenant { from: TenantId, to: TenantId },
    Role { from: RoleName, to: RoleName },
}

impl AccessChange {
    pub fn kind(&self) -> AccessEventKind {
        match self {
            AccessChange::Tenant { .. } => AccessEventKind::TenantChanged,
            AccessChange::Role { .. } => AccessEventKind::RoleChanged,
        }
    }
}

/// Listener signature. The snapshot already holds the new values.
pub type AccessListener = Arc<dyn Fn(&AccessChange, &AccessSnapshot) + Send + Sync>;

/// Box a closure as an [`AccessListener`].
pub fn listener<F>(f: F) -> AccessListener
where
    F: Fn(&AccessChange, &AccessSnapshot) + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventPat {
    Any,
    Exact(AccessEventKind),
}

impl EventPat {
    pub fn matches(&self, kind: AccessEventKind) -> bool {
        match self {
            EventPat::Any => true,
            EventPat::Exact(k) => *k == kind,
        }
    }
}

#[derive(Clone)]
struct ListenerEntry {
    id: ListenerId,
    pattern: EventPat,
    listener: AccessListener,
    once: bool,
}

/// Synchronous observer list for one access context.
///
/// Emission snapshots the matching listeners first, calls them, then drops
/// the `once` listeners that fired.
#[derive(Clone, Default)]
pub struct AccessEventHub {
    listeners: Vec<ListenerEntry>,
}

impl fmt::Debug for AccessEventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessEventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl AccessEventHub {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn on(&mut self, kind: AccessEventKind, listener: AccessListener) -> ListenerId {
        self.on_pattern(EventPat::Exact(kind), listener)
    }

    pub fn on_pattern(&mut self, pattern: EventPat, listener: AccessListener) -> ListenerId {
        self.push(pattern, listener, false)
    }

    pub fn once_pattern(&mut self, pattern: EventPat, listener: AccessListener) -> ListenerId {
        self.push(pattern, listener, true)
    }

    fn push(&mut self, pattern: EventPat, listener: AccessListener, once: bool) -> ListenerId {
        let id = next_listener_id();
        self.listeners.push(ListenerEntry {
            id,
            pattern,
            listener,
            once,
        });
        id
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|e| e.id != id);
        before != self.listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every listener whose pattern matches, in registration order.
    pub fn emit(&mut self, change: &AccessChange, snapshot: &AccessSnapshot) {
        let kind = change.kind();
        let (to_call, once_ids): (Vec<_>, Vec<_>) = self
            .listeners
            .iter()
            .filter(|e| e.pattern.matches(kind))
            .map(|e| (e.listener.clone(), e.once.then_some(e.id)))
            .unzip();

        for listener in &to_call {
            listener(change, snapshot);
        }

        let once_ids: Vec<ListenerId> = once_ids.into_iter().flatten().collect();
        if !once_ids.is_empty() {
            self.listeners.retain(|e| !once_ids.contains(&e.id));
        }
    }
}
