use std::collections::{HashSet, VecDeque};

/// Bounded, insertion-ordered record of issued user agents
///
/// When the size exceeds `capacity`, the oldest entries are dropped until
/// only the `retain` most recent remain.
#[derive(Debug, Clone)]
pub struct IdentityHistory {
    order: VecDeque<String>,
    members: HashSet<String>,
    capacity: usize,
    retain: usize,
}

impl IdentityHistory {
    pub fn new(capacity: usize, retain: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity + 1),
            members: HashSet::with_capacity(capacity + 1),
            capacity,
            retain: retain.min(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, user_agent: &str) -> bool {
        self.members.contains(user_agent)
    }

    /// Records `user_agent` as the most recent entry
    ///
    /// Re-inserting an existing entry moves it to the back. Returns true if
    /// the entry was new.
    pub fn insert(&mut self, user_agent: String) -> bool {
        let fresh = self.members.insert(user_agent.clone());
        if !fresh {
            self.order.retain(|ua| ua != &user_agent);
        }
        self.order.push_back(user_agent);

        if self.order.len() > self.capacity {
            self.evict();
        }

        fresh
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Iterates from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn evict(&mut self) {
        let excess = self.order.len().saturating_sub(self.retain);
        tracing::debug!("Evicting {} identities from history", excess);
        for ua in self.order.drain(..excess) {
            self.members.remove(&ua);
        }
    }
}
