use crate::core::types::{Material, ProcessId};
use log::{debug, error};
use std::collections::VecDeque;

/// Shared pool of resupply agents, counted across all materials.
#[derive(Debug)]
pub struct ResupplyPool {
    capacity: usize,
    busy: usize,
    peak_busy: usize,
    waiters: VecDeque<ProcessId>,
}

impl ResupplyPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            busy: 0,
            peak_busy: 0,
            waiters: VecDeque::new(),
        }
    }

    /// Take an agent for `process`, or queue it if all agents are busy
    pub fn try_acquire(&mut self, process: ProcessId) -> bool {
        if self.busy < self.capacity {
            self.busy += 1;
            self.peak_busy = self.peak_busy.max(self.busy);
            true
        } else {
            self.waiters.push_back(process);
            false
        }
    }

    /// Return an agent. If someone is waiting the agent passes straight to
    /// them (busy count unchanged) and their id is returned for resumption.
    pub fn release(&mut self) -> Option<ProcessId> {
        if self.busy == 0 {
            error!("Resupply agent released while none were busy");
            return None;
        }
        match self.waiters.pop_front() {
            Some(next) => Some(next),
            None => {
                self.busy -= 1;
                None
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn busy(&self) -> usize {
        self.busy
    }

    /// Highest number of agents simultaneously busy so far
    pub fn peak_busy(&self) -> usize {
        self.peak_busy
    }

    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }
}

/// Material counters plus the resupply agents that refill them
#[derive(Debug)]
pub struct MaterialInventory {
    levels: [u32; Material::ALL.len()],
    capacity: u32,
    pool: ResupplyPool,
}

impl MaterialInventory {
    /// Every material starts full at `capacity`
    pub fn new(capacity: u32, resupply_agents: usize) -> Self {
        Self {
            levels: [capacity; Material::ALL.len()],
            capacity,
            pool: ResupplyPool::new(resupply_agents),
        }
    }

    /// Take one unit of `material`. Returns false, leaving the level at 0,
    /// when the container is empty and must be resupplied first.
    pub fn consume(&mut self, material: Material) -> bool {
        let level = &mut self.levels[material.index()];
        if *level > 0 {
            *level -= 1;
            true
        } else {
            false
        }
    }

    /// Refill `material` to full capacity
    pub fn restock(&mut self, material: Material) {
        self.levels[material.index()] = self.capacity;
        debug!("Restocked {} to {}", material, self.capacity);
    }

    pub fn level(&self, material: Material) -> u32 {
        self.levels[material.index()]
    }

    /// Force a material level, e.g. to start a scenario with an empty container
    pub fn set_level(&mut self, material: Material, level: u32) {
        self.levels[material.index()] = level;
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn pool(&self) -> &ResupplyPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ResupplyPool {
        &mut self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_until_depleted() {
        let mut inventory = MaterialInventory::new(2, 3);
        assert!(inventory.consume(Material::Case));
        assert!(inventory.consume(Material::Case));
        assert_eq!(inventory.level(Material::Case), 0);
        assert!(!inventory.consume(Material::Case));
        assert_eq!(inventory.level(Material::Case), 0);
        // other materials are untouched
        assert_eq!(inventory.level(Material::Batteries), 2);
    }

    #[test]
    fn test_restock_fills_to_capacity() {
        let mut inventory = MaterialInventory::new(25, 3);
        inventory.set_level(Material::LedDisplays, 0);
        inventory.restock(Material::LedDisplays);
        assert_eq!(inventory.level(Material::LedDisplays), 25);
    }

    #[test]
    fn test_pool_limits_concurrent_agents() {
        let mut pool = ResupplyPool::new(3);
        assert!(pool.try_acquire(1));
        assert!(pool.try_acquire(2));
        assert!(pool.try_acquire(3));
        assert!(!pool.try_acquire(4));
        assert!(!pool.try_acquire(5));
        assert_eq!(pool.busy(), 3);
        assert_eq!(pool.waiting(), 2);

        assert_eq!(pool.release(), Some(4));
        assert_eq!(pool.busy(), 3);
        assert_eq!(pool.release(), Some(5));
        assert_eq!(pool.release(), None);
        assert_eq!(pool.busy(), 2);
        assert_eq!(pool.peak_busy(), 3);
    }

    #[test]
    fn test_pool_release_when_idle_is_ignored() {
        let mut pool = ResupplyPool::new(3);
        assert_eq!(pool.release(), None);
        assert_eq!(pool.busy(), 0);
    }
}
