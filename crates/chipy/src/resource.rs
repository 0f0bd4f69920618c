use std::fmt;

pub use NO_LIMIT_TRACKER as NoLimitTracker;

/// Number of container allocations between suggested garbage collections.
///
/// Collection is infrequent on purpose: reference counts plus
/// [`Arena::collect_unreferenced`](crate::Arena::collect_unreferenced) reclaim
/// most garbage, mark-sweep is only needed for cycles.
pub const DEFAULT_GC_INTERVAL: usize = 100_000;

/// Maximum nesting depth for recursive data walks (document import/export).
///
/// Lower in debug mode since debug builds use more stack per frame.
#[cfg(debug_assertions)]
pub const MAX_DATA_RECURSION_DEPTH: u16 = 100;

/// Maximum nesting depth for recursive data walks (document import/export).
#[cfg(not(debug_assertions))]
pub const MAX_DATA_RECURSION_DEPTH: u16 = 500;

/// Error returned when an arena allocation would exceed a configured limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Maximum number of allocations exceeded.
    Allocation { limit: usize, count: usize },
    /// Maximum memory usage exceeded.
    Memory { limit: usize, used: usize },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { limit, count } => {
                write!(f, "allocation limit exceeded: {count} > {limit}")
            }
            Self::Memory { limit, used } => {
                write!(f, "memory limit exceeded: {used} bytes > {limit} bytes")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// Trait for tracking arena resource usage and scheduling garbage collection.
///
/// The arena calls into the tracker on every allocation and every freed slot.
/// `gc_interval` only controls how often [`Arena::should_gc`](crate::Arena::should_gc)
/// suggests a collection; the arena never collects by itself.
pub trait ResourceTracker: fmt::Debug {
    /// Called before each slot allocation.
    ///
    /// Returns `Err(ResourceError)` if the allocation must not proceed.
    ///
    /// # Arguments
    /// * `get_size` - Lazily computes the approximate size of the allocation in bytes
    fn on_allocate(&mut self, get_size: impl FnOnce() -> usize) -> Result<(), ResourceError>;

    /// Called when a slot is reclaimed by collection.
    fn on_free(&mut self, get_size: impl FnOnce() -> usize);

    /// Number of container allocations after which a collection is suggested.
    fn gc_interval(&self) -> usize {
        DEFAULT_GC_INTERVAL
    }

    /// Returns the total number of allocations tracked, if this tracker records them.
    fn allocation_count(&self) -> Option<usize> {
        None
    }

    /// Returns the current approximate memory usage in bytes, if tracked.
    fn current_memory_bytes(&self) -> Option<usize> {
        None
    }
}

/// Configuration for arena resource limits.
///
/// All limits are optional. Use `ResourceLimits::default()` for no limits, or
/// build custom limits with the builder methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceLimits {
    /// Maximum number of slot allocations allowed.
    pub max_allocations: Option<usize>,
    /// Maximum arena memory in bytes (approximate).
    pub max_memory: Option<usize>,
    /// Suggest garbage collection every N container allocations.
    pub gc_interval: Option<usize>,
}

impl ResourceLimits {
    /// Creates limits with everything disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of allocations.
    #[must_use]
    pub fn max_allocations(mut self, limit: usize) -> Self {
        self.max_allocations = Some(limit);
        self
    }

    /// Sets the maximum memory usage in bytes.
    #[must_use]
    pub fn max_memory(mut self, limit: usize) -> Self {
        self.max_memory = Some(limit);
        self
    }

    /// Sets the garbage collection interval.
    #[must_use]
    pub fn gc_interval(mut self, interval: usize) -> Self {
        self.gc_interval = Some(interval);
        self
    }
}

/// Default tracker for arenas that do not need hard accounting.
///
/// With no limits configured every check is skipped. Hosts can still opt
/// into soft limits via [`NoLimitTracker::with_limits`].
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct NoLimitTracker {
    #[serde(default)]
    limits: ResourceLimits,
    #[serde(default)]
    allocation_count: usize,
    #[serde(default)]
    current_memory: usize,
}

impl NoLimitTracker {
    /// Creates a tracker with no limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limits: ResourceLimits {
                max_allocations: None,
                max_memory: None,
                gc_interval: None,
            },
            allocation_count: 0,
            current_memory: 0,
        }
    }

    /// Creates a tracker that enforces the given limits.
    #[must_use]
    pub const fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            limits,
            allocation_count: 0,
            current_memory: 0,
        }
    }
}

/// Value form of [`NoLimitTracker`], so `Arena::new(NoLimitTracker)` reads naturally.
pub const NO_LIMIT_TRACKER: NoLimitTracker = NoLimitTracker::new();

impl ResourceTracker for NoLimitTracker {
    #[inline]
    fn on_allocate(&mut self, get_size: impl FnOnce() -> usize) -> Result<(), ResourceError> {
        let tracks_allocations = self.limits.max_allocations.is_some();
        let tracks_memory = self.limits.max_memory.is_some();
        if !tracks_allocations && !tracks_memory {
            return Ok(());
        }

        if let Some(max) = self.limits.max_allocations
            && self.allocation_count >= max
        {
            return Err(ResourceError::Allocation {
                limit: max,
                count: self.allocation_count + 1,
            });
        }

        if let Some(max) = self.limits.max_memory {
            let new_memory = self.current_memory + get_size();
            if new_memory > max {
                return Err(ResourceError::Memory {
                    limit: max,
                    used: new_memory,
                });
            }
            self.current_memory = new_memory;
        }

        if tracks_allocations {
            self.allocation_count += 1;
        }
        Ok(())
    }

    #[inline]
    fn on_free(&mut self, get_size: impl FnOnce() -> usize) {
        if self.limits.max_memory.is_some() {
            self.current_memory = self.current_memory.saturating_sub(get_size());
        }
    }

    fn gc_interval(&self) -> usize {
        self.limits.gc_interval.unwrap_or(DEFAULT_GC_INTERVAL)
    }
}

/// A resource tracker that accounts for every allocation.
///
/// Tracks allocation count and memory usage, returning errors when limits are
/// exceeded. Freed slots give memory back but never reduce the allocation count.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LimitedTracker {
    limits: ResourceLimits,
    allocation_count: usize,
    current_memory: usize,
}

impl LimitedTracker {
    /// Creates a new LimitedTracker with the given limits.
    #[must_use]
    pub fn new(limits: ResourceLimits) -> Self {
        Self {
            limits,
            allocation_count: 0,
            current_memory: 0,
        }
    }

    /// Returns the configured limits.
    #[must_use]
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }
}

impl ResourceTracker for LimitedTracker {
    fn on_allocate(&mut self, get_size: impl FnOnce() -> usize) -> Result<(), ResourceError> {
        if let Some(max) = self.limits.max_allocations
            && self.allocation_count >= max
        {
            return Err(ResourceError::Allocation {
                limit: max,
                count: self.allocation_count + 1,
            });
        }

        let size = get_size();
        if let Some(max) = self.limits.max_memory {
            let new_memory = self.current_memory + size;
            if new_memory > max {
                return Err(ResourceError::Memory {
                    limit: max,
                    used: new_memory,
                });
            }
        }

        self.allocation_count += 1;
        self.current_memory += size;
        Ok(())
    }

    fn on_free(&mut self, get_size: impl FnOnce() -> usize) {
        self.current_memory = self.current_memory.saturating_sub(get_size());
    }

    fn gc_interval(&self) -> usize {
        self.limits.gc_interval.unwrap_or(DEFAULT_GC_INTERVAL)
    }

    fn allocation_count(&self) -> Option<usize> {
        Some(self.allocation_count)
    }

    fn current_memory_bytes(&self) -> Option<usize> {
        Some(self.current_memory)
    }
}
