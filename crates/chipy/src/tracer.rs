//! Arena lifetime tracing.
//!
//! The arena carries its tracer as a type parameter `Tr: ArenaTracer`, the same
//! way it carries its [`ResourceTracker`](crate::ResourceTracker). With
//! [`NoopTracer`] every hook is monomorphised away.
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost default |
//! | [`StderrTracer`] | Human-readable lifetime log on stderr |
//! | [`RecordingTracer`] | Keeps every event for tests and post-mortem analysis |
//!
//! ```
//! use chipy::{Arena, NoLimitTracker, RecordingTracer, TraceEvent, Type};
//!
//! let mut arena = Arena::with_tracer(NoLimitTracker, RecordingTracer::new());
//! let value = arena.create_integer(7).unwrap();
//! assert_eq!(
//!     arena.tracer().events(),
//!     &[TraceEvent::Allocate { slot: 0, value_type: Type::Integer }]
//! );
//! value.drop_with_arena(&mut arena);
//! ```

use crate::types::Type;

/// A single arena lifetime event, as captured by [`RecordingTracer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A slot was filled with a new value.
    Allocate { slot: usize, value_type: Type },
    /// A handle was released; `refcount` is the count left afterwards.
    Release { slot: usize, refcount: usize },
    /// A slot was reclaimed by collection.
    Free { slot: usize, value_type: Type },
    /// A collection pass finished.
    Collect { freed: usize, live: usize },
    /// A deep copy was materialised in this arena.
    Duplicate { slots: usize, cross_arena: bool },
}

/// Hooks invoked by the arena at lifetime events.
///
/// All methods default to no-ops so implementations only override what they need.
pub trait ArenaTracer: std::fmt::Debug {
    /// Called after a value is placed in `slot`.
    #[inline(always)]
    fn on_allocate(&mut self, _slot: usize, _value_type: Type) {}

    /// Called after a handle release lowers the count of `slot`.
    ///
    /// A count of zero does not free the slot; that happens at collection.
    #[inline(always)]
    fn on_release(&mut self, _slot: usize, _refcount: usize) {}

    /// Called when collection reclaims `slot`.
    #[inline(always)]
    fn on_free(&mut self, _slot: usize, _value_type: Type) {}

    /// Called at the end of `collect_unreferenced` and `collect_garbage`.
    #[inline(always)]
    fn on_collect(&mut self, _freed: usize, _live: usize) {}

    /// Called after a deep copy of `slots` values lands in this arena.
    #[inline(always)]
    fn on_duplicate(&mut self, _slots: usize, _cross_arena: bool) {}
}

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl ArenaTracer for NoopTracer {}

/// Tracer that prints one line per event to stderr.
///
/// ```text
/// [arena] alloc    slot=0     Integer
/// [arena] release  slot=0     refcount=0
/// [arena] free     slot=0     Integer
/// [arena] collect  freed=1    live=0
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrTracer;

impl StderrTracer {
    /// Creates a new stderr tracer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ArenaTracer for StderrTracer {
    fn on_allocate(&mut self, slot: usize, value_type: Type) {
        eprintln!("[arena] alloc    slot={slot:<5} {value_type}");
    }

    fn on_release(&mut self, slot: usize, refcount: usize) {
        eprintln!("[arena] release  slot={slot:<5} refcount={refcount}");
    }

    fn on_free(&mut self, slot: usize, value_type: Type) {
        eprintln!("[arena] free     slot={slot:<5} {value_type}");
    }

    fn on_collect(&mut self, freed: usize, live: usize) {
        eprintln!("[arena] collect  freed={freed:<4} live={live}");
    }

    fn on_duplicate(&mut self, slots: usize, cross_arena: bool) {
        let target = if cross_arena { "cross-arena" } else { "same-arena" };
        eprintln!("[arena] copy     slots={slots:<4} {target}");
    }
}

/// Tracer that records every event in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Drops all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Consumes the recorder, returning its events.
    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}

impl ArenaTracer for RecordingTracer {
    fn on_allocate(&mut self, slot: usize, value_type: Type) {
        self.events.push(TraceEvent::Allocate { slot, value_type });
    }

    fn on_release(&mut self, slot: usize, refcount: usize) {
        self.events.push(TraceEvent::Release { slot, refcount });
    }

    fn on_free(&mut self, slot: usize, value_type: Type) {
        self.events.push(TraceEvent::Free { slot, value_type });
    }

    fn on_collect(&mut self, freed: usize, live: usize) {
        self.events.push(TraceEvent::Collect { freed, live });
    }

    fn on_duplicate(&mut self, slots: usize, cross_arena: bool) {
        self.events.push(TraceEvent::Duplicate { slots, cross_arena });
    }
}
