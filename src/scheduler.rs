//! Explicit per-frame callback scheduling.
//!
//! The render loop is decoupled from any particular windowing framework:
//! whatever owns the display-refresh signal drives [`FrameScheduler::run`]
//! once per frame, and subsystems register callbacks against it. Tearing a
//! subsystem down cancels its handle, which guarantees no further ticks are
//! delivered to it.

/// Timing information passed to every frame callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Total elapsed time in seconds.
    pub time: f32,
    /// Delta since the previous frame in seconds.
    pub dt: f32,
}

/// Identifies a registered frame callback for cancellation.
///
/// Handles are generation-stamped: cancelling a handle whose slot has been
/// reused since is a no-op rather than cancelling the new occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle {
    slot: usize,
    generation: u64,
}

type FrameCallback = Box<dyn FnMut(FrameTick)>;

/// Registry of per-frame callbacks, invoked in registration order.
#[derive(Default)]
pub struct FrameScheduler {
    slots: Vec<Option<(u64, FrameCallback)>>,
    next_generation: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback to run every frame. Returns a handle for
    /// [`cancel`](Self::cancel).
    pub fn register(&mut self, callback: impl FnMut(FrameTick) + 'static) -> FrameHandle {
        let generation = self.next_generation;
        self.next_generation += 1;
        let entry = Some((generation, Box::new(callback) as FrameCallback));

        let slot = match self.slots.iter().position(Option::is_none) {
            Some(free) => {
                self.slots[free] = entry;
                free
            }
            None => {
                self.slots.push(entry);
                self.slots.len() - 1
            }
        };

        FrameHandle { slot, generation }
    }

    /// Cancel a registered callback. After this returns, the callback is
    /// never invoked again. Stale or already-cancelled handles are ignored.
    pub fn cancel(&mut self, handle: FrameHandle) {
        if let Some(entry) = self.slots.get_mut(handle.slot)
            && entry.as_ref().is_some_and(|(generation, _)| *generation == handle.generation)
        {
            *entry = None;
        }
    }

    /// Invoke all live callbacks for this frame.
    pub fn run(&mut self, tick: FrameTick) {
        for entry in &mut self.slots {
            if let Some((_, callback)) = entry {
                callback(tick);
            }
        }
    }

    /// Number of live callbacks.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
