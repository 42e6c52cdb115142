//! Fine-grained reactive signal graph
//!
//! A push-pull hybrid: signals push invalidation to their subscribers,
//! derived values pull (lazily recompute) when read, and effects are queued
//! and flushed after each write (or at the end of a batch).
//!
//! This is the substrate viewport signals live in. A derived signal here is
//! always a pure function of the signals it reads at sample time; there is
//! no hidden accumulation across frames, which is exactly the contract the
//! derivation layer requires.
//!
//! # State
//!
//! [`State<T>`] wraps a signal together with a shared graph handle and is the
//! primary API effect drivers use for their local UI state:
//!
//! ```ignore
//! let graph: SharedReactiveGraph = Arc::new(Mutex::new(ReactiveGraph::new()));
//! let visible = State::new(&graph, false);
//!
//! visible.set(true);           // notifies effects reading `visible`
//! assert!(visible.get());
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

new_key_type! {
    /// Unique identifier for a signal
    pub struct SignalId;
    /// Unique identifier for a derived value
    pub struct DerivedId;
    /// Unique identifier for an effect
    pub struct EffectId;
}

/// Subscriber kinds that react to signal writes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriberId {
    Derived(DerivedId),
    Effect(EffectId),
}

/// A typed signal handle (cheap to copy)
#[derive(Debug)]
pub struct Signal<T> {
    id: SignalId,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> Signal<T> {
    pub fn id(&self) -> SignalId {
        self.id
    }
}

/// A typed derived-value handle
#[derive(Debug)]
pub struct Derived<T> {
    id: DerivedId,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Derived<T> {}

impl<T> Derived<T> {
    pub fn id(&self) -> DerivedId {
        self.id
    }
}

/// An effect handle, used to dispose the effect on teardown
#[derive(Debug, Clone, Copy)]
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn id(&self) -> EffectId {
        self.id
    }
}

type BoxedAny = Box<dyn Any + Send>;
type ComputeFn = Arc<dyn Fn(&ReactiveGraph) -> BoxedAny + Send + Sync>;
type RunFn = Arc<Mutex<Box<dyn FnMut(&ReactiveGraph) + Send>>>;

struct SignalNode {
    value: BoxedAny,
    version: u64,
    subscribers: SmallVec<[SubscriberId; 4]>,
}

struct DerivedNode {
    cached: Option<BoxedAny>,
    compute: ComputeFn,
    dependencies: SmallVec<[SignalId; 4]>,
    subscribers: SmallVec<[SubscriberId; 4]>,
    dirty: Cell<bool>,
}

struct EffectNode {
    run: RunFn,
    dependencies: SmallVec<[SignalId; 4]>,
    dirty: Cell<bool>,
}

/// The graph owning all signals, derived values, and effects
pub struct ReactiveGraph {
    signals: SlotMap<SignalId, SignalNode>,
    derived: SlotMap<DerivedId, DerivedNode>,
    effects: SlotMap<EffectId, EffectNode>,
    pending_effects: RefCell<VecDeque<EffectId>>,
    batch_depth: Cell<u32>,
    /// Dependency recording for the effect/derived currently executing
    tracking: RefCell<Option<Vec<SignalId>>>,
    write_count: Cell<u64>,
}

impl ReactiveGraph {
    pub fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            derived: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            pending_effects: RefCell::new(VecDeque::new()),
            batch_depth: Cell::new(0),
            tracking: RefCell::new(None),
            write_count: Cell::new(0),
        }
    }

    // =========================================================================
    // Signals
    // =========================================================================

    pub fn create_signal<T: Send + 'static>(&mut self, initial: T) -> Signal<T> {
        let id = self.signals.insert(SignalNode {
            value: Box::new(initial),
            version: 0,
            subscribers: SmallVec::new(),
        });
        Signal {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Read a signal, recording it as a dependency of the currently running
    /// effect or derived computation
    pub fn get<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        if let Some(ref mut deps) = *self.tracking.borrow_mut() {
            if !deps.contains(&signal.id) {
                deps.push(signal.id);
            }
        }
        self.read(signal)
    }

    /// Read a signal without dependency tracking
    pub fn get_untracked<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.read(signal)
    }

    fn read<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>().cloned())
    }

    /// Write a signal and notify subscribers
    ///
    /// Outside a batch, pending effects flush before this returns.
    pub fn set<T: Send + 'static>(&mut self, signal: Signal<T>, value: T) {
        let Some(node) = self.signals.get_mut(signal.id) else {
            return;
        };
        node.value = Box::new(value);
        node.version += 1;
        self.write_count.set(self.write_count.get() + 1);

        let subscribers: SmallVec<[SubscriberId; 4]> = node.subscribers.clone();
        for sub in subscribers {
            self.invalidate(sub);
        }

        if self.batch_depth.get() == 0 {
            self.flush_effects();
        }
    }

    /// Apply a function to the current value and write the result
    pub fn update<T: Clone + Send + 'static>(&mut self, signal: Signal<T>, f: impl FnOnce(T) -> T) {
        if let Some(current) = self.get_untracked(signal) {
            self.set(signal, f(current));
        }
    }

    pub fn signal_version(&self, id: SignalId) -> Option<u64> {
        self.signals.get(id).map(|n| n.version)
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Create a derived value recomputed lazily from the signals it reads
    ///
    /// Dependencies are discovered by tracking reads during computation, so
    /// they may change from run to run (e.g. a derivation that short-circuits
    /// while the readiness gate is closed).
    pub fn create_derived<T, F>(&mut self, compute: F) -> Derived<T>
    where
        T: Clone + Send + 'static,
        F: Fn(&ReactiveGraph) -> T + Send + Sync + 'static,
    {
        let compute: ComputeFn = Arc::new(move |graph| Box::new(compute(graph)) as BoxedAny);
        let id = self.derived.insert(DerivedNode {
            cached: None,
            compute,
            dependencies: SmallVec::new(),
            subscribers: SmallVec::new(),
            dirty: Cell::new(true),
        });
        Derived {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Read a derived value, recomputing if a dependency changed
    pub fn get_derived<T: Clone + 'static>(&mut self, derived: Derived<T>) -> Option<T> {
        {
            let node = self.derived.get(derived.id)?;
            if !node.dirty.get() {
                if let Some(ref cached) = node.cached {
                    return cached.downcast_ref::<T>().cloned();
                }
            }
        }

        // Recompute with dependency tracking. The compute fn is an Arc so it
        // can be cloned out of the node, keeping the graph borrow short.
        let compute = self.derived.get(derived.id)?.compute.clone();
        let previous = self.tracking.replace(Some(Vec::new()));
        let value = compute(self);
        let deps = self.tracking.replace(previous).unwrap_or_default();

        self.rewire(SubscriberId::Derived(derived.id), &deps);

        let node = self.derived.get_mut(derived.id)?;
        node.dirty.set(false);
        let result = value.downcast_ref::<T>().cloned();
        node.cached = Some(value);
        node.dependencies = deps.into_iter().collect();
        result
    }

    /// Remove a derived value from the graph
    pub fn dispose_derived<T>(&mut self, derived: Derived<T>) {
        if let Some(node) = self.derived.remove(derived.id) {
            self.unsubscribe_all(SubscriberId::Derived(derived.id), &node.dependencies);
        }
    }

    // =========================================================================
    // Effects
    // =========================================================================

    /// Create an effect that re-runs when any signal it reads changes
    ///
    /// Runs once immediately (or at batch end) to establish dependencies.
    pub fn create_effect<F>(&mut self, run: F) -> Effect
    where
        F: FnMut(&ReactiveGraph) + Send + 'static,
    {
        let id = self.effects.insert(EffectNode {
            run: Arc::new(Mutex::new(Box::new(run))),
            dependencies: SmallVec::new(),
            dirty: Cell::new(true),
        });
        self.pending_effects.borrow_mut().push_back(id);

        if self.batch_depth.get() == 0 {
            self.flush_effects();
        }
        Effect { id }
    }

    /// Remove an effect; it will never run again
    ///
    /// This is the teardown half of the lifecycle contract: every effect
    /// created for a binding must be disposed when the binding detaches.
    pub fn dispose_effect(&mut self, effect: Effect) {
        if let Some(node) = self.effects.remove(effect.id) {
            self.unsubscribe_all(SubscriberId::Effect(effect.id), &node.dependencies);
        }
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    // =========================================================================
    // Batching
    // =========================================================================

    /// Run `f` with effect flushing deferred to the end
    ///
    /// Use when one scroll event writes several signals; subscribers then
    /// observe a single consistent update instead of intermediate states.
    pub fn batch<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.batch_depth.set(self.batch_depth.get() + 1);
        let result = f(self);
        let depth = self.batch_depth.get();
        self.batch_depth.set(depth - 1);
        if depth == 1 {
            self.flush_effects();
        }
        result
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn invalidate(&mut self, sub: SubscriberId) {
        match sub {
            SubscriberId::Derived(id) => {
                if let Some(node) = self.derived.get(id) {
                    if !node.dirty.get() {
                        node.dirty.set(true);
                        let subscribers: SmallVec<[SubscriberId; 4]> = node.subscribers.clone();
                        for sub in subscribers {
                            self.invalidate(sub);
                        }
                    }
                }
            }
            SubscriberId::Effect(id) => {
                if let Some(node) = self.effects.get(id) {
                    if !node.dirty.get() {
                        node.dirty.set(true);
                        self.pending_effects.borrow_mut().push_back(id);
                    }
                }
            }
        }
    }

    fn flush_effects(&mut self) {
        // Queue order is notification order; effects for one write run in
        // the order their signals subscribed them.
        loop {
            let Some(effect_id) = self.pending_effects.borrow_mut().pop_front() else {
                break;
            };
            self.run_effect(effect_id);
        }
    }

    fn run_effect(&mut self, effect_id: EffectId) {
        let Some(node) = self.effects.get(effect_id) else {
            return; // Disposed while queued
        };
        if !node.dirty.get() {
            return;
        }
        node.dirty.set(false);
        let run = node.run.clone();

        let previous = self.tracking.replace(Some(Vec::new()));
        {
            let mut run_fn = run.lock().unwrap();
            (*run_fn)(self);
        }
        let deps = self.tracking.replace(previous).unwrap_or_default();

        self.rewire(SubscriberId::Effect(effect_id), &deps);
        if let Some(node) = self.effects.get_mut(effect_id) {
            node.dependencies = deps.into_iter().collect();
        }
    }

    /// Move a subscriber from its old dependency set to a new one
    fn rewire(&mut self, sub: SubscriberId, new_deps: &[SignalId]) {
        let old: SmallVec<[SignalId; 4]> = match sub {
            SubscriberId::Derived(id) => self
                .derived
                .get(id)
                .map(|n| n.dependencies.clone())
                .unwrap_or_default(),
            SubscriberId::Effect(id) => self
                .effects
                .get(id)
                .map(|n| n.dependencies.clone())
                .unwrap_or_default(),
        };
        self.unsubscribe_all(sub, &old);
        for &dep in new_deps {
            if let Some(sig) = self.signals.get_mut(dep) {
                if !sig.subscribers.contains(&sub) {
                    sig.subscribers.push(sub);
                }
            }
        }
    }

    fn unsubscribe_all(&mut self, sub: SubscriberId, deps: &[SignalId]) {
        for &dep in deps {
            if let Some(sig) = self.signals.get_mut(dep) {
                sig.subscribers.retain(|s| *s != sub);
            }
        }
    }

    /// Graph statistics, mainly for tests and diagnostics
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            signal_count: self.signals.len(),
            derived_count: self.derived.len(),
            effect_count: self.effects.len(),
            write_count: self.write_count.get(),
        }
    }
}

impl Default for ReactiveGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct GraphStats {
    pub signal_count: usize,
    pub derived_count: usize,
    pub effect_count: usize,
    pub write_count: u64,
}

// =============================================================================
// State - shared wrapper for driver-local UI state
// =============================================================================

/// Shared reactive graph handle
pub type SharedReactiveGraph = Arc<Mutex<ReactiveGraph>>;

/// A bound state value with direct get/set methods
///
/// Each effect driver allocates its observable outputs as `State<T>`s so a
/// host can react to them (via [`ReactiveGraph::create_effect`]) without the
/// driver knowing who is listening. Writes stay strictly local to the owning
/// driver; reads are open.
#[derive(Clone)]
pub struct State<T> {
    signal: Signal<T>,
    graph: SharedReactiveGraph,
}

impl<T: Clone + Send + 'static> State<T> {
    /// Allocate a fresh signal in the shared graph
    pub fn new(graph: &SharedReactiveGraph, initial: T) -> Self {
        let signal = graph.lock().unwrap().create_signal(initial);
        Self {
            signal,
            graph: Arc::clone(graph),
        }
    }

    pub fn get(&self) -> T
    where
        T: Default,
    {
        self.graph
            .lock()
            .unwrap()
            .get_untracked(self.signal)
            .unwrap_or_default()
    }

    pub fn try_get(&self) -> Option<T> {
        self.graph.lock().unwrap().get_untracked(self.signal)
    }

    pub fn set(&self, value: T) {
        self.graph.lock().unwrap().set(self.signal, value);
    }

    pub fn update(&self, f: impl FnOnce(T) -> T) {
        self.graph.lock().unwrap().update(self.signal, f);
    }

    pub fn signal(&self) -> Signal<T> {
        self.signal
    }

    pub fn signal_id(&self) -> SignalId {
        self.signal.id()
    }

    /// The graph this state lives in, for batched multi-state writes
    pub fn graph_handle(&self) -> SharedReactiveGraph {
        Arc::clone(&self.graph)
    }
}
