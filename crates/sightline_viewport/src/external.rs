//! Third-party scroll library lifecycle
//!
//! Smooth-scroll wrappers and scroll-trigger utilities keep singleton-ish
//! internal state and misbehave when two instances overlap (duplicate
//! smooth-scroll loops, stale trigger positions). [`PluginMount`] owns one
//! such instance as a scoped resource: `attach()` always detaches the
//! previous activation first, `detach()` is idempotent, and dropping the
//! mount releases the instance.
//!
//! The typical host flow:
//!
//! ```ignore
//! let mut mount = PluginMount::new(SmoothScroll::default());
//!
//! mount.attach();           // viewport breakpoint chosen
//! mount.attach();           // breakpoint changed: old instance killed first
//! mount.refresh();          // images loaded, trigger positions recalculated
//! // drop => detach
//! ```

/// An owned third-party scroll/animation library instance
pub trait ScrollPlugin {
    /// Bring the instance up (create the library singleton, register its
    /// own listeners)
    fn attach(&mut self);

    /// Tear the instance down completely
    fn detach(&mut self);

    /// Recalculate internal positions after layout changed under the
    /// instance (image loads altering document height)
    fn refresh(&mut self) {}
}

/// Scoped owner of a [`ScrollPlugin`] instance
///
/// Guarantees at most one live activation, with detach always preceding a
/// re-attach.
pub struct PluginMount<P: ScrollPlugin> {
    plugin: P,
    attached: bool,
}

impl<P: ScrollPlugin> PluginMount<P> {
    pub fn new(plugin: P) -> Self {
        Self {
            plugin,
            attached: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Activate the plugin; a previous activation is detached first
    pub fn attach(&mut self) {
        if self.attached {
            tracing::debug!("plugin re-attach: detaching previous instance");
            self.plugin.detach();
        }
        self.plugin.attach();
        self.attached = true;
    }

    /// Deactivate; safe to call when not attached
    pub fn detach(&mut self) {
        if self.attached {
            self.plugin.detach();
            self.attached = false;
        }
    }

    /// Forward a layout-change refresh to an attached instance
    ///
    /// No-op while detached: a detached plugin has no positions to fix.
    pub fn refresh(&mut self) {
        if self.attached {
            self.plugin.refresh();
        }
    }

    /// Access the plugin (e.g. to read library state)
    pub fn plugin(&self) -> &P {
        &self.plugin
    }
}

impl<P: ScrollPlugin> Drop for PluginMount<P> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingPlugin {
        attaches: u32,
        detaches: u32,
        refreshes: u32,
        /// Net live instances; must never exceed 1
        live: Arc<AtomicI32>,
    }

    impl ScrollPlugin for CountingPlugin {
        fn attach(&mut self) {
            self.attaches += 1;
            let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            assert!(live <= 1, "two live plugin instances");
        }

        fn detach(&mut self) {
            self.detaches += 1;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }

        fn refresh(&mut self) {
            self.refreshes += 1;
        }
    }

    #[test]
    fn test_reattach_detaches_previous() {
        let mut mount = PluginMount::new(CountingPlugin::default());
        mount.attach();
        mount.attach(); // Breakpoint change
        mount.attach();

        assert_eq!(mount.plugin().attaches, 3);
        assert_eq!(mount.plugin().detaches, 2);
        assert!(mount.is_attached());
    }

    #[test]
    fn test_detach_idempotent() {
        let mut mount = PluginMount::new(CountingPlugin::default());
        mount.detach();
        mount.attach();
        mount.detach();
        mount.detach();

        assert_eq!(mount.plugin().detaches, 1);
        assert!(!mount.is_attached());
    }

    #[test]
    fn test_refresh_only_while_attached() {
        let mut mount = PluginMount::new(CountingPlugin::default());
        mount.refresh();
        assert_eq!(mount.plugin().refreshes, 0);

        mount.attach();
        mount.refresh();
        assert_eq!(mount.plugin().refreshes, 1);
    }

    #[test]
    fn test_drop_releases_instance() {
        let live = Arc::new(AtomicI32::new(0));
        {
            let mut mount = PluginMount::new(CountingPlugin {
                live: Arc::clone(&live),
                ..Default::default()
            });
            mount.attach();
            assert_eq!(live.load(Ordering::SeqCst), 1);
        }
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }
}
