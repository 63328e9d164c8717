//! State and host plumbing shared by every toggle pattern.
//!
//! A pattern never owns its host node. It holds a [`HostRef`] and every
//! operation that finds the node dropped logs and does nothing.

use crate::content::{ContentBuilder, CustomContent, ToggleConfiguration};
use crate::interaction::GestureSession;
use crate::restore::RestoreInfo;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use toggler_core::{
    ColorMode, DirtyFlags, Event, FocusBroadcaster, FrameNode, HostRef, ListenerKinds, Padding,
    PlatformConfig, Point, Rect, Size, TaskQueue, Theme, ThemeProvider, WidgetId,
};
use tracing::{debug, warn};

/// Change callback. Runs from the task queue, never inside an event handler.
pub type ChangeCallback = Rc<dyn Fn(bool)>;

/// Collaborators injected into a pattern. Any of them may be absent.
#[derive(Clone, Default)]
pub struct ToggleContext {
    /// Theme lookup for layout and paint
    pub theme: Option<Rc<dyn ThemeProvider>>,
    /// Queue change notifications are posted to
    pub tasks: Option<TaskQueue>,
    /// System focus-visibility broadcast
    pub focus: Option<Rc<FocusBroadcaster>>,
    /// Platform behavior switches
    pub config: PlatformConfig,
}

impl ToggleContext {
    /// Context with a theme provider and a task queue.
    #[must_use]
    pub fn new(theme: Rc<dyn ThemeProvider>, tasks: TaskQueue) -> Self {
        Self {
            theme: Some(theme),
            tasks: Some(tasks),
            focus: None,
            config: PlatformConfig::default(),
        }
    }

    /// Attach a focus broadcaster.
    #[must_use]
    pub fn with_focus(mut self, focus: Rc<FocusBroadcaster>) -> Self {
        self.focus = Some(focus);
        self
    }

    /// Replace the platform config.
    #[must_use]
    pub fn with_config(mut self, config: PlatformConfig) -> Self {
        self.config = config;
        self
    }
}

impl fmt::Debug for ToggleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleContext")
            .field("theme", &self.theme.is_some())
            .field("tasks", &self.tasks)
            .field("focus", &self.focus)
            .field("config", &self.config)
            .finish()
    }
}

/// Shared pattern state.
pub struct ToggleBase {
    id: WidgetId,
    host: HostRef,
    /// Injected collaborators
    pub ctx: ToggleContext,
    /// Authoritative state
    pub is_on: bool,
    /// Current gesture
    pub session: GestureSession,
    /// Custom content slot
    pub content: CustomContent,
    on_change: Option<ChangeCallback>,
    last_color_mode: Option<ColorMode>,
    hot_zone_added: bool,
    snapshot: Option<(Size, Point)>,
}

impl fmt::Debug for ToggleBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleBase")
            .field("id", &self.id)
            .field("is_on", &self.is_on)
            .field("session", &self.session)
            .field("content", &self.content)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl ToggleBase {
    /// Attach to a host and register the given listeners on it.
    pub fn new(host: &Rc<RefCell<FrameNode>>, ctx: ToggleContext, listeners: ListenerKinds) -> Self {
        let id = {
            let mut node = host.borrow_mut();
            node.register_listeners(listeners);
            node.id()
        };
        Self {
            id,
            host: Rc::downgrade(host),
            ctx,
            is_on: false,
            session: GestureSession::default(),
            content: CustomContent::default(),
            on_change: None,
            last_color_mode: None,
            hot_zone_added: false,
            snapshot: None,
        }
    }

    /// Host node id.
    #[must_use]
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    /// The host, if it is still alive.
    #[must_use]
    pub fn host(&self) -> Option<Rc<RefCell<FrameNode>>> {
        let host = self.host.upgrade();
        if host.is_none() {
            debug!(id = ?self.id, "host node dropped");
        }
        host
    }

    /// Run `f` on the host node.
    pub fn with_host<R>(&self, f: impl FnOnce(&mut FrameNode) -> R) -> Option<R> {
        let host = self.host()?;
        let mut node = host.borrow_mut();
        Some(f(&mut node))
    }

    /// Run `f` on the theme of the host's scope.
    pub fn with_theme<R>(&self, f: impl FnOnce(&Theme) -> R) -> Option<R> {
        let Some(provider) = self.ctx.theme.as_ref() else {
            debug!(id = ?self.id, "no theme provider");
            return None;
        };
        let scope = self.host()?.borrow().theme_scope;
        let theme = provider.theme(scope);
        if theme.is_none() {
            debug!(id = ?self.id, ?scope, "theme not loaded");
        }
        theme.map(f)
    }

    /// Copy of the paint property of type `P`, default when unset.
    #[must_use]
    pub fn property<P: Clone + Default + 'static>(&self) -> P {
        self.with_host(|node| node.properties.get::<P>().cloned())
            .flatten()
            .unwrap_or_default()
    }

    /// Edit the paint property of type `P`, creating it when unset.
    pub fn update_property<P: Default + 'static>(&self, f: impl FnOnce(&mut P)) {
        self.with_host(|node| {
            if node.properties.get::<P>().is_none() {
                node.properties.insert(P::default());
            }
            if let Some(property) = node.properties.get_mut::<P>() {
                f(property);
            }
        });
    }

    /// Request host work.
    pub fn mark_dirty(&self, flags: DirtyFlags) {
        self.with_host(|node| node.mark_dirty(flags));
    }

    /// Whether the host accepts input. A dropped host does not.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.with_host(|node| node.enabled).unwrap_or(false)
    }

    /// Configuration handed to a content builder.
    #[must_use]
    pub fn configuration(&self) -> ToggleConfiguration {
        ToggleConfiguration {
            is_on: self.is_on,
            enabled: self.enabled(),
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Set the state. Returns whether it changed.
    ///
    /// With `notify` a change posts the change callback to the task queue.
    pub fn commit(&mut self, is_on: bool, notify: bool) -> bool {
        if self.is_on == is_on {
            return false;
        }
        self.is_on = is_on;
        self.rebuild_content();
        self.mark_dirty(DirtyFlags::RENDER);
        if notify {
            self.post_change();
        }
        true
    }

    /// Install or clear the change callback.
    pub fn set_on_change(&mut self, callback: Option<ChangeCallback>) {
        self.on_change = callback;
    }

    /// Post the change callback with the current state.
    pub fn post_change(&self) {
        let Some(callback) = self.on_change.clone() else {
            return;
        };
        let Some(tasks) = self.ctx.tasks.as_ref() else {
            debug!(id = ?self.id, "no task queue; change notification dropped");
            return;
        };
        let is_on = self.is_on;
        tasks.post("toggle.change", move || callback(is_on));
    }

    // =========================================================================
    // Custom content
    // =========================================================================

    /// Install or clear the content builder.
    pub fn set_content_builder(&mut self, builder: Option<ContentBuilder>) {
        let Some(host) = self.host() else { return };
        let mut node = host.borrow_mut();
        self.content.set_builder(&mut node, builder);
        let config = ToggleConfiguration {
            is_on: self.is_on,
            enabled: node.enabled,
        };
        self.content.rebuild(&mut node, config);
    }

    /// Rebuild custom content for the current state.
    pub fn rebuild_content(&mut self) {
        if !self.content.is_active() {
            return;
        }
        let Some(host) = self.host() else { return };
        let mut node = host.borrow_mut();
        let config = ToggleConfiguration {
            is_on: self.is_on,
            enabled: node.enabled,
        };
        self.content.rebuild(&mut node, config);
    }

    // =========================================================================
    // Theme / layout bookkeeping
    // =========================================================================

    /// Whether the color mode changed since the last call.
    pub fn take_color_mode_change(&mut self) -> bool {
        let Some(provider) = self.ctx.theme.as_ref() else {
            return false;
        };
        let mode = provider.color_mode();
        self.last_color_mode.replace(mode) != Some(mode)
    }

    /// Use the hot-zone padding as margin when the user set none.
    pub fn apply_default_margin(&self, horizontal: f32, vertical: f32) {
        self.with_host(|node| {
            if node.margin.is_none() {
                node.margin = Some(Padding::symmetric(horizontal, vertical));
            }
        });
    }

    /// Push the content box grown by the hot zone onto the response regions,
    /// unless the user supplied regions.
    pub fn add_hot_zone_rect(&mut self, horizontal: f32, vertical: f32) {
        let added = self.with_host(|node| {
            if node.is_response_region {
                return false;
            }
            let region = node.geometry.content_rect().inflate(horizontal, vertical);
            node.response_regions.push(region);
            true
        });
        self.hot_zone_added = added.unwrap_or(false);
    }

    /// Pop the last response region; an emptied list clears the user flag.
    pub fn remove_last_hot_zone_rect(&mut self) {
        self.with_host(|node| {
            node.response_regions.pop();
            if node.response_regions.is_empty() {
                node.is_response_region = false;
            }
        });
        self.hot_zone_added = false;
    }

    /// Replace the hot zone this pattern added.
    pub fn refresh_hot_zone(&mut self, horizontal: f32, vertical: f32) {
        if self.hot_zone_added {
            self.remove_last_hot_zone_rect();
        }
        self.add_hot_zone_rect(horizontal, vertical);
    }

    /// Content size and paint offset, when they changed since the last call.
    pub fn take_layout_change(&mut self) -> Option<(Size, Point)> {
        let current = self.with_host(|node| {
            (
                node.geometry.content_size_or_zero(),
                node.geometry.paint_offset(),
            )
        })?;
        if self.snapshot == Some(current) {
            return None;
        }
        self.snapshot = Some(current);
        Some(current)
    }

    /// Content box from the last layout, in parent coordinates.
    #[must_use]
    pub fn content_box(&self) -> Rect {
        self.snapshot
            .map(|(size, offset)| Rect::from_origin_size(offset, size))
            .unwrap_or_default()
    }

    /// Write inspector attributes on the host.
    pub fn write_inspector(&self, kind: &str) {
        let is_on = self.is_on;
        self.with_host(|node| {
            node.inspector.insert("type".into(), kind.into());
            node.inspector.insert("isOn".into(), is_on.to_string());
        });
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    /// Whether `event` presses the activation key while focused.
    #[must_use]
    pub fn is_activation(&self, event: &Event) -> bool {
        matches!(event, Event::KeyDown { key } if *key == self.ctx.config.activation_key)
            && self.session.is_focus
    }

    /// Enter focus. Returns whether the focus ring should show.
    pub fn focus_in(&mut self) -> bool {
        self.session.is_focus = true;
        self.session.focus_visible = match self.ctx.focus.as_ref() {
            Some(focus) => {
                focus.subscribe(self.id);
                focus.is_active()
            }
            None => true,
        };
        self.session.focus_visible
    }

    /// Leave focus.
    pub fn focus_out(&mut self) {
        self.session.is_focus = false;
        self.session.focus_visible = false;
        if let Some(focus) = self.ctx.focus.as_ref() {
            focus.unsubscribe(self.id);
        }
    }

    // =========================================================================
    // Restore
    // =========================================================================

    /// Serialized state.
    #[must_use]
    pub fn restore_info(&self) -> String {
        RestoreInfo::new(self.is_on).to_json()
    }

    /// Parse a restore payload. Malformed input is logged and yields `None`.
    #[must_use]
    pub fn parse_restore(&self, json: &str) -> Option<bool> {
        match RestoreInfo::parse(json) {
            Ok(info) => Some(info.is_on),
            Err(err) => {
                warn!(id = ?self.id, %err, "ignoring restore info");
                None
            }
        }
    }
}

impl Drop for ToggleBase {
    fn drop(&mut self) {
        if let Some(focus) = self.ctx.focus.as_ref() {
            focus.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use toggler_core::{Key, ThemeManager};

    fn setup() -> (Rc<RefCell<FrameNode>>, TaskQueue, ToggleBase) {
        let host = FrameNode::new_shared(WidgetId::new(1), "Toggle");
        let tasks = TaskQueue::new();
        let ctx = ToggleContext::new(Rc::new(ThemeManager::default()), tasks.clone());
        let base = ToggleBase::new(&host, ctx, ListenerKinds::CLICK);
        (host, tasks, base)
    }

    // ===== State Tests =====

    #[test]
    fn test_new_registers_listeners() {
        let (host, _, base) = setup();
        assert_eq!(host.borrow().listeners(), ListenerKinds::CLICK);
        assert_eq!(base.id(), WidgetId::new(1));
    }

    #[test]
    fn test_commit_posts_only_on_change() {
        let (host, tasks, mut base) = setup();
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        base.set_on_change(Some(Rc::new(move |on| sink.set(Some(on)))));

        assert!(base.commit(true, true));
        assert!(!base.commit(true, true));
        assert_eq!(tasks.len(), 1);
        assert_eq!(seen.get(), None);
        tasks.run_pending();
        assert_eq!(seen.get(), Some(true));
        assert!(host.borrow().dirty().contains(DirtyFlags::RENDER));
    }

    #[test]
    fn test_commit_without_notify_is_silent() {
        let (_host, tasks, mut base) = setup();
        base.set_on_change(Some(Rc::new(|_| {})));
        assert!(base.commit(true, false));
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_missing_task_queue_drops_notification() {
        let host = FrameNode::new_shared(WidgetId::new(1), "Toggle");
        let mut base = ToggleBase::new(&host, ToggleContext::default(), ListenerKinds::empty());
        base.set_on_change(Some(Rc::new(|_| {})));
        assert!(base.commit(true, true));
        assert!(base.is_on);
    }

    #[test]
    fn test_dropped_host_is_noop() {
        let (host, _, mut base) = setup();
        drop(host);
        assert!(base.with_host(|_| ()).is_none());
        assert!(!base.enabled());
        base.add_hot_zone_rect(4.0, 4.0);
        assert!(base.take_layout_change().is_none());
        assert!(base.commit(true, false));
    }

    // ===== Theme Tests =====

    #[test]
    fn test_with_theme_reads_provider() {
        let (_host, _, base) = setup();
        assert_eq!(base.with_theme(|theme| theme.switch.aspect_ratio), Some(1.8));
    }

    #[test]
    fn test_with_theme_unloaded() {
        let host = FrameNode::new_shared(WidgetId::new(1), "Toggle");
        let ctx = ToggleContext::new(Rc::new(ThemeManager::unloaded()), TaskQueue::new());
        let base = ToggleBase::new(&host, ctx, ListenerKinds::empty());
        assert_eq!(base.with_theme(|_| ()), None);
    }

    #[test]
    fn test_color_mode_change_detection() {
        let manager = Rc::new(ThemeManager::default());
        let host = FrameNode::new_shared(WidgetId::new(1), "Toggle");
        let provider: Rc<dyn ThemeProvider> = manager.clone();
        let mut base =
            ToggleBase::new(&host, ToggleContext::new(provider, TaskQueue::new()), ListenerKinds::empty());

        assert!(base.take_color_mode_change());
        assert!(!base.take_color_mode_change());
        manager.set_color_mode(ColorMode::Dark);
        assert!(base.take_color_mode_change());
    }

    // ===== Hot Zone Tests =====

    #[test]
    fn test_hot_zone_wraps_content() {
        let (host, _, mut base) = setup();
        host.borrow_mut().geometry.content_size = Some(Size::new(36.0, 20.0));
        base.add_hot_zone_rect(4.0, 2.0);
        assert_eq!(
            host.borrow().response_regions,
            vec![Rect::new(-4.0, -2.0, 44.0, 24.0)]
        );

        host.borrow_mut().geometry.content_size = Some(Size::new(40.0, 20.0));
        base.refresh_hot_zone(4.0, 2.0);
        assert_eq!(host.borrow().response_regions.len(), 1);
        assert_eq!(host.borrow().response_regions[0].width, 48.0);
    }

    #[test]
    fn test_user_response_region_is_kept() {
        let (host, _, mut base) = setup();
        {
            let mut node = host.borrow_mut();
            node.is_response_region = true;
            node.response_regions.push(Rect::new(0.0, 0.0, 1.0, 1.0));
        }
        base.add_hot_zone_rect(4.0, 4.0);
        assert_eq!(host.borrow().response_regions.len(), 1);

        base.remove_last_hot_zone_rect();
        assert!(host.borrow().response_regions.is_empty());
        assert!(!host.borrow().is_response_region);
    }

    #[test]
    fn test_default_margin_only_when_unset() {
        let (host, _, base) = setup();
        base.apply_default_margin(4.0, 2.0);
        assert_eq!(host.borrow().margin, Some(Padding::symmetric(4.0, 2.0)));

        host.borrow_mut().margin = Some(Padding::ZERO);
        base.apply_default_margin(4.0, 2.0);
        assert_eq!(host.borrow().margin, Some(Padding::ZERO));
    }

    #[test]
    fn test_layout_change_reported_once() {
        let (host, _, mut base) = setup();
        host.borrow_mut().geometry.content_size = Some(Size::new(10.0, 5.0));
        assert_eq!(
            base.take_layout_change(),
            Some((Size::new(10.0, 5.0), Point::ORIGIN))
        );
        assert_eq!(base.take_layout_change(), None);
        assert_eq!(base.content_box(), Rect::new(0.0, 0.0, 10.0, 5.0));
    }

    // ===== Input / Restore Tests =====

    #[test]
    fn test_activation_requires_focus() {
        let (_host, _, mut base) = setup();
        let event = Event::KeyDown { key: Key::Function };
        assert!(!base.is_activation(&event));
        base.focus_in();
        assert!(base.is_activation(&event));
        assert!(!base.is_activation(&Event::KeyDown { key: Key::Enter }));
        assert!(!base.is_activation(&Event::KeyUp { key: Key::Function }));
    }

    #[test]
    fn test_focus_subscription_follows_focus() {
        let host = FrameNode::new_shared(WidgetId::new(5), "Toggle");
        let focus = FocusBroadcaster::new(false);
        let ctx = ToggleContext::default().with_focus(Rc::clone(&focus));
        let mut base = ToggleBase::new(&host, ctx, ListenerKinds::FOCUS);

        assert!(!base.focus_in());
        assert!(focus.is_subscribed(WidgetId::new(5)));
        base.focus_out();
        assert!(!focus.is_subscribed(WidgetId::new(5)));

        base.focus_in();
        drop(base);
        assert!(!focus.is_subscribed(WidgetId::new(5)));
    }

    #[test]
    fn test_restore_roundtrip_and_malformed() {
        let (_host, _, mut base) = setup();
        base.is_on = true;
        let json = base.restore_info();
        assert_eq!(json, r#"{"IsOn":true}"#);
        assert_eq!(base.parse_restore(&json), Some(true));
        assert_eq!(base.parse_restore("{"), None);
    }

    #[test]
    fn test_property_created_on_first_update() {
        let (host, _, base) = setup();
        assert_eq!(base.property::<u32>(), 0);
        base.update_property::<u32>(|value| *value += 2);
        base.update_property::<u32>(|value| *value += 2);
        assert_eq!(host.borrow().properties.get::<u32>(), Some(&4));
        assert_eq!(base.property::<u32>(), 4);
    }

    #[test]
    fn test_write_inspector() {
        let (host, _, base) = setup();
        base.write_inspector("Switch");
        assert_eq!(host.borrow().inspector.get("type").map(String::as_str), Some("Switch"));
        assert_eq!(host.borrow().inspector.get("isOn").map(String::as_str), Some("false"));
    }
}
