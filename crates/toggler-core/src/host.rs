//! Host node contract: the scene-graph node a widget pattern is attached to.
//!
//! The scene graph owns [`FrameNode`]s behind `Rc<RefCell<_>>`; patterns keep a
//! `Weak` handle and treat a dropped node as "nothing to do".

use crate::constraints::{LayoutConstraint, LayoutPolicies};
use crate::geometry::{Padding, Point, Rect, Size};
use crate::theme::ThemeScope;
use crate::widget::{Widget, WidgetId};
use bitflags::bitflags;
use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

bitflags! {
    /// Work the host must redo for a node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// Size may change; re-run measure and layout
        const MEASURE = 0b01;
        /// Appearance changed; repaint
        const RENDER  = 0b10;
    }
}

bitflags! {
    /// Input listener kinds registered on a node's event hub.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ListenerKinds: u8 {
        /// Click / tap
        const CLICK = 0b0000_0001;
        /// Touch down, up, cancel
        const TOUCH = 0b0000_0010;
        /// Mouse enter / leave
        const HOVER = 0b0000_0100;
        /// Pan gesture
        const PAN   = 0b0000_1000;
        /// Key down / up
        const KEY   = 0b0001_0000;
        /// Focus in / out
        const FOCUS = 0b0010_0000;
    }
}

/// Size and position produced by layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryNode {
    /// Size of the whole frame, padding included
    pub frame_size: Size,
    /// Size of the content box, `None` when collapsed
    pub content_size: Option<Size>,
    /// Content box position relative to the frame
    pub content_offset: Point,
    /// Frame position in the parent, set by layout
    pub frame_offset: Point,
}

impl GeometryNode {
    /// Collapse to an empty geometry.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Content size, zero when collapsed.
    #[must_use]
    pub fn content_size_or_zero(&self) -> Size {
        self.content_size.unwrap_or_default()
    }

    /// Content box in frame coordinates.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        Rect::from_origin_size(self.content_offset, self.content_size_or_zero())
    }

    /// Content box origin in parent coordinates.
    #[must_use]
    pub fn paint_offset(&self) -> Point {
        self.frame_offset + self.content_offset
    }
}

/// Values stored on a node, keyed by their type.
///
/// Patterns keep their paint property here so the host can inspect it and so
/// it survives pattern re-creation.
#[derive(Default)]
pub struct PropertyStore {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl PropertyStore {
    /// Value of type `T`, if present.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref())
    }

    /// Mutable value of type `T`, if present.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|value| value.downcast_mut())
    }

    /// Store a value, replacing one of the same type.
    pub fn insert<T: 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Remove and return the value of type `T`.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast().ok())
            .map(|value| *value)
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyStore")
            .field("len", &self.values.len())
            .finish()
    }
}

/// A child subtree attached to a node, e.g. custom toggle content.
pub struct ChildNode {
    /// Node id
    pub id: WidgetId,
    /// Widget rendering the subtree
    pub widget: Box<dyn Widget>,
    /// Geometry from the last measure
    pub geometry: GeometryNode,
}

impl ChildNode {
    /// Wrap a widget.
    #[must_use]
    pub fn new(id: WidgetId, widget: Box<dyn Widget>) -> Self {
        Self {
            id,
            widget,
            geometry: GeometryNode::default(),
        }
    }

    /// Measure the widget and record its size.
    pub fn measure(&mut self, constraint: &LayoutConstraint) -> Size {
        let size = self.widget.measure(constraint);
        self.geometry.frame_size = size;
        self.geometry.content_size = Some(size);
        size
    }
}

impl fmt::Debug for ChildNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildNode")
            .field("id", &self.id)
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

/// Scene-graph node hosting a widget pattern.
#[derive(Debug)]
pub struct FrameNode {
    id: WidgetId,
    tag: &'static str,
    next_child_id: u64,
    dirty: DirtyFlags,
    listeners: ListenerKinds,
    /// Geometry from the last layout pass
    pub geometry: GeometryNode,
    /// Child subtrees
    pub children: Vec<ChildNode>,
    /// Hit-test rectangles, relative to the frame
    pub response_regions: Vec<Rect>,
    /// The user supplied `response_regions` explicitly
    pub is_response_region: bool,
    /// Inner focus rectangle painted by the host's focus pass
    pub focus_paint_rect: Option<Rect>,
    /// Theme scope of this subtree
    pub theme_scope: Option<ThemeScope>,
    /// Per-axis layout policy
    pub layout_policies: LayoutPolicies,
    /// Layout padding
    pub padding: Padding,
    /// Margin; `None` when the user never set one
    pub margin: Option<Padding>,
    /// Whether the node accepts input
    pub enabled: bool,
    /// Inspector attributes
    pub inspector: BTreeMap<String, String>,
    /// Typed property storage
    pub properties: PropertyStore,
}

impl FrameNode {
    /// Create a node.
    #[must_use]
    pub fn new(id: WidgetId, tag: &'static str) -> Self {
        Self {
            id,
            tag,
            next_child_id: id.0.saturating_mul(1000).saturating_add(1),
            dirty: DirtyFlags::empty(),
            listeners: ListenerKinds::empty(),
            geometry: GeometryNode::default(),
            children: Vec::new(),
            response_regions: Vec::new(),
            is_response_region: false,
            focus_paint_rect: None,
            theme_scope: None,
            layout_policies: LayoutPolicies::default(),
            padding: Padding::ZERO,
            margin: None,
            enabled: true,
            inspector: BTreeMap::new(),
            properties: PropertyStore::default(),
        }
    }

    /// Create a node already wrapped for sharing.
    #[must_use]
    pub fn new_shared(id: WidgetId, tag: &'static str) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(id, tag)))
    }

    /// Node id.
    #[must_use]
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    /// Widget tag, e.g. `"Toggle"`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Allocate an id for a new child subtree.
    pub fn allocate_child_id(&mut self) -> WidgetId {
        let id = WidgetId::new(self.next_child_id);
        self.next_child_id += 1;
        id
    }

    /// Request host work.
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    /// Pending host work.
    #[must_use]
    pub const fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Take and clear pending host work.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    /// Register listener kinds on the event hub.
    pub fn register_listeners(&mut self, kinds: ListenerKinds) {
        self.listeners |= kinds;
    }

    /// Remove listener kinds from the event hub.
    pub fn unregister_listeners(&mut self, kinds: ListenerKinds) {
        self.listeners.remove(kinds);
    }

    /// Listener kinds currently registered.
    #[must_use]
    pub const fn listeners(&self) -> ListenerKinds {
        self.listeners
    }

    /// Child with the given id.
    #[must_use]
    pub fn child(&self, id: WidgetId) -> Option<&ChildNode> {
        self.children.iter().find(|child| child.id == id)
    }

    /// Remove the child with the given id.
    pub fn remove_child(&mut self, id: WidgetId) -> Option<ChildNode> {
        let index = self.children.iter().position(|child| child.id == id)?;
        Some(self.children.remove(index))
    }

    /// Whether a point in frame coordinates hits a response region.
    ///
    /// With no regions registered the frame itself is the hit area.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> bool {
        if self.response_regions.is_empty() {
            Rect::from_origin_size(Point::ORIGIN, self.geometry.frame_size).contains_point(&point)
        } else {
            self.response_regions
                .iter()
                .any(|region| region.contains_point(&point))
        }
    }
}

/// Broadcast of system-wide focus visibility (e.g. keyboard navigation on).
///
/// Focused widgets subscribe so their ring can follow visibility changes
/// without being refocused.
#[derive(Debug, Default)]
pub struct FocusBroadcaster {
    active: Cell<bool>,
    subscribers: RefCell<BTreeSet<WidgetId>>,
}

impl FocusBroadcaster {
    /// Create a broadcaster with the given initial visibility.
    #[must_use]
    pub fn new(active: bool) -> Rc<Self> {
        Rc::new(Self {
            active: Cell::new(active),
            subscribers: RefCell::new(BTreeSet::new()),
        })
    }

    /// Current visibility.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Subscribe a node.
    pub fn subscribe(&self, id: WidgetId) {
        self.subscribers.borrow_mut().insert(id);
    }

    /// Unsubscribe a node.
    pub fn unsubscribe(&self, id: WidgetId) {
        self.subscribers.borrow_mut().remove(&id);
    }

    /// Whether a node is subscribed.
    #[must_use]
    pub fn is_subscribed(&self, id: WidgetId) -> bool {
        self.subscribers.borrow().contains(&id)
    }

    /// Change visibility. Returns the subscribers the host must notify with
    /// a focus-active event; empty when nothing changed.
    pub fn set_active(&self, active: bool) -> Vec<WidgetId> {
        if self.active.replace(active) == active {
            return Vec::new();
        }
        self.subscribers.borrow().iter().copied().collect()
    }
}

/// Weak handle to a host node.
pub type HostRef = Weak<RefCell<FrameNode>>;

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // PropertyStore Tests
    // =========================================================================

    #[derive(Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn test_property_store_typed_access() {
        let mut store = PropertyStore::default();
        assert!(store.get::<Marker>().is_none());
        store.insert(Marker(3));
        store.insert(7u8);
        assert_eq!(store.get::<Marker>(), Some(&Marker(3)));
        assert_eq!(store.get::<u8>(), Some(&7));
        assert_eq!(store.len(), 2);

        store.get_mut::<Marker>().unwrap().0 = 4;
        assert_eq!(store.remove::<Marker>(), Some(Marker(4)));
        assert!(store.get::<Marker>().is_none());
    }

    // =========================================================================
    // FrameNode Tests
    // =========================================================================

    #[test]
    fn test_frame_node_dirty_flags() {
        let mut node = FrameNode::new(WidgetId::new(1), "Toggle");
        node.mark_dirty(DirtyFlags::RENDER);
        node.mark_dirty(DirtyFlags::MEASURE);
        assert_eq!(node.dirty(), DirtyFlags::all());
        assert_eq!(node.take_dirty(), DirtyFlags::all());
        assert!(node.dirty().is_empty());
    }

    #[test]
    fn test_frame_node_listeners() {
        let mut node = FrameNode::new(WidgetId::new(1), "Toggle");
        node.register_listeners(ListenerKinds::CLICK | ListenerKinds::PAN);
        node.unregister_listeners(ListenerKinds::PAN);
        assert_eq!(node.listeners(), ListenerKinds::CLICK);
    }

    #[test]
    fn test_frame_node_child_ids_are_unique() {
        let mut node = FrameNode::new(WidgetId::new(2), "Toggle");
        let a = node.allocate_child_id();
        let b = node.allocate_child_id();
        assert_ne!(a, b);
        assert_ne!(a, node.id());
    }

    #[test]
    fn test_frame_node_hit_test() {
        let mut node = FrameNode::new(WidgetId::new(1), "Toggle");
        node.geometry.frame_size = Size::new(36.0, 20.0);
        assert!(node.hit_test(Point::new(10.0, 10.0)));
        assert!(!node.hit_test(Point::new(40.0, 10.0)));

        node.response_regions.push(Rect::new(-4.0, -4.0, 44.0, 28.0));
        assert!(node.hit_test(Point::new(39.0, -3.0)));
    }

    #[test]
    fn test_geometry_reset() {
        let mut geometry = GeometryNode {
            frame_size: Size::new(1.0, 1.0),
            content_size: Some(Size::new(1.0, 1.0)),
            content_offset: Point::new(2.0, 2.0),
            frame_offset: Point::new(5.0, 0.0),
        };
        assert_eq!(geometry.paint_offset(), Point::new(7.0, 2.0));
        geometry.reset();
        assert_eq!(geometry, GeometryNode::default());
        assert_eq!(geometry.content_rect(), Rect::default());
    }

    // =========================================================================
    // FocusBroadcaster Tests
    // =========================================================================

    #[test]
    fn test_focus_broadcaster_notifies_subscribers_on_change() {
        let broadcaster = FocusBroadcaster::new(false);
        broadcaster.subscribe(WidgetId::new(1));
        broadcaster.subscribe(WidgetId::new(2));
        broadcaster.unsubscribe(WidgetId::new(2));

        assert_eq!(broadcaster.set_active(true), vec![WidgetId::new(1)]);
        assert!(broadcaster.is_active());
        assert!(broadcaster.set_active(true).is_empty());
    }
}
