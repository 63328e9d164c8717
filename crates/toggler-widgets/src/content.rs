//! User-supplied content replacing the default toggle rendering.

use serde::Serialize;
use std::fmt;
use std::rc::Rc;
use toggler_core::{ChildNode, DirtyFlags, FrameNode, Widget, WidgetId};
use tracing::debug;

/// What a content builder receives on every rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleConfiguration {
    /// Current state
    pub is_on: bool,
    /// Whether the toggle accepts input
    pub enabled: bool,
}

/// Builds the custom content subtree for a configuration.
pub type ContentBuilder = Rc<dyn Fn(ToggleConfiguration) -> Box<dyn Widget>>;

/// Custom content slot of a toggle.
#[derive(Default)]
pub struct CustomContent {
    builder: Option<ContentBuilder>,
    node: Option<WidgetId>,
}

impl fmt::Debug for CustomContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomContent")
            .field("active", &self.builder.is_some())
            .field("node", &self.node)
            .finish()
    }
}

impl CustomContent {
    /// Whether a builder is installed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.builder.is_some()
    }

    /// Id of the built content node.
    #[must_use]
    pub const fn node(&self) -> Option<WidgetId> {
        self.node
    }

    /// Install or remove the builder. Removing drops the built subtree.
    pub fn set_builder(&mut self, host: &mut FrameNode, builder: Option<ContentBuilder>) {
        self.builder = builder;
        if self.builder.is_none() {
            if let Some(id) = self.node.take() {
                host.remove_child(id);
                debug!(node = ?id, "custom content removed");
            }
            host.mark_dirty(DirtyFlags::MEASURE | DirtyFlags::RENDER);
        }
    }

    /// Rebuild the subtree for a new configuration. No-op without a builder.
    pub fn rebuild(&mut self, host: &mut FrameNode, config: ToggleConfiguration) {
        let Some(builder) = self.builder.as_ref() else {
            return;
        };
        let widget = builder(config);
        let id = match self.node {
            Some(id) => {
                host.remove_child(id);
                id
            }
            None => host.allocate_child_id(),
        };
        host.children.push(ChildNode::new(id, widget));
        self.node = Some(id);
        host.mark_dirty(DirtyFlags::MEASURE | DirtyFlags::RENDER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use toggler_core::{
        Canvas, Event, EventResult, LayoutConstraint, LayoutResult, Rect, Size, TypeId,
    };

    struct Probe(bool);

    impl Widget for Probe {
        fn type_id(&self) -> TypeId {
            TypeId::of::<Self>()
        }
        fn measure(&self, _constraint: &LayoutConstraint) -> Size {
            if self.0 {
                Size::new(2.0, 2.0)
            } else {
                Size::ZERO
            }
        }
        fn layout(&mut self, bounds: Rect) -> LayoutResult {
            LayoutResult {
                size: bounds.size(),
            }
        }
        fn paint(&self, _canvas: &mut dyn Canvas) {}
        fn event(&mut self, _event: &Event) -> EventResult {
            EventResult::Ignored
        }
    }

    #[test]
    fn test_rebuild_reuses_node_id() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let builder: ContentBuilder = Rc::new(move |config: ToggleConfiguration| {
            log.borrow_mut().push(config.is_on);
            Box::new(Probe(config.is_on))
        });

        let mut host = FrameNode::new(WidgetId::new(1), "Toggle");
        let mut content = CustomContent::default();
        content.set_builder(&mut host, Some(builder));
        assert!(content.is_active());

        let config = ToggleConfiguration {
            is_on: false,
            enabled: true,
        };
        content.rebuild(&mut host, config);
        let first = content.node();
        content.rebuild(&mut host, ToggleConfiguration { is_on: true, ..config });

        assert_eq!(content.node(), first);
        assert_eq!(host.children.len(), 1);
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn test_clearing_builder_removes_subtree() {
        let builder: ContentBuilder = Rc::new(|_| Box::new(Probe(false)));
        let mut host = FrameNode::new(WidgetId::new(1), "Toggle");
        let mut content = CustomContent::default();
        content.set_builder(&mut host, Some(builder));
        content.rebuild(
            &mut host,
            ToggleConfiguration {
                is_on: true,
                enabled: true,
            },
        );
        host.take_dirty();

        content.set_builder(&mut host, None);
        assert!(host.children.is_empty());
        assert_eq!(content.node(), None);
        assert!(host.dirty().contains(DirtyFlags::MEASURE));
    }

    #[test]
    fn test_rebuild_without_builder_is_noop() {
        let mut host = FrameNode::new(WidgetId::new(1), "Toggle");
        CustomContent::default().rebuild(
            &mut host,
            ToggleConfiguration {
                is_on: true,
                enabled: true,
            },
        );
        assert!(host.children.is_empty());
    }
}
