//! Core types and traits for the Toggler widget runtime.
//!
//! This crate provides the foundation the toggle widgets are built on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`], [`Padding`]
//! - Color representation: [`Color`]
//! - Layout constraints: [`LayoutConstraint`]
//! - Input: [`Event`], [`Key`], [`GestureState`]
//! - Animation: [`AnimatableValue`] advanced by an external `tick`
//! - Rendering: the [`Canvas`] trait and [`RecordingCanvas`]
//! - Theming: [`Theme`] behind the read-only [`ThemeProvider`]
//! - Hosting: [`FrameNode`], [`TaskQueue`], [`FocusBroadcaster`]

pub mod animation;
pub mod canvas;
mod color;
pub mod config;
mod constraints;
pub mod draw;
mod event;
mod geometry;
pub mod host;
pub mod task;
pub mod theme;
pub mod widget;

pub use animation::{AnimatableValue, Easing, Interpolate, SpringConfig, Transition};
pub use canvas::RecordingCanvas;
pub use color::Color;
pub use config::PlatformConfig;
pub use constraints::{LayoutConstraint, LayoutPolicies, LayoutPolicy, OptionalSize};
pub use draw::DrawCommand;
pub use event::{Event, GestureState, Key, PointerType};
pub use geometry::{Padding, Point, Rect, Size};
pub use host::{
    ChildNode, DirtyFlags, FocusBroadcaster, FrameNode, GeometryNode, HostRef, ListenerKinds,
    PropertyStore,
};
pub use task::TaskQueue;
pub use theme::{
    CheckboxTheme, ColorMode, SwitchTheme, Theme, ThemeError, ThemeManager, ThemeProvider,
    ThemeScope, ToggleButtonTheme,
};
pub use widget::{
    AccessibleRole, Canvas, EventResult, LayoutResult, TypeId, Widget, WidgetId,
};
