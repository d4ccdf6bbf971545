//! mote core - component model, reconciler and runtime
//!
//! A component is a render function plus an optional controller. The
//! `Runtime` owns the document, the component registry and the instance
//! arena; mounting a component renders markup into a container node and
//! every subsequent `apply` reconciles the live subtree against the fresh
//! render output in place, preserving node identity wherever possible.

mod bind;
mod component;
mod controller;
mod debug;
mod instance;
mod modal;
mod reconcile;
mod registry;
mod runtime;
mod schedule;
mod state;
pub mod styles;

pub use bind::{parse_event_expr, ArgExpr, EventBinding, ModelBinding, EVENT_ATTRIBUTES};
pub use component::{ComponentDef, ComponentSpec, MetaEntry, PostRenderFn, RenderFn};
pub use controller::{Controller, ControllerFactory, InvokeCtx};
pub use debug::{debugger_enabled, enable_debugger};
pub use instance::{ComponentInstance, InstanceArena, InstanceId};
pub use modal::{ModalHandle, ModalOptions};
pub use reconcile::{reconcile, RenderEffects};
pub use registry::{ComponentRegistry, RegistryError};
pub use runtime::{NavigationRequest, Runtime};
pub use schedule::{Scheduler, Task};
pub use state::{value_to_string, ControllerState};

pub use serde_json::Value;

/// Attribute stamping a container with its owning instance's identity
pub const IDENTITY_ATTR: &str = "mote-component";
/// Two-way binding attribute (dotted controller-state path)
pub const MODEL_ATTR: &str = "model";
/// Attribute causing a registered element to be mounted on page load
pub const AUTOLOAD_ATTR: &str = "autoload";
/// Lazy-image marker attribute on `img`
pub const LAZY_ATTR: &str = "lazy";
/// Insertion point for externally supplied children
pub const SLOT_TAG: &str = "slot";
/// Insertion point for nested-route children
pub const OUTLET_TAG: &str = "router-outlet";
/// Marker guarding one-time anchor interception
pub const LISTENER_MARKER: &str = "data-listener-added";
/// Attribute identifying framework-owned `<style>` elements
pub const STYLE_MARKER_ATTR: &str = "mote";
