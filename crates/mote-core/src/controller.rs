//! Controller capabilities
//!
//! Controllers are behavior attached to an instance: bound-method dispatch
//! plus lifecycle hooks. State lives separately in `ControllerState`; a
//! component without a controller is state-only and still renders.

use std::rc::Rc;

use mote_dom::NodeId;
use serde_json::Value;

use crate::state::ControllerState;

/// Behavior attached to a component instance. Every hook defaults to a
/// no-op so controllers implement only what they need.
pub trait Controller {
    /// Called once when the instance is created, before the first render
    fn init(&mut self, _state: &mut ControllerState) {}

    /// Dispatch a method bound from markup (`onclick="save(name)"`).
    /// Only methods declared in the component's binding table reach here.
    fn invoke(&mut self, _method: &str, _args: &[Value], _ctx: &mut InvokeCtx<'_>) {}

    /// Called when the instance is destroyed
    fn on_destroy(&mut self, _state: &mut ControllerState) {}

    /// Called when a tracked container attribute changes between renders
    fn on_change_attribute(&mut self, _state: &mut ControllerState, _name: &str) {}
}

/// Factory producing a fresh controller per instance
pub type ControllerFactory = Rc<dyn Fn() -> Box<dyn Controller>>;

/// Context handed to `Controller::invoke`
pub struct InvokeCtx<'a> {
    /// The instance's state
    pub state: &'a mut ControllerState,
    /// Element the event fired on
    pub target: NodeId,
    /// The triggering event attribute name (`"onclick"`, ...)
    pub event: &'a str,
    apply_requested: bool,
}

impl<'a> InvokeCtx<'a> {
    pub(crate) fn new(state: &'a mut ControllerState, target: NodeId, event: &'a str) -> Self {
        Self {
            state,
            target,
            event,
            apply_requested: false,
        }
    }

    /// Ask the runtime to re-render this instance after the handler returns
    pub fn request_apply(&mut self) {
        self.apply_requested = true;
    }

    pub(crate) fn apply_requested(&self) -> bool {
        self.apply_requested
    }
}
