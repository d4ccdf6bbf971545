//! Component instances
//!
//! Instances live in an arena keyed by `InstanceId`, with a secondary
//! index from identity token to id. Parent-child edges are id lists on
//! the parent, which keeps teardown a pure id walk with no ownership
//! cycles.

use std::collections::HashMap;
use std::rc::Rc;

use mote_dom::NodeId;

use crate::bind::{EventBinding, ModelBinding};
use crate::component::ComponentDef;
use crate::controller::Controller;
use crate::state::ControllerState;

/// Instance identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

/// A mounted component instance
pub struct ComponentInstance {
    /// Stable identity token stamped on the container
    pub identity: String,
    /// The container node this instance renders into
    pub container: NodeId,
    /// The definition this instance was mounted from
    pub def: Rc<ComponentDef>,
    /// Optional controller behavior
    pub controller: Option<Box<dyn Controller>>,
    /// Controller state bag
    pub state: ControllerState,
    /// Nested instances discovered in this instance's rendered output
    pub children: Vec<InstanceId>,
    /// Successful render cycles so far
    pub render_count: u64,
    pub(crate) model_bindings: Vec<ModelBinding>,
    pub(crate) event_bindings: Vec<EventBinding>,
    pub(crate) external_children: Vec<NodeId>,
}

/// Arena of live instances
#[derive(Default)]
pub struct InstanceArena {
    instances: HashMap<u64, ComponentInstance>,
    by_identity: HashMap<String, InstanceId>,
    next: u64,
}

impl InstanceArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an instance, indexing its identity
    pub fn insert(&mut self, instance: ComponentInstance) -> InstanceId {
        let id = InstanceId(self.next);
        self.next += 1;
        self.by_identity.insert(instance.identity.clone(), id);
        self.instances.insert(id.0, instance);
        id
    }

    pub fn get(&self, id: InstanceId) -> Option<&ComponentInstance> {
        self.instances.get(&id.0)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut ComponentInstance> {
        self.instances.get_mut(&id.0)
    }

    /// Remove an instance, dropping its identity index entry
    pub fn remove(&mut self, id: InstanceId) -> Option<ComponentInstance> {
        let instance = self.instances.remove(&id.0)?;
        if self.by_identity.get(&instance.identity) == Some(&id) {
            self.by_identity.remove(&instance.identity);
        }
        Some(instance)
    }

    /// Look an instance up by identity token
    pub fn id_for_identity(&self, identity: &str) -> Option<InstanceId> {
        self.by_identity.get(identity).copied()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
