//! Framework runtime
//!
//! The `Runtime` is the single service object a host embeds: it owns the
//! document, the component registry, the instance arena, the cooperative
//! scheduler and the outbound event queue. Hosts drive it by mounting
//! components, feeding it DOM-level events (`dispatch`, `input`) and
//! pumping the scheduler.
//!
//! A render cycle (`apply`) parses the component's fresh markup into a
//! detached subtree and reconciles the live container against it in
//! place, then rebuilds the instance's bindings from the settled DOM.

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use mote_dom::{Document, DomEvent, DomEventKind, DomTree, EventQueue, NodeId};
use mote_html::parse_desired;

use crate::bind::{parse_event_expr, resolve_args, EventBinding, ModelBinding, EVENT_ATTRIBUTES};
use crate::component::{ComponentDef, ComponentSpec};
use crate::controller::InvokeCtx;
use crate::instance::{ComponentInstance, InstanceArena, InstanceId};
use crate::reconcile::{reconcile, RenderEffects};
use crate::registry::{ComponentRegistry, RegistryError};
use crate::schedule::{Scheduler, Task};
use crate::state::{value_to_string, ControllerState};
use crate::styles;
use crate::{AUTOLOAD_ATTR, IDENTITY_ATTR, LAZY_ATTR, LISTENER_MARKER, MODEL_ATTR, SLOT_TAG};

use std::rc::Rc;

/// An intercepted anchor navigation, for a router (or host) to consume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub path: String,
}

/// The embedding surface: document, registry, instances, scheduler
pub struct Runtime {
    doc: Document,
    registry: ComponentRegistry,
    instances: InstanceArena,
    scheduler: Scheduler,
    events: EventQueue,
    nav_requests: Vec<NavigationRequest>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            registry: ComponentRegistry::new(),
            instances: InstanceArena::new(),
            scheduler: Scheduler::new(),
            events: EventQueue::new(),
            nav_requests: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn tree(&self) -> &DomTree {
        self.doc.tree()
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        self.doc.tree_mut()
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn instance(&self, id: InstanceId) -> Option<&ComponentInstance> {
        self.instances.get(id)
    }

    pub fn state_mut(&mut self, id: InstanceId) -> Option<&mut ControllerState> {
        self.instances.get_mut(id).map(|inst| &mut inst.state)
    }

    /// Declare a component. Definitions with a tag name are registered
    /// for markup-driven mounting; anonymous ones are returned only.
    pub fn define(&mut self, spec: ComponentSpec) -> Result<Rc<ComponentDef>, RegistryError> {
        let def = spec.build();
        if def.tag_name.is_some() {
            self.registry.register(Rc::clone(&def))?;
        }
        Ok(def)
    }

    /// Create an empty `div` under `body`, as a mount target
    pub fn create_mount_point(&mut self) -> NodeId {
        let body = self.doc.body();
        let tree = self.doc.tree_mut();
        let div = tree.create_element("div");
        let _ = tree.append_child(body, div);
        div
    }

    /// Mount a component into a container node.
    ///
    /// Mounting into a container that already hosts an instance destroys
    /// the old instance and reuses its identity token, so the new render
    /// reconciles against the old markup instead of starting blank.
    pub fn mount(&mut self, def: &Rc<ComponentDef>, container: NodeId) -> InstanceId {
        self.mount_with(def, container, Map::new(), Vec::new())
    }

    /// Mount with initial state fields merged in
    pub fn mount_with_params(
        &mut self,
        def: &Rc<ComponentDef>,
        container: NodeId,
        params: Map<String, Value>,
    ) -> InstanceId {
        self.mount_with(def, container, params, Vec::new())
    }

    pub(crate) fn mount_with(
        &mut self,
        def: &Rc<ComponentDef>,
        container: NodeId,
        params: Map<String, Value>,
        external_children: Vec<NodeId>,
    ) -> InstanceId {
        let identity = match self.doc.tree().get_attr(container, IDENTITY_ATTR) {
            Some(existing) => existing.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        if let Some(previous) = self.instances.id_for_identity(&identity) {
            self.destroy(previous);
        }
        self.doc
            .tree_mut()
            .set_attr(container, IDENTITY_ATTR, &identity);

        let mut state = ControllerState::new();
        for (key, value) in params {
            state.set(key, value);
        }
        // container attributes become initial state fields, snapshotted
        // silently so the first render fires no change hooks
        for name in self.tracked_attrs(def, container) {
            let value = self
                .doc
                .tree()
                .get_attr(container, &name)
                .map(str::to_string);
            if let Some(v) = &value {
                if state.get(&name).is_none() {
                    state.set(name.clone(), Value::String(v.clone()));
                }
            }
            state.set_attr_snapshot(&name, value);
        }

        let mut controller = def.controller.as_ref().map(|factory| factory());
        if let Some(ctrl) = controller.as_mut() {
            ctrl.init(&mut state);
        }

        {
            let head = self.doc.head();
            let tree = self.doc.tree_mut();
            if let Some(css) = &def.style {
                styles::ensure_scoped_style(tree, head, &identity, css);
            }
            for entry in &def.meta {
                styles::ensure_meta(tree, head, &entry.name, &entry.content);
            }
            if let Some(title) = &def.title {
                styles::set_title(tree, head, title);
            }
        }

        let id = self.instances.insert(ComponentInstance {
            identity,
            container,
            def: Rc::clone(def),
            controller,
            state,
            children: Vec::new(),
            render_count: 0,
            model_bindings: Vec::new(),
            event_bindings: Vec::new(),
            external_children,
        });

        self.apply(id);
        self.events.emit(DomEventKind::Load, container);
        id
    }

    /// Destroy an instance: fire its hook, then tear down its nested
    /// instances depth-first. The container node is left in place.
    pub fn destroy(&mut self, id: InstanceId) {
        let Some(mut inst) = self.instances.remove(id) else {
            return;
        };
        if let Some(ctrl) = inst.controller.as_mut() {
            ctrl.on_destroy(&mut inst.state);
        }
        for child in inst.children {
            self.destroy(child);
        }
    }

    /// Run one render cycle for an instance. Returns `false` when the
    /// render function declined to produce markup (no-op cycle).
    pub fn apply(&mut self, id: InstanceId) -> bool {
        let Some(inst) = self.instances.get_mut(id) else {
            return false;
        };
        let markup = match (inst.def.render)(&inst.state) {
            Some(markup) if !markup.trim().is_empty() => markup,
            _ => return false,
        };
        inst.render_count += 1;
        let identity = inst.identity.clone();
        let container = inst.container;
        let def = Rc::clone(&inst.def);

        let head = self.doc.head();
        let mut fx = RenderEffects::default();
        {
            let tree = self.doc.tree_mut();
            styles::ensure_shared_sheet(tree, head);
            let desired = parse_desired(tree, container, &markup);
            reconcile(tree, container, desired, &identity, &mut fx);
            for transition_id in &fx.transition_ids {
                styles::ensure_transition_rule(tree, head, transition_id);
            }
            for &img in &fx.lazy_images {
                if let Some(src) = tree.get_attr(img, "src").map(str::to_string) {
                    tree.remove_attr(img, "src");
                    self.scheduler.push(Task::LazyImage { node: img, src });
                }
            }
        }

        self.rebind(id, container, &def);
        if def.intercept_links {
            self.intercept_anchors(container);
        }
        self.place_external_children(id, container);
        let mounted = self.mount_nested(container);
        self.refresh_children(id, mounted);
        self.diff_container_attrs(id, container, &def);

        self.events.emit(DomEventKind::Change, container);
        if def.post_render.is_some() {
            self.scheduler.push(Task::PostRender { instance: id });
        }
        true
    }

    /// Rebuild model and event bindings from the settled subtree
    fn rebind(&mut self, id: InstanceId, container: NodeId, def: &ComponentDef) {
        let mut models = Vec::new();
        let mut events = Vec::new();
        {
            let tree = self.doc.tree();
            for node in tree.elements_with_attr(container, MODEL_ATTR) {
                if let Some(path) = tree.get_attr(node, MODEL_ATTR) {
                    models.push(ModelBinding {
                        node,
                        path: path.to_string(),
                    });
                }
            }
            for node in tree.descendants(container) {
                for &event in EVENT_ATTRIBUTES {
                    let Some(expr) = tree.get_attr(node, event) else {
                        continue;
                    };
                    let Some((method, args)) = parse_event_expr(expr) else {
                        debug!(expr, "ignoring unparsable event expression");
                        continue;
                    };
                    if !def.allows_method(&method) {
                        debug!(%method, "method not in binding table, ignoring");
                        continue;
                    }
                    events.push(EventBinding {
                        node,
                        event: event.to_string(),
                        method,
                        args,
                    });
                }
            }
        }

        // push current state values into model-bound form controls
        let Some(inst) = self.instances.get_mut(id) else {
            return;
        };
        let tree = self.doc.tree_mut();
        for binding in &models {
            if let Some(value) = inst.state.get_path(&binding.path) {
                if let Some(text) = value_to_string(value) {
                    tree.set_attr(binding.node, "value", &text);
                }
            }
        }
        inst.model_bindings = models;
        inst.event_bindings = events;
    }

    fn intercept_anchors(&mut self, container: NodeId) {
        let tree = self.doc.tree_mut();
        for anchor in tree.elements_by_tag(container, "a") {
            if tree.has_attr(anchor, "href") && !tree.has_attr(anchor, LISTENER_MARKER) {
                tree.set_attr(anchor, LISTENER_MARKER, "true");
            }
        }
    }

    /// Re-parent externally supplied children under the first `<slot>`
    fn place_external_children(&mut self, id: InstanceId, container: NodeId) {
        let Some(inst) = self.instances.get(id) else {
            return;
        };
        if inst.external_children.is_empty() {
            return;
        }
        let children = inst.external_children.clone();
        let tree = self.doc.tree_mut();
        let Some(slot) = tree.first_by_tag(container, SLOT_TAG) else {
            return;
        };
        for child in children {
            let _ = tree.append_child(slot, child);
        }
    }

    /// Mount registered custom elements found in the rendered subtree
    fn mount_nested(&mut self, container: NodeId) -> Vec<InstanceId> {
        let candidates: Vec<NodeId> = {
            let tree = self.doc.tree();
            tree.descendants(container)
                .into_iter()
                .filter(|&node| {
                    !tree.has_attr(node, IDENTITY_ATTR)
                        && tree
                            .tag_name(node)
                            .is_some_and(|tag| self.registry.is_registered(tag))
                })
                .collect()
        };

        let mut mounted = Vec::new();
        for node in candidates {
            // a previous iteration's mount may have detached this node
            let (still_eligible, def, external) = {
                let tree = self.doc.tree();
                if !tree.is_attached(node) || tree.has_attr(node, IDENTITY_ATTR) {
                    (false, None, Vec::new())
                } else {
                    let def = tree.tag_name(node).and_then(|tag| self.registry.get(tag));
                    (def.is_some(), def, tree.child_ids(node))
                }
            };
            if !still_eligible {
                continue;
            }
            if let Some(def) = def {
                mounted.push(self.mount_with(&def, node, Map::new(), external));
            }
        }
        mounted
    }

    /// New child list: old entries whose containers survived the render,
    /// plus freshly mounted nested instances. Children whose containers
    /// the render removed are destroyed so their hooks still fire.
    fn refresh_children(&mut self, id: InstanceId, mounted: Vec<InstanceId>) {
        let Some(inst) = self.instances.get(id) else {
            return;
        };
        let old = inst.children.clone();
        let mut survivors = Vec::new();
        let mut dropped = Vec::new();
        {
            let tree = self.doc.tree();
            for cid in old {
                let Some(child) = self.instances.get(cid) else {
                    // already torn down, e.g. by an identity-reuse remount
                    continue;
                };
                if tree.is_attached(child.container)
                    && tree.get_attr(child.container, IDENTITY_ATTR)
                        == Some(child.identity.as_str())
                {
                    survivors.push(cid);
                } else {
                    dropped.push(cid);
                }
            }
        }
        for cid in dropped {
            self.destroy(cid);
        }
        survivors.extend(mounted);
        if let Some(inst) = self.instances.get_mut(id) {
            inst.children = survivors;
        }
    }

    /// Compare tracked container attributes against the last snapshot,
    /// firing the change hook for each difference
    fn diff_container_attrs(&mut self, id: InstanceId, container: NodeId, def: &ComponentDef) {
        let Some(inst) = self.instances.get_mut(id) else {
            return;
        };
        let tracked = {
            let tree = self.doc.tree();
            let mut names: Vec<String> = tree
                .attr_names(container)
                .into_iter()
                .filter(|n| n != IDENTITY_ATTR)
                .collect();
            for extra in &def.attributes {
                if !names.contains(extra) {
                    names.push(extra.clone());
                }
            }
            for known in inst.state.attr_snapshot().keys() {
                if !names.contains(known) {
                    names.push(known.clone());
                }
            }
            names
        };

        let tree = self.doc.tree();
        for name in tracked {
            let current = tree.get_attr(container, &name).map(str::to_string);
            if !inst.state.has_attr_snapshot(&name) {
                // first sighting: record without firing
                inst.state.set_attr_snapshot(&name, current);
                continue;
            }
            if inst.state.attr_snapshot().get(&name) == Some(&current) {
                continue;
            }
            inst.state.set_attr_snapshot(&name, current.clone());
            match current {
                Some(v) => inst.state.set(name.clone(), Value::String(v)),
                None => inst.state.set(name.clone(), Value::Null),
            }
            let ComponentInstance {
                controller, state, ..
            } = inst;
            if let Some(ctrl) = controller.as_mut() {
                ctrl.on_change_attribute(state, &name);
            }
        }
    }

    /// Feed a DOM event (`"onclick"`, ...) fired on `node`.
    ///
    /// Intercepted anchor clicks become navigation requests; everything
    /// else resolves to the owning instance's matching binding, queued
    /// for the next scheduler turn. Returns whether anything was bound.
    pub fn dispatch(&mut self, node: NodeId, event: &str) -> bool {
        if event == "onclick" {
            let tree = self.doc.tree();
            if tree.is_tag(node, "a") && tree.has_attr(node, LISTENER_MARKER) {
                if let Some(href) = tree.get_attr(node, "href") {
                    let path = href.to_string();
                    self.nav_requests.push(NavigationRequest { path });
                    return true;
                }
            }
        }
        let Some(id) = self.instance_for_node(node) else {
            return false;
        };
        let Some(inst) = self.instances.get(id) else {
            return false;
        };
        let Some(binding) = inst
            .event_bindings
            .iter()
            .find(|b| b.node == node && b.event == event)
        else {
            return false;
        };
        self.scheduler.push(Task::InvokeHandler {
            instance: id,
            method: binding.method.clone(),
            args: binding.args.clone(),
            target: node,
            event: event.to_string(),
        });
        true
    }

    /// Feed a form-control input: writes through the node's model
    /// binding into controller state. Returns whether a binding matched.
    pub fn input(&mut self, node: NodeId, value: &str) -> bool {
        let Some(id) = self.instance_for_node(node) else {
            return false;
        };
        let Some(inst) = self.instances.get_mut(id) else {
            return false;
        };
        let Some(binding) = inst.model_bindings.iter().find(|b| b.node == node) else {
            return false;
        };
        let path = binding.path.clone();
        inst.state.set_path(&path, Value::String(value.to_string()));
        self.doc.tree_mut().set_attr(node, "value", value);
        self.events.emit(DomEventKind::Input, node);
        true
    }

    /// Run one scheduler turn. Returns the number of tasks processed.
    pub fn pump(&mut self) -> usize {
        let turn = self.scheduler.take_turn();
        let count = turn.len();
        for task in turn {
            match task {
                Task::LazyImage { node, src } => {
                    let tree = self.doc.tree_mut();
                    if !tree.is_attached(node) {
                        continue;
                    }
                    tree.set_attr(node, "src", &src);
                    tree.remove_attr(node, LAZY_ATTR);
                    let class = match tree.get_attr(node, "class") {
                        Some(existing) => format!("{existing} loaded"),
                        None => "loaded".to_string(),
                    };
                    tree.set_attr(node, "class", &class);
                }
                Task::PostRender { instance } => {
                    if let Some(inst) = self.instances.get_mut(instance) {
                        if let Some(hook) = inst.def.post_render.clone() {
                            hook(&mut inst.state);
                        }
                    }
                }
                Task::InvokeHandler {
                    instance,
                    method,
                    args,
                    target,
                    event,
                } => {
                    // a handler queued before a re-render may point at a
                    // node that no longer exists on the page
                    if !self.doc.tree().is_attached(target) {
                        continue;
                    }
                    let apply_after = {
                        let Some(inst) = self.instances.get_mut(instance) else {
                            continue;
                        };
                        let values = resolve_args(&inst.state, &args);
                        let ComponentInstance {
                            controller, state, ..
                        } = inst;
                        let Some(ctrl) = controller.as_mut() else {
                            continue;
                        };
                        let mut ctx = InvokeCtx::new(state, target, &event);
                        ctrl.invoke(&method, &values, &mut ctx);
                        ctx.apply_requested()
                    };
                    if apply_after {
                        self.apply(instance);
                    }
                }
            }
        }
        count
    }

    /// Mount every registered element under `body` carrying the autoload
    /// attribute. Host calls this once after initial page setup.
    pub fn autoload(&mut self) -> Vec<InstanceId> {
        let body = self.doc.body();
        let candidates: Vec<NodeId> = {
            let tree = self.doc.tree();
            tree.elements_with_attr(body, AUTOLOAD_ATTR)
                .into_iter()
                .filter(|&node| {
                    !tree.has_attr(node, IDENTITY_ATTR)
                        && tree
                            .tag_name(node)
                            .is_some_and(|tag| self.registry.is_registered(tag))
                })
                .collect()
        };
        let mut mounted = Vec::new();
        for node in candidates {
            let (def, external) = {
                let tree = self.doc.tree();
                if !tree.is_attached(node) || tree.has_attr(node, IDENTITY_ATTR) {
                    continue;
                }
                let Some(def) = tree.tag_name(node).and_then(|tag| self.registry.get(tag)) else {
                    continue;
                };
                (def, tree.child_ids(node))
            };
            mounted.push(self.mount_with(&def, node, Map::new(), external));
        }
        mounted
    }

    /// The instance owning `node`: the nearest self-or-ancestor element
    /// carrying an identity marker
    pub fn instance_for_node(&self, node: NodeId) -> Option<InstanceId> {
        let tree = self.doc.tree();
        if let Some(identity) = tree.get_attr(node, IDENTITY_ATTR) {
            return self.instances.id_for_identity(identity);
        }
        for ancestor in tree.ancestors(node) {
            if let Some(identity) = tree.get_attr(ancestor, IDENTITY_ATTR) {
                return self.instances.id_for_identity(identity);
            }
        }
        None
    }

    /// Drain queued DOM-level events
    pub fn take_events(&mut self) -> Vec<DomEvent> {
        self.events.take()
    }

    /// Drain intercepted anchor navigations
    pub fn take_navigation_requests(&mut self) -> Vec<NavigationRequest> {
        std::mem::take(&mut self.nav_requests)
    }

    /// Drop all component-scoped style sheets (route swaps)
    pub fn remove_scoped_styles(&mut self) {
        let head = self.doc.head();
        styles::remove_scoped_styles(self.doc.tree_mut(), head);
    }

    fn tracked_attrs(&self, def: &ComponentDef, container: NodeId) -> Vec<String> {
        let tree = self.doc.tree();
        let mut names: Vec<String> = tree
            .attr_names(container)
            .into_iter()
            .filter(|n| n != IDENTITY_ATTR)
            .collect();
        for extra in &def.attributes {
            if !names.contains(extra) {
                names.push(extra.clone());
            }
        }
        names
    }
}
