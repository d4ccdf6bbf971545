//! Modal dialogs
//!
//! A modal is an ordinary component mounted into a dialog node that the
//! runtime creates under `body`, wrapped in a full-viewport overlay. The
//! returned handle closes the dialog and routes overlay clicks.

use serde_json::{Map, Value};

use mote_dom::{DomRect, NodeId};

use crate::component::ComponentDef;
use crate::instance::InstanceId;
use crate::runtime::Runtime;

use std::rc::Rc;

const OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100vw; \
     height: 100vh; background-color: rgba(0, 0, 0, 0.5); display: flex; \
     justify-content: center; align-items: center; z-index: 999999999;";

const REFERRER_OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100vw; \
     height: 100vh; background-color: transparent; z-index: 999999999;";

const DIALOG_STYLE: &str =
    "background-color: white; border-radius: 0.5rem; overflow: hidden; \
     box-shadow: 0 0.25rem 1rem rgba(0, 0, 0, 0.25);";

/// Modal presentation options
#[derive(Default)]
pub struct ModalOptions {
    /// Close the modal when the overlay itself is clicked
    pub hide_when_click_overlay: bool,
    /// Class set on the dialog node
    pub class_name: Option<String>,
    /// Anchor rectangle: position the dialog next to it instead of
    /// centering, with a transparent overlay
    pub referrer: Option<DomRect>,
}

/// Handle to an open modal
pub struct ModalHandle {
    pub instance: InstanceId,
    pub overlay: NodeId,
    pub dialog: NodeId,
    close_on_overlay: bool,
}

impl ModalHandle {
    /// Route a click that landed on `node`. Returns `true` when the
    /// click closed the modal.
    pub fn click(&self, rt: &mut Runtime, node: NodeId) -> bool {
        if node == self.overlay && self.close_on_overlay {
            self.close(rt);
            return true;
        }
        false
    }

    /// Destroy the hosted instance and remove the dialog from the page
    pub fn close(&self, rt: &mut Runtime) {
        rt.destroy(self.instance);
        rt.tree_mut().detach(self.overlay);
    }
}

impl Runtime {
    /// Open a component as a modal dialog over the current page
    pub fn open_modal(
        &mut self,
        def: &Rc<ComponentDef>,
        params: Map<String, Value>,
        opts: ModalOptions,
    ) -> ModalHandle {
        let body = self.document().body();
        let (overlay, dialog) = {
            let tree = self.tree_mut();
            let overlay = tree.create_element("div");
            let dialog = tree.create_element("div");
            match &opts.referrer {
                Some(rect) => {
                    tree.set_attr(overlay, "style", REFERRER_OVERLAY_STYLE);
                    let placed = format!(
                        "{DIALOG_STYLE} position: absolute; top: {}px; left: {}px;",
                        rect.bottom() + 1.0,
                        rect.left()
                    );
                    tree.set_attr(dialog, "style", &placed);
                }
                None => {
                    tree.set_attr(overlay, "style", OVERLAY_STYLE);
                    tree.set_attr(dialog, "style", DIALOG_STYLE);
                }
            }
            if let Some(class) = &opts.class_name {
                tree.set_attr(dialog, "class", class);
            }
            let _ = tree.append_child(overlay, dialog);
            let _ = tree.append_child(body, overlay);
            (overlay, dialog)
        };

        let instance = self.mount_with(def, dialog, params, Vec::new());
        ModalHandle {
            instance,
            overlay,
            dialog,
            close_on_overlay: opts.hide_when_click_overlay,
        }
    }
}
