//! Minimal embedding: a counter component driven from the host loop.
//!
//! Run with `cargo run --example counter`.

use serde_json::{json, Value};

use mote_core::{ComponentSpec, Controller, ControllerState, InvokeCtx, Runtime};

struct CounterController;

impl Controller for CounterController {
    fn init(&mut self, state: &mut ControllerState) {
        state.set("count", json!(0));
    }

    fn invoke(&mut self, method: &str, _args: &[Value], ctx: &mut InvokeCtx<'_>) {
        if method == "increment" {
            let next = ctx.state.get("count").and_then(Value::as_i64).unwrap_or(0) + 1;
            ctx.state.set("count", json!(next));
            ctx.request_apply();
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut rt = Runtime::new();
    let counter = ComponentSpec::new(|state| {
        let n = state.get("count").and_then(Value::as_i64).unwrap_or(0);
        Some(format!(
            "<button onclick=\"increment()\">clicked {n} times</button>"
        ))
    })
    .controller(|| Box::new(CounterController))
    .method("increment")
    .build();

    let container = rt.create_mount_point();
    rt.mount(&counter, container);

    // simulate three clicks from the host
    let button = rt
        .tree()
        .first_by_tag(container, "button")
        .expect("counter renders a button");
    for _ in 0..3 {
        rt.dispatch(button, "onclick");
        rt.pump();
    }

    println!("{}", rt.tree().outer_html(container));
}
