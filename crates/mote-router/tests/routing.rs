//! Full navigation flows: matching, nested mounting, middleware gating,
//! history stepping and teardown.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use mote_core::{ComponentSpec, Controller, ControllerState, Runtime};
use mote_router::{ErrorRoute, Gate, Route, Router, RouterConfig};

fn strip_ws(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn page(markup: &'static str) -> Rc<mote_core::ComponentDef> {
    ComponentSpec::new(move |_| Some(markup.to_string())).build()
}

#[test]
fn test_exact_route_renders() {
    let mut rt = Runtime::new();
    let mut router = Router::new(
        vec![
            Route::new("/", page("<h1>home</h1>")),
            Route::new("/about", page("<h1>about</h1>")),
        ],
        RouterConfig::default(),
    );

    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));
    assert!(strip_ws(&rt.tree().text_content(container)).contains("home"));

    router.navigate(&mut rt, "/about");
    assert!(strip_ws(&rt.tree().text_content(container)).contains("about"));
    assert_eq!(router.current_path(), Some("/about"));
}

#[test]
fn test_dynamic_segment_becomes_state_field() {
    let mut rt = Runtime::new();
    let user = ComponentSpec::new(|state| {
        let id = state.get("id").and_then(|v| v.as_str()).unwrap_or("?");
        Some(format!("<p>user {id}</p>"))
    })
    .build();

    let mut router = Router::new(
        vec![Route::new("/users/:id", user)],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));

    router.navigate(&mut rt, "/users/42");
    assert!(strip_ws(&rt.tree().text_content(container)).contains("user42"));
    assert_eq!(router.params().get("id").map(String::as_str), Some("42"));
}

#[test]
fn test_segment_count_mismatch_hits_fallback() {
    let mut rt = Runtime::new();
    let mut router = Router::new(
        vec![Route::new("/users/:id", page("<p>user</p>"))],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));

    router.navigate(&mut rt, "/users/42/edit");
    assert!(rt.tree().text_content(container).contains("404"));
    assert_eq!(router.alias(), Some("404"));
}

#[test]
fn test_configured_error_route() {
    let mut rt = Runtime::new();
    let mut router = Router::new(
        vec![Route::new("/", page("<p>home</p>"))],
        RouterConfig {
            error: Some(ErrorRoute {
                component: page("<p>lost?</p>"),
                alias: Some("lost".into()),
            }),
            ..Default::default()
        },
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));

    router.navigate(&mut rt, "/nope");
    assert!(rt.tree().text_content(container).contains("lost?"));
    assert_eq!(router.alias(), Some("lost"));
}

#[test]
fn test_nested_route_mounts_into_outlet() {
    let mut rt = Runtime::new();
    let parent = page("<header>app</header><router-outlet></router-outlet>");
    let mut router = Router::new(
        vec![Route::new("/app", parent).child(Route::new("settings", page("<p>settings</p>")))],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));

    router.navigate(&mut rt, "/app/settings");
    let outlet = rt.tree().first_by_tag(container, "router-outlet").unwrap();
    assert!(strip_ws(&rt.tree().text_content(outlet)).contains("settings"));
    assert!(strip_ws(&rt.tree().text_content(container)).contains("app"));
    assert!(router.diagnostics().is_empty());
}

#[test]
fn test_missing_outlet_falls_back_to_container() {
    let mut rt = Runtime::new();
    let parent = page("<header>no outlet here</header>");
    let mut router = Router::new(
        vec![Route::new("/app", parent).child(Route::new("settings", page("<p>settings</p>")))],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));

    router.navigate(&mut rt, "/app/settings");
    assert!(strip_ws(&rt.tree().text_content(container)).contains("settings"));
    assert_eq!(router.diagnostics().len(), 1);
    assert!(router.diagnostics()[0].contains("router-outlet"));
}

#[test]
fn test_navigation_tears_down_previous_page() {
    struct Tracked {
        log: Rc<RefCell<Vec<String>>>,
    }
    impl Controller for Tracked {
        fn on_destroy(&mut self, _state: &mut ControllerState) {
            self.log.borrow_mut().push("destroyed".into());
        }
    }

    let mut rt = Runtime::new();
    let log: Rc<RefCell<Vec<String>>> = Rc::default();
    let hook_log = Rc::clone(&log);
    let home = ComponentSpec::new(|_| Some("<p>home</p>".into()))
        .controller(move || {
            Box::new(Tracked {
                log: Rc::clone(&hook_log),
            })
        })
        .build();

    let mut router = Router::new(
        vec![
            Route::new("/", home),
            Route::new("/next", page("<p>next</p>")),
        ],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));
    assert!(log.borrow().is_empty());

    router.navigate(&mut rt, "/next");
    assert_eq!(*log.borrow(), vec!["destroyed".to_string()]);
}

#[test]
fn test_middleware_gates_the_mount() {
    let mut rt = Runtime::new();
    let held: Rc<RefCell<Option<Gate>>> = Rc::default();

    let slot = Rc::clone(&held);
    let guarded = Route::new("/secure", page("<p>secret</p>"))
        .middleware(move |gate| {
            *slot.borrow_mut() = Some(gate);
        });
    let mut router = Router::new(
        vec![Route::new("/", page("<p>home</p>")), guarded],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));

    router.navigate(&mut rt, "/secure");
    // gate not fired: the new page must not be mounted yet
    assert!(!rt.tree().text_content(container).contains("secret"));

    held.borrow().as_ref().unwrap().proceed();
    router.poll(&mut rt);
    assert!(rt.tree().text_content(container).contains("secret"));
}

#[test]
fn test_sync_middleware_proceeds_inline() {
    let mut rt = Runtime::new();
    let route = Route::new("/", page("<p>gated home</p>")).middleware(|gate| gate.proceed());
    let mut router = Router::new(vec![route], RouterConfig::default());

    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));
    assert!(rt.tree().text_content(container).contains("gated home"));
}

#[test]
fn test_new_navigation_supersedes_wedged_middleware() {
    let mut rt = Runtime::new();
    let held: Rc<RefCell<Option<Gate>>> = Rc::default();

    let slot = Rc::clone(&held);
    let mut router = Router::new(
        vec![
            Route::new("/", page("<p>home</p>")),
            Route::new("/stuck", page("<p>never</p>")).middleware(move |gate| {
                *slot.borrow_mut() = Some(gate);
            }),
        ],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));

    router.navigate(&mut rt, "/stuck");
    router.navigate(&mut rt, "/");
    assert!(rt.tree().text_content(container).contains("home"));

    // the stale gate firing must not resurrect the superseded route
    held.borrow().as_ref().unwrap().proceed();
    router.poll(&mut rt);
    assert!(!rt.tree().text_content(container).contains("never"));
}

#[test]
fn test_back_and_forward_render() {
    let mut rt = Runtime::new();
    let mut router = Router::new(
        vec![
            Route::new("/", page("<p>home</p>")),
            Route::new("/about", page("<p>about</p>")),
        ],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));
    router.navigate(&mut rt, "/about");

    router.back(&mut rt);
    assert!(rt.tree().text_content(container).contains("home"));
    assert!(router.can_forward());

    router.forward(&mut rt);
    assert!(rt.tree().text_content(container).contains("about"));
}

#[test]
fn test_anchor_click_routes_through() {
    let mut rt = Runtime::new();
    let mut router = Router::new(
        vec![
            Route::new("/", page("<a href=\"#/about\">go</a>")),
            Route::new("/about", page("<p>about</p>")),
        ],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));

    let anchor = rt.tree().first_by_tag(container, "a").unwrap();
    assert!(rt.dispatch(anchor, "onclick"));
    router.process_requests(&mut rt);

    assert!(rt.tree().text_content(container).contains("about"));
    assert_eq!(router.current_path(), Some("/about"));
}

#[test]
fn test_listeners_receive_params() {
    let mut rt = Runtime::new();
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();

    let mut router = Router::new(
        vec![Route::new("/users/:id", page("<p>user</p>"))],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();

    let sink = Rc::clone(&seen);
    let token = router.listen(move |params| {
        sink.borrow_mut()
            .push(params.get("id").cloned().unwrap_or_default());
    });

    router.render(&mut rt, Some(container));
    router.navigate(&mut rt, "/users/7");
    assert!(seen.borrow().contains(&"7".to_string()));

    let before = seen.borrow().len();
    router.unlisten(&token);
    router.navigate(&mut rt, "/users/8");
    assert_eq!(seen.borrow().len(), before);
}

#[test]
fn test_body_reaches_mounted_component() {
    let mut rt = Runtime::new();
    let receiver = ComponentSpec::new(|state| {
        let note = state
            .get_path("body.note")
            .and_then(|v| v.as_str())
            .unwrap_or("none");
        Some(format!("<p>{note}</p>"))
    })
    .build();

    let mut router = Router::new(
        vec![
            Route::new("/", page("<p>home</p>")),
            Route::new("/inbox", receiver),
        ],
        RouterConfig::default(),
    );
    let container = rt.create_mount_point();
    router.render(&mut rt, Some(container));

    router.navigate_with_body(&mut rt, "/inbox", Some(json!({ "note": "hello" })));
    assert!(rt.tree().text_content(container).contains("hello"));
}
