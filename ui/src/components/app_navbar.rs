use dioxus::prelude::*;
use once_cell::sync::OnceCell;

/// Platforms register a `NavBuilder` whose closures construct fully routed
/// `Link` elements, so this crate never needs to know a platform's `Route`
/// enum. Views reach the same links through the `*_link` helpers; when no
/// builder is registered (unit tests, previews) those fall back to plain
/// anchors.
pub struct NavBuilder {
    pub dashboard: fn(label: &str) -> Element,
    pub analysis: fn(label: &str) -> Element,
    pub login: fn(label: &str) -> Element,
    pub register: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

pub fn dashboard_link(label: &str) -> Element {
    match NAV_BUILDER.get() {
        Some(builder) => (builder.dashboard)(label),
        None => fallback_link("/", label),
    }
}

pub fn analysis_link(label: &str) -> Element {
    match NAV_BUILDER.get() {
        Some(builder) => (builder.analysis)(label),
        None => fallback_link("/home", label),
    }
}

pub fn login_link(label: &str) -> Element {
    match NAV_BUILDER.get() {
        Some(builder) => (builder.login)(label),
        None => fallback_link("/login", label),
    }
}

pub fn register_link(label: &str) -> Element {
    match NAV_BUILDER.get() {
        Some(builder) => (builder.register)(label),
        None => fallback_link("/register", label),
    }
}

fn fallback_link(href: &str, label: &str) -> Element {
    rsx! {
        a { class: "navbar__link", href: "{href}", "{label}" }
    }
}

#[component]
pub fn AppNavbar() -> Element {
    rsx! {
        header { class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-mark", "PlastiScan" }
                    span { class: "navbar__brand-subtitle", "Microplastic detection" }
                }
                nav { class: "navbar__links",
                    {dashboard_link("Dashboard")}
                    {analysis_link("Analysis")}
                    {login_link("Login")}
                    {register_link("Register")}
                }
            }
        }
    }
}
