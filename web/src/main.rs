use dioxus::prelude::*;

use api::{ApiClient, ApiConfig, Session};
use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::views::{Analysis, Dashboard, Login, Register};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Dashboard {},
    #[route("/home")]
    Analysis {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn nav_dashboard(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Dashboard {}, "{label}" })
}
fn nav_analysis(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Analysis {}, "{label}" })
}
fn nav_login(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Login {}, "{label}" })
}
fn nav_register(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Register {}, "{label}" })
}

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    register_nav(NavBuilder {
        dashboard: nav_dashboard,
        analysis: nav_analysis,
        login: nav_login,
        register: nav_register,
    });

    // One session and client for the whole app, provided via context so no
    // view reaches for ambient token state. A prior sign-in rehydrates
    // from storage.
    let session = use_context_provider(|| {
        let session = Session::new();
        if let Some(tokens) = ui::core::storage::load_tokens() {
            session.set_tokens(tokens);
        }
        session
    });
    use_context_provider(move || ApiClient::new(ApiConfig::from_env(), session.clone()));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        Router::<Route> {}
    }
}

/// A web-specific Router around the shared `AppNavbar` component
/// which allows us to use the web-specific `Route` enum.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar {}
        Outlet::<Route> {}
    }
}
