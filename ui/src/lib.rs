//! Shared UI crate for PlastiScan. Cross-platform views and the analysis
//! workflow live here; platform crates only add routing and launch glue.

pub mod core;
pub mod report;
pub mod tasks;
pub mod views;

pub mod components {
    // Platform-agnostic application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
