//! Marketing dashboard: hero, live sensor cards, and feature strip.

use dioxus::prelude::*;
use rand::Rng;

use crate::components::app_navbar;
use crate::core::timing;

/// The live counter never drops below this floor, so the demo always shows
/// a plausible reading.
const COUNT_FLOOR: i32 = 300;

#[component]
pub fn Dashboard() -> Element {
    let particle_count = use_signal(|| 328i32);

    // Jitter the headline reading every few seconds like a live sensor.
    use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let mut count = particle_count;
        async move {
            loop {
                timing::sleep_ms(3_000).await;
                count.with_mut(|value| {
                    let jitter = rand::thread_rng().gen_range(-2..3);
                    *value = (*value + jitter).max(COUNT_FLOOR);
                });
            }
        }
    });

    rsx! {
        section { class: "page page-dashboard",
            div { class: "hero",
                h2 { "Advanced Microplastic Detection" }
                p {
                    "Monitor and analyze microplastic particles in real-time with our cutting-edge sensor technology. Get started with your detection journey today."
                }
                {app_navbar::login_link("Get Started")}
            }

            div { class: "dashboard-content",
                div { class: "sensor-data",
                    h3 { "Real-time Sensor Data" }
                    div { class: "data-cards",
                        div { class: "data-card",
                            h4 { "{particle_count()}" }
                            p { "Particles/Liter" }
                        }
                        div { class: "data-card",
                            h4 { "5μm" }
                            p { "Avg. Size" }
                        }
                        div { class: "data-card",
                            h4 { "22°C" }
                            p { "Water Temp" }
                        }
                        div { class: "data-card",
                            h4 { "PP/PE" }
                            p { "Primary Type" }
                        }
                    }
                }

                div { class: "analysis-preview",
                    h3 { "Concentration Analysis" }
                    p { "Microplastic concentration levels across samples" }
                    div { class: "analysis-graph",
                        div { class: "graph-bar", style: "height: 70%;" }
                        div { class: "graph-bar", style: "height: 40%;" }
                        div { class: "graph-bar", style: "height: 85%;" }
                        div { class: "graph-bar", style: "height: 60%;" }
                    }
                }
            }

            div { class: "features",
                div { class: "feature-card",
                    h3 { "High Sensitivity" }
                    p { "Detection of microplastic particles as small as 1μm with 99% accuracy using advanced optical technology." }
                }
                div { class: "feature-card",
                    h3 { "AI-Powered Analysis" }
                    p { "Machine learning algorithms classify plastic types and sizes in real-time with continuous improvement." }
                }
                div { class: "feature-card",
                    h3 { "Remote Monitoring" }
                    p { "Cloud-connected sensors provide continuous monitoring data accessible from anywhere in the world." }
                }
            }

            footer { class: "page-footer",
                p { "© 2026 PlastiScan. All rights reserved. Advancing environmental protection through innovation." }
            }
        }
    }
}
