//! Polymer distribution chart shared by the results panel and the PDF.

use dioxus::prelude::*;

use crate::tasks::analysis::Distribution;

/// Bar height as a percentage of the chart area. The floor keeps a
/// zero-percent polymer visible as a thin wedge; the ceiling keeps the
/// tallest bar clear of the frame.
pub fn bar_percent(value: u8) -> u8 {
    value.clamp(5, 95)
}

#[component]
pub fn DistributionChart(distribution: Distribution) -> Element {
    rsx! {
        div { class: "chart-container",
            div { class: "chart-bars",
                for (code, value) in distribution.labelled() {
                    div { class: "chart-column",
                        span { class: "chart-value", "{value}%" }
                        div {
                            class: "chart-bar",
                            style: "height: {bar_percent(value)}%;",
                        }
                        span { class: "chart-label", "{code}" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_clamp_into_the_visible_band() {
        assert_eq!(bar_percent(0), 5);
        assert_eq!(bar_percent(5), 5);
        assert_eq!(bar_percent(30), 30);
        assert_eq!(bar_percent(95), 95);
        assert_eq!(bar_percent(100), 95);
    }
}
