use dioxus::prelude::*;

use crate::tasks::analysis::AnalysisView;

#[component]
pub fn Analysis() -> Element {
    rsx! {
        section { class: "page page-analysis",
            div { class: "page-title",
                h2 { "Microplastic Analysis Report" }
                p { "Start the research process to generate detailed analysis reports with contamination levels." }
            }
            AnalysisView {}
        }
    }
}
