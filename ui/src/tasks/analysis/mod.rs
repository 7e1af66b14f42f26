mod engine;
pub use engine::{AnalysisEngine, EngineConfig, Phase, TickOutcome};

mod simulate;
pub use simulate::{simulate, AnalysisResult, ContaminationLevel, Distribution, RiskLevel};

mod view;
pub use view::AnalysisView;
