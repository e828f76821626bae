// Built-in insight engines, registered by CompositeInsightsEngine::with_default_engines

pub mod reference_range;

pub use reference_range::ReferenceRangeEngine;
