pub mod fix_pipeline;

pub use fix_pipeline::FixPipeline;
