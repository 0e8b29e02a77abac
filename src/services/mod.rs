pub mod metadata_extractor;
pub mod page_layout;
pub mod request_builder;
pub mod stream_accumulator;
pub mod text_chunker;

pub use metadata_extractor::DocumentMetadataExtractor;
pub use page_layout::{PageLayout, PageLayoutEngine};
pub use request_builder::SummaryRequestBuilder;
pub use stream_accumulator::StreamAccumulator;
pub use text_chunker::TextChunker;
