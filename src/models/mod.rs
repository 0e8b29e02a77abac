pub mod chunk;
pub mod document;
pub mod output;
pub mod page;
pub mod preset;
pub mod prompt;
pub mod stream;

pub use chunk::TextChunk;
pub use document::{DocumentMetadata, RawMetadata, SourceDocument};
pub use output::{PipelineOutput, SummaryResponse};
pub use page::{FontStyle, Page, PaginatedDocument, PlacedLine};
pub use preset::SummaryLengthPreset;
pub use prompt::SummaryPrompt;
pub use stream::{FragmentStream, StreamEvent};
