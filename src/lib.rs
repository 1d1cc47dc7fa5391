pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod service;
pub mod stages;
pub mod store;

pub use error::{TranscriptError, TranscriptResult};
pub use io::{
    AutoDocumentReader, DocumentLocator, DocumentReader, HumanTranscript, PdfDocumentReader,
    TextDocumentReader, TranscriptMetadata, write_summary_json, write_table_json,
};
pub use llm::{AnthropicClient, AnthropicConfig, TextGenerator};
pub use models::{LayoutConfig, Page, Role, TranscriptSummary, TranscriptTable, Turn, TurnRecord};
pub use service::TranscriptService;
pub use stages::{
    RoleClassifier, Roster, RosterSubstringClassifier, normalize, reconstruct, segment, summarize,
};
pub use store::{JsonStore, MemoryStore, TranscriptStore};
