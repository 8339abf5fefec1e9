// Document generation: action dispatch, job analysis, tailoring, HTML
// rendering and the facade that ties them to the browser driver.
// All LLM calls go through llm_client via the ContentWriter seam.

pub mod action;
pub mod document;
pub mod facade;
pub mod generator;
pub mod handlers;
pub mod job_parser;
pub mod prompts;
pub mod tone;
pub mod writer;

pub use action::Action;
pub use document::{
    generate_document, ChromeToolkit, DocumentRequest, DocumentSettings, GeneratedDocument,
    Toolkit,
};
