//! IDE layer tests
//!
//! - Document lifecycle and tree release
//! - AnalysisHost publishing across documents

pub mod tests_documents;
