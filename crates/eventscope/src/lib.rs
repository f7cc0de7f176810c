// Domain-driven module structure for the eventscope analyzer.

// Core data
pub mod model;
pub mod conf;

// Ingest
pub mod discovery;
pub mod parser;
pub mod pipeline;

// Analysis
pub mod issues;

// Process lifecycle
pub mod runtime;
