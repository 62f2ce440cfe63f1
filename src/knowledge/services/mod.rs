//! Application services for knowledge ingestion and retrieval.

mod retrieval;

pub use retrieval::{
    KnowledgeConfig, KnowledgeRetrievalService, KnowledgeServiceError, KnowledgeServiceResult,
    RETRIEVAL_TOP_K,
};
