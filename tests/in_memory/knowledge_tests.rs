//! Knowledge ingestion and retrieval over in-memory adapters.

use super::helpers::{TestKnowledgeService, knowledge_service};
use conclave::knowledge::services::RETRIEVAL_TOP_K;
use conclave::workspace::domain::AgentId;
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn retrieval_returns_closely_matching_text(knowledge_service: TestKnowledgeService) {
    let agent_id = AgentId::new();
    knowledge_service
        .ingest(
            "Refunds are processed within five business days of approval.",
            agent_id,
        )
        .await
        .expect("ingest should succeed");

    let retrieved = knowledge_service
        .retrieve("how many business days until refunds are processed", agent_id)
        .await
        .expect("retrieve should succeed");

    assert!(retrieved.contains("five business days"));
}

#[rstest]
#[tokio::test]
async fn retrieval_never_crosses_agent_boundaries(knowledge_service: TestKnowledgeService) {
    let sales = AgentId::new();
    let support = AgentId::new();
    knowledge_service
        .ingest("Sales secret: the discount code is SPRING25.", sales)
        .await
        .expect("sales ingest should succeed");
    knowledge_service
        .ingest("Support playbook: reset the router before escalating.", support)
        .await
        .expect("support ingest should succeed");

    let for_support = knowledge_service
        .retrieve("what is the discount code", support)
        .await
        .expect("retrieve should succeed");
    let for_sales = knowledge_service
        .retrieve("reset the router before escalating", sales)
        .await
        .expect("retrieve should succeed");

    assert!(!for_support.contains("SPRING25"));
    assert!(for_support.contains("router"));
    assert!(!for_sales.contains("router"));
    assert!(for_sales.contains("SPRING25"));
}

#[rstest]
#[tokio::test]
async fn never_ingested_agent_gets_empty_string(knowledge_service: TestKnowledgeService) {
    let retrieved = knowledge_service
        .retrieve("anything at all", AgentId::new())
        .await
        .expect("retrieve should succeed");

    assert_eq!(retrieved, "");
}

#[rstest]
#[tokio::test]
async fn retrieval_is_bounded_by_top_k(knowledge_service: TestKnowledgeService) {
    let agent_id = AgentId::new();
    for index in 0..(RETRIEVAL_TOP_K + 3) {
        knowledge_service
            .ingest(&format!("warranty note number {index} covers parts"), agent_id)
            .await
            .expect("ingest should succeed");
    }

    let retrieved = knowledge_service
        .retrieve("warranty covers parts", agent_id)
        .await
        .expect("retrieve should succeed");

    assert_eq!(retrieved.split("\n\n").count(), RETRIEVAL_TOP_K);
}

#[rstest]
#[tokio::test]
async fn deleted_document_is_no_longer_retrieved(knowledge_service: TestKnowledgeService) {
    let agent_id = AgentId::new();
    let document_id = knowledge_service
        .ingest("The loyalty programme ends in March.", agent_id)
        .await
        .expect("ingest should succeed");

    let removed = knowledge_service
        .delete_document(agent_id, document_id)
        .await
        .expect("delete should succeed");
    let retrieved = knowledge_service
        .retrieve("when does the loyalty programme end", agent_id)
        .await
        .expect("retrieve should succeed");

    assert_eq!(removed, 1);
    assert_eq!(retrieved, "");
}
