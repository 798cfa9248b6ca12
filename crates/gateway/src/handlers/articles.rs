//! Article graph query handler

use axum::{
    extract::{Query, State},
    Json,
};
use litgraph_common::{errors::Result, GraphSnapshot};
use litgraph_graph::ArticleQuery;
use tracing::debug;

use crate::AppState;

/// `GET /api/articles?topic=&start_date=&end_date=`
///
/// Returns the stored graph restricted to matching nodes and the links
/// between them.
pub async fn get_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> Result<Json<GraphSnapshot>> {
    let snapshot = state.store.load().await?;
    debug!(nodes = snapshot.nodes.len(), links = snapshot.links.len(), "Loaded snapshot");

    Ok(Json(query.apply(snapshot)))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{body_json, router};
    use axum::{body::Body, http::{Request, StatusCode}};
    use litgraph_common::{ArticleNode, Evidence, GraphSnapshot, Relationship};
    use serde_json::json;
    use tower::ServiceExt;

    fn node(id: &str, title: &str, year: i32) -> ArticleNode {
        serde_json::from_value(json!({
            "id": id,
            "title": title,
            "abstract": "No abstract available",
            "year": year,
            "source": "Wiley",
        }))
        .unwrap()
    }

    fn snapshot() -> GraphSnapshot {
        let link = |s: &str, t: &str| Relationship {
            source: s.into(),
            target: t.into(),
            strength: 1,
            evidence: Evidence::Keywords {
                common_keywords: ["wiley".to_string()].into_iter().collect(),
            },
        };
        GraphSnapshot::new(
            vec![
                node("wiley_1", "Oxygen permeability of films", 2021),
                node("wiley_2", "Neural network property prediction", 2024),
                node("wiley_3", "Gas diffusion simulation", 2024),
            ],
            vec![link("wiley_1", "wiley_2"), link("wiley_2", "wiley_3"), link("wiley_1", "wiley_3")],
        )
    }

    async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
        let (app, _) = router(snapshot());
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn test_unfiltered() {
        let (status, body) = get("/api/articles").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(body["links"].as_array().unwrap().len(), 3);
        assert_eq!(body["links"][0]["type"], "keywords");
    }

    #[tokio::test]
    async fn test_topic_and_year_filter() {
        let (status, body) = get("/api/articles?topic=barrier&start_date=2024-01-01").await;

        assert_eq!(status, StatusCode::OK);
        let nodes = body["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0]["id"], "wiley_3");
        assert!(body["links"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_topic_keeps_internal_links() {
        let (_, body) = get("/api/articles?topic=model&end_date=not-a-date").await;

        let ids: Vec<&str> = body["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["wiley_2", "wiley_3"]);
        assert_eq!(body["links"].as_array().unwrap().len(), 1);
    }
}
