use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Json},
    Json as RequestJson,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{ErrorResponse, MessageResponse};
use crate::archmodel::analyzer::{CodeAnalyzer, Component, Relationship};
use crate::archmodel::generators::{AdlGenerator, FourPlusOneGenerator, UmlGenerator};
use crate::archmodel::visualizer::ModelVisualizer;

/// Process-local cache of uploaded code awaiting visualization, keyed by
/// `{hash}_{model_type}`.
#[derive(Clone, Default)]
pub struct ModelState {
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Deserialize)]
pub struct CodeAnalysisRequest {
    pub code: String,
    pub target_architecture: String,
}

#[derive(Debug, Serialize)]
pub struct CodeAnalysisResponse {
    pub model: String,
    pub components: Vec<Component>,
    pub relationships: Vec<Relationship>,
    pub metadata: serde_json::Value,
    pub representation: serde_json::Value,
    pub visualization: Option<String>,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Welcome to the Architectural Model Converter API",
    ))
}

/// Analyze the provided code and convert it to the requested model.
pub async fn analyze_code(
    RequestJson(request): RequestJson<CodeAnalysisRequest>,
) -> Result<Json<CodeAnalysisResponse>, (StatusCode, Json<ErrorResponse>)> {
    let analyzer = match CodeAnalyzer::parse(&request.code) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(&format!("Failed to parse code: {}", e))),
            ))
        }
    };
    let analysis = analyzer.analyze();

    let target = request.target_architecture.to_lowercase();
    let (representation, visualization) = match target.as_str() {
        "uml" => {
            let dot = UmlGenerator::new(&analysis).generate_class_diagram();
            let visualization = ModelVisualizer::visualize_uml(&dot);
            (serde_json::Value::String(dot), visualization)
        }
        "4+1" => {
            let views = FourPlusOneGenerator::new(&analysis).generate_views();
            let visualization = ModelVisualizer::visualize_4plus1(&views);
            (views, visualization)
        }
        "adl" => {
            let adl = AdlGenerator::new(&analysis).generate_adl();
            let visualization = ModelVisualizer::visualize_adl(&adl);
            (serde_json::Value::String(adl), visualization)
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(&format!(
                    "Unsupported architecture type: {}",
                    request.target_architecture
                ))),
            ))
        }
    };

    Ok(Json(CodeAnalysisResponse {
        model: request.target_architecture,
        metadata: serde_json::json!({
            "language": "rust",
            "total_components": analysis.components.len(),
            "total_relationships": analysis.relationships.len(),
        }),
        components: analysis.components,
        relationships: analysis.relationships,
        representation,
        visualization: Some(visualization),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

/// Accept a source file for analysis; answers its name and size.
pub async fn upload_file(
    Query(query): Query<UploadQuery>,
    body: String,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "filename": query.filename.unwrap_or_else(|| "upload.rs".to_string()),
        "size": body.len(),
    }))
}

fn code_hash(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    hex::encode(digest)[..8].to_string()
}

#[derive(Debug, Deserialize)]
pub struct VisualizeUploadQuery {
    pub model_type: Option<String>,
}

/// Cache uploaded code and answer a page linking to its visualization.
pub async fn visualize_uploaded_file(
    State(state): State<ModelState>,
    Query(query): Query<VisualizeUploadQuery>,
    code: String,
) -> Html<String> {
    let model_type = query.model_type.unwrap_or_else(|| "uml".to_string());
    let hash = code_hash(&code);

    state
        .cache
        .write()
        .insert(format!("{}_{}", hash, model_type), code);

    Html(ModelVisualizer::upload_ready_page(&model_type, &hash))
}

#[derive(Debug, Deserialize)]
pub struct VisualizeQuery {
    pub code_hash: Option<String>,
}

/// Direct visualization endpoint for previously uploaded code.
pub async fn visualize_model(
    State(state): State<ModelState>,
    Path(model_type): Path<String>,
    Query(query): Query<VisualizeQuery>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let Some(hash) = query.code_hash else {
        return Err((
            StatusCode::BAD_REQUEST,
            Html("No code hash provided".to_string()),
        ));
    };

    let code = match state.cache.read().get(&format!("{}_{}", hash, model_type)) {
        Some(code) => code.clone(),
        None => {
            return Err((
                StatusCode::NOT_FOUND,
                Html("Visualization not found or expired".to_string()),
            ))
        }
    };

    let analyzer = match CodeAnalyzer::parse(&code) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Html(format!("Failed to parse code: {}", e)),
            ))
        }
    };
    let analysis = analyzer.analyze();

    let fragment = match model_type.to_lowercase().as_str() {
        "uml" => {
            let dot = UmlGenerator::new(&analysis).generate_class_diagram();
            ModelVisualizer::visualize_uml(&dot)
        }
        "4+1" => {
            let views = FourPlusOneGenerator::new(&analysis).generate_views();
            ModelVisualizer::visualize_4plus1(&views)
        }
        "adl" => {
            let adl = AdlGenerator::new(&analysis).generate_adl();
            ModelVisualizer::visualize_adl(&adl)
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Html(format!("Unsupported model type: {}", model_type)),
            ))
        }
    };

    let title = format!("{} Visualization", model_type.to_uppercase());
    Ok(Html(ModelVisualizer::page(&title, &fragment)))
}
