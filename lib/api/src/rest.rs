use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use faqx_core::Error;
use faqx_similarity::FaqAssistant;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{error, info, warn};

/// Shown to users who submit a blank question
pub const EMPTY_QUERY_WARNING: &str = "Please enter a question.";

#[derive(Serialize)]
struct ProductInfo<'a> {
    product_id: &'a str,
    product_name: &'a str,
}

#[derive(Serialize)]
struct QuestionSpace<'a> {
    product_id: &'a str,
    product_name: &'a str,
    questions: Vec<&'a str>,
}

#[derive(Deserialize)]
struct AskRequest {
    #[serde(default)]
    query: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    matched_question: Option<String>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(assistant: Arc<FaqAssistant>, port: u16) -> std::io::Result<()> {
        info!("Starting REST API on 0.0.0.0:{}", port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(assistant.clone()))
                .configure(routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Run the server on its own actix system thread. The handle yields the
    /// bind or run error, if any.
    pub fn spawn(assistant: Arc<FaqAssistant>, port: u16) -> JoinHandle<std::io::Result<()>> {
        std::thread::spawn(move || {
            actix_web::rt::System::new().block_on(Self::start(assistant, port))
        })
    }
}

/// Register every endpoint. Expects `web::Data<Arc<FaqAssistant>>` in app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/products", web::get().to(list_products))
        .route("/products/{id}/questions", web::get().to(list_questions))
        .route("/products/{id}/ask", web::post().to(ask));
}

async fn health(assistant: web::Data<Arc<FaqAssistant>>) -> ActixResult<HttpResponse> {
    let catalog = assistant.catalog();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "entries": catalog.len(),
        "products": catalog.product_count(),
    })))
}

async fn list_products(assistant: web::Data<Arc<FaqAssistant>>) -> ActixResult<HttpResponse> {
    let products: Vec<ProductInfo> = assistant
        .products()
        .into_iter()
        .map(|(product_id, product_name)| ProductInfo {
            product_id,
            product_name,
        })
        .collect();
    Ok(HttpResponse::Ok().json(products))
}

async fn list_questions(
    assistant: web::Data<Arc<FaqAssistant>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let product_id = path.into_inner();

    match (
        assistant.catalog().display_name(&product_id),
        assistant.questions(&product_id),
    ) {
        (Some(product_name), Some(questions)) => Ok(HttpResponse::Ok().json(QuestionSpace {
            product_id: &product_id,
            product_name,
            questions,
        })),
        _ => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Product not found"
        }))),
    }
}

async fn ask(
    assistant: web::Data<Arc<FaqAssistant>>,
    path: web::Path<String>,
    req: web::Json<AskRequest>,
) -> ActixResult<HttpResponse> {
    let product_id = path.into_inner();

    match assistant.answer(&req.query, &product_id).await {
        Ok(answer) => Ok(HttpResponse::Ok().json(AskResponse {
            answer: answer.text,
            matched_question: answer.matched_question,
        })),
        Err(Error::EmptyQuery) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "warning": EMPTY_QUERY_WARNING
        }))),
        Err(e) if e.is_collaborator() => {
            warn!("Ask for product {:?} failed: {}", product_id, e);
            Ok(HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
        Err(e) => {
            error!("Ask for product {:?} failed: {}", product_id, e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
    }
}
