use actix_web::{
    HttpRequest, HttpResponse, ResponseError, body::BoxBody, cookie::Cookie,
    delete, dev::HttpServiceFactory, get, http::StatusCode, post, web,
};
use payloads::{
    CategoryId, ClientId, ProductDraft, ProductId, PurchaseDraft, PurchaseId,
};
use serde_json::json;

use crate::backend::MockBackend;
use crate::store::StoreError;

pub const API_PREFIX: &str = "/api";
pub const SESSION_COOKIE: &str = "market_session";

pub fn api_services() -> impl HttpServiceFactory {
    // literal routes before their `{id}` siblings
    web::scope(API_PREFIX)
        .service(health_check)
        .service(open_session)
        .service(list_clients)
        .service(list_products)
        .service(save_product)
        .service(products_by_category)
        .service(delete_product)
        .service(get_product)
        .service(list_purchases)
        .service(create_purchase)
        .service(purchases_by_client)
        .service(delete_purchase)
        .service(get_purchase)
}

#[get("/health_check")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("healthy")
}

/// Hands out a session cookie, like a login would.
#[post("/session")]
pub async fn open_session() -> HttpResponse {
    let cookie = Cookie::build(SESSION_COOKIE, "mock-session")
        .path("/")
        .finish();
    HttpResponse::Ok().cookie(cookie).json(json!({ "message": "ok" }))
}

#[get("/customers/all")]
pub async fn list_clients(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    Ok(HttpResponse::Ok().json(backend.store().list_clients()))
}

#[get("/products/all")]
pub async fn list_products(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    Ok(HttpResponse::Ok().json(backend.store().list_products()))
}

#[post("/products/save")]
pub async fn save_product(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
    draft: web::Json<ProductDraft>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    let product = backend.store().save_product(draft.into_inner())?;
    Ok(HttpResponse::Ok().json(product))
}

#[get("/products/category/{category_id}")]
pub async fn products_by_category(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
    category_id: web::Path<i64>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    let products = backend
        .store()
        .products_by_category(CategoryId(category_id.into_inner()))?;
    Ok(HttpResponse::Ok().json(products))
}

/// Answers with an empty body, like the real backend.
#[delete("/products/delete/{product_id}")]
pub async fn delete_product(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
    product_id: web::Path<i64>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    backend
        .store()
        .delete_product(ProductId(product_id.into_inner()))?;
    Ok(HttpResponse::Ok().finish())
}

#[get("/products/{product_id}")]
pub async fn get_product(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
    product_id: web::Path<i64>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    let product = backend
        .store()
        .get_product(ProductId(product_id.into_inner()))?;
    Ok(HttpResponse::Ok().json(product))
}

#[get("/purchases/all")]
pub async fn list_purchases(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    Ok(HttpResponse::Ok().json(backend.store().list_purchases()))
}

#[post("/purchases/create")]
pub async fn create_purchase(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
    draft: web::Json<PurchaseDraft>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    let purchase = backend.store().create_purchase(draft.into_inner())?;
    Ok(HttpResponse::Created().json(purchase))
}

#[get("/purchases/client/{client_id}")]
pub async fn purchases_by_client(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
    client_id: web::Path<String>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    let purchases = backend
        .store()
        .purchases_by_client(&ClientId(client_id.into_inner()));
    Ok(HttpResponse::Ok().json(purchases))
}

#[delete("/purchases/delete/{purchase_id}")]
pub async fn delete_purchase(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
    purchase_id: web::Path<i64>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    backend
        .store()
        .delete_purchase(PurchaseId(purchase_id.into_inner()))?;
    Ok(HttpResponse::Ok().finish())
}

#[get("/purchases/{purchase_id}")]
pub async fn get_purchase(
    req: HttpRequest,
    backend: web::Data<MockBackend>,
    purchase_id: web::Path<i64>,
) -> Result<HttpResponse, MockError> {
    if let Some(stub) = stubbed(&req, &backend) {
        return Ok(stub);
    }
    let purchase = backend
        .store()
        .get_purchase(PurchaseId(purchase_id.into_inner()))?;
    Ok(HttpResponse::Ok().json(purchase))
}

fn stubbed(req: &HttpRequest, backend: &MockBackend) -> Option<HttpResponse> {
    let stub = backend.stub_for(req.path())?;
    let status = StatusCode::from_u16(stub.status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Some(
        HttpResponse::build(status)
            .content_type("application/json")
            .body(stub.body),
    )
}

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("{0}")]
    NotFound(#[source] StoreError),
    #[error("{0}")]
    BadRequest(#[source] StoreError),
}

impl ResponseError for MockError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Errors carry a JSON `message`, as the real backend does.
    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code())
            .json(json!({ "message": self.to_string() }))
    }
}

impl From<StoreError> for MockError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ProductNotFound(_) => MockError::NotFound(e),
            StoreError::PurchaseNotFound(_) => MockError::NotFound(e),
            StoreError::CategoryNotFound(_) => MockError::NotFound(e),
            StoreError::Invalid(_) => MockError::BadRequest(e),
        }
    }
}
