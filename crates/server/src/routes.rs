use {
    crate::{ApiError, AppState},
    algorithm::Value,
    axum::{
        Json, Router,
        body::{Body, Bytes},
        extract::{Path, State},
        http::{StatusCode, header},
        middleware,
        response::{IntoResponse, Response},
        routing::get,
    },
    com::MultipartEncoder,
    serde::Deserialize,
    serde_json::json,
    std::convert::Infallible,
    store::{Camera, Employee},
    stream::{StreamRequest, StreamSession},
    tokio_stream::{StreamExt, wrappers::ReceiverStream},
    tower_http::cors::CorsLayer,
};

/// Optional JSON body accepted by the camera routes.
#[derive(Debug, Default, Deserialize)]
struct RequestBody {
    company_id: Option<String>,
    algorithm_id: Option<String>,
    action: Option<String>,
}

fn is_blank(body: &Bytes) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn request_body(body: &Bytes) -> Result<RequestBody, ApiError> {
    if is_blank(body) {
        return Ok(RequestBody::default());
    }
    serde_json::from_slice::<Option<RequestBody>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

fn payload(body: &Bytes) -> Result<Value, ApiError> {
    if is_blank(body) {
        return Ok(Value::map());
    }
    serde_json::from_slice::<serde_json::Value>(body)
        .map(Value::from)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

async fn liveness(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "time": format!("{}Z", base::format_timestamp()),
        "app": &*state.app_name,
    }))
}

async fn model_info(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .registry()
        .model_info(&model_name)
        .map(|info| Json(info.to_json()))
        .ok_or_else(|| ApiError::NotFound(format!("model {model_name}")))
}

async fn trigger(
    State(state): State<AppState>,
    Path((algorithm_id, action)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let payload = payload(&body)?;
    let invocable = state
        .registry()
        .resolve(state.repository(), &algorithm_id, &action)?;
    log::info!("api: triggering {:?} of algorithm {}", invocable, algorithm_id);
    let result = tokio::task::spawn_blocking(move || invocable.call(payload))
        .await
        .map_err(|e| ApiError::Internal(format!("action {action} aborted: {e}")))??;
    Ok(Json(result.to_json()))
}

async fn cameras(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<Camera>>, ApiError> {
    let body = request_body(&body)?;
    let scope = state.tenants.scope(body.company_id.as_deref());
    Ok(Json(state.repository().cameras(&scope)?))
}

async fn employees(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let body = request_body(&body)?;
    let scope = state.tenants.scope(body.company_id.as_deref());
    Ok(Json(state.repository().employees(&scope)?))
}

// the session runs on its own task; the body ends when it does
fn multipart_response(session: StreamSession) -> Response {
    let (_, receiver) = session.spawn();
    let body = Body::from_stream(ReceiverStream::new(receiver).map(Ok::<_, Infallible>));
    (
        [
            (header::CONTENT_TYPE, MultipartEncoder::default().content_type()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        body,
    )
        .into_response()
}

async fn live_raw(
    State(state): State<AppState>,
    Path((company_id, camera_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let scope = state.tenants.scope(Some(company_id.as_str()));
    let session = state
        .pipeline
        .start(&scope, &StreamRequest::raw(camera_id))
        .await?;
    Ok(multipart_response(session))
}

async fn live_inference(
    State(state): State<AppState>,
    Path(camera_id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body = request_body(&body)?;
    let scope = state.tenants.scope(body.company_id.as_deref());
    let mut request = StreamRequest::inference(camera_id);
    if let Some(algorithm_id) = body.algorithm_id {
        request = request.with_algorithm(algorithm_id);
    }
    if let Some(action) = body.action {
        request = request.with_action(action);
    }
    let session = state.pipeline.start(&scope, &request).await?;
    Ok(multipart_response(session))
}

fn docker_reply(message: &str, key: &str, id: String) -> Json<serde_json::Value> {
    let mut reply = json!({
        "time": format!("{}Z", base::format_timestamp()),
        "message": message,
    });
    reply[key] = json!(id);
    Json(reply)
}

async fn docker_start(
    State(state): State<AppState>,
    Path(image): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let container_id = state.runtime.run(&image).await?;
    log::info!("api: started container {} from {}", container_id, image);
    Ok(docker_reply(
        "Docker starting, please wait at least 5 minutes before further requests.",
        "container_id",
        container_id,
    ))
}

async fn docker_kill(
    State(state): State<AppState>,
    Path(container): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let container_id = state.runtime.stop(&container).await?;
    log::info!("api: stopped container {}", container_id);
    Ok(docker_reply("Docker killed", "container_id", container_id))
}

async fn docker_restart(
    State(state): State<AppState>,
    Path(container): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let container_id = state.runtime.restart(&container).await?;
    log::info!("api: restarted container {}", container_id);
    Ok(docker_reply(
        "Docker restarting, please wait at least 5 minutes before further requests.",
        "container_id",
        container_id,
    ))
}

async fn docker_get(
    State(state): State<AppState>,
    Path(image): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let image_id = state.runtime.image(&image).await?;
    Ok(docker_reply("Docker image found", "image_id", image_id))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("resource".to_string())
}

async fn method_not_allowed(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        ApiError::MethodNotAllowed.into_response()
    } else {
        response
    }
}

/// The service's routes over `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/cameras", get(cameras).post(cameras))
        .route("/employees", get(employees).post(employees))
        .route("/:model_name", get(model_info))
        .route(
            "/algorithm/:algorithm_id/trigger/:action",
            get(trigger).post(trigger),
        )
        .route(
            "/company/:company_id/camera/:camera_id/live/raw",
            get(live_raw).post(live_raw),
        )
        .route(
            "/camera/:camera_id/live/inference",
            get(live_inference).post(live_inference),
        )
        .route("/docker/:id/start", get(docker_start).post(docker_start))
        .route("/docker/:id/kill", get(docker_kill).post(docker_kill))
        .route("/docker/:id/restart", get(docker_restart).post(docker_restart))
        .route("/docker/:id/get", get(docker_get).post(docker_get))
        .fallback(not_found)
        .layer(middleware::map_response(method_not_allowed))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
