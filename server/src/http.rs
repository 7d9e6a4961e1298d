use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State, rejection::JsonRejection},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use chrono::Utc;
use platform_api::ApiError;
use products_hr::{
    EmployeeOverview, EmployeeProfile, HrError, HrModule, LoginOutcome, LoginSummary,
    PayStubList, RecordStore, SsnFragment,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, instrument, warn};

use crate::{
    config::AppConfig,
    graphql::{self, GraphqlData, SchemaType},
    session::{self, Identity},
    store::Store,
};

const INVALID_CREDENTIALS: &str =
    "Invalid credentials. Please check your employee number and SSN.";
const RETRY_AFTER_SECS: &str = "5";

#[derive(Clone)]
pub struct AppState {
    pub hr: HrModule<Store>,
    pub schema: SchemaType,
    pub config: Arc<AppConfig>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(store: Store, config: Arc<AppConfig>) -> Self {
        let hr = HrModule::new(store);
        let schema = graphql::build_schema(GraphqlData { hr: hr.clone() });
        Self {
            hr,
            schema,
            cookie_key: config.cookie_key.clone(),
            config,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "portal server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    // Credentialed CORS cannot use a wildcard origin.
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::exact(HeaderValue::from_static("http://localhost:3000"))
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_credentials(true)
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::POST, Method::GET])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/employee/{id}", get(employee_handler))
        .route("/api/paystubs/{id}", get(pay_stubs_handler))
        .route("/api/me", get(me_handler))
        .route("/graphql", post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    state.config.request_timeout,
                ))
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    #[serde(default)]
    employee_number: Option<Value>,
    #[serde(default)]
    ssn: Option<Value>,
}

impl LoginRequest {
    /// The portal posts both fields as strings; numbers are accepted too.
    fn credentials(&self) -> HttpResult<(i64, SsnFragment)> {
        let (Some(raw_number), Some(raw_ssn)) = (
            json_text(self.employee_number.as_ref()),
            json_text(self.ssn.as_ref()),
        ) else {
            return Err(HttpError::bad_request(
                "Employee number and SSN are required",
            ));
        };
        let employee_number = parse_number(&raw_number)
            .ok_or_else(|| HttpError::bad_request("Invalid employee number"))?;
        let fragment = SsnFragment::parse(&raw_ssn).map_err(HttpError::from)?;
        Ok((employee_number, fragment))
    }
}

fn json_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_number(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    employee: LoginSummary,
}

#[instrument(name = "http.login", skip_all)]
async fn login_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> HttpResult<(PrivateCookieJar, Json<LoginResponse>)> {
    let Json(body) = payload.map_err(|err| {
        warn!(error = %err, "unreadable login body");
        HttpError::bad_request("Employee number and SSN are required")
    })?;
    let (employee_number, fragment) = body.credentials()?;

    match state.hr.login(employee_number, &fragment).await? {
        LoginOutcome::Rejected => Err(HttpError::unauthorized(INVALID_CREDENTIALS)),
        LoginOutcome::Accepted(summary) => {
            let identity = Identity::from_login(&summary, state.config.session_ttl)
                .ok_or_else(|| HttpError::internal(anyhow::anyhow!("cannot issue session")))?;
            let cookie = session::session_cookie(&identity, &state.config)
                .map_err(|err| HttpError::internal(err.into()))?;
            Ok((
                jar.add(cookie),
                Json(LoginResponse {
                    success: true,
                    employee: summary,
                }),
            ))
        }
    }
}

async fn logout_handler(jar: PrivateCookieJar) -> (PrivateCookieJar, StatusCode) {
    (session::clear_session(jar), StatusCode::NO_CONTENT)
}

#[instrument(name = "http.employee", skip_all)]
async fn employee_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
) -> HttpResult<Json<EmployeeProfile>> {
    let identity = session::load_identity(&jar)?;
    let employee_number =
        parse_number(&id).ok_or_else(|| HttpError::bad_request("Valid employee number required"))?;
    if employee_number != identity.employee_number {
        return Err(ApiError::Forbidden.into());
    }
    let profile = state
        .hr
        .employee_profile(employee_number, Utc::now().date_naive())
        .await
        .map_err(|err| not_found_as(err, "Employee not found"))?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
struct PayStubQuery {
    check: Option<String>,
}

#[instrument(name = "http.pay_stubs", skip_all)]
async fn pay_stubs_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
    Query(query): Query<PayStubQuery>,
) -> HttpResult<Json<PayStubList>> {
    let identity = session::load_identity(&jar)?;
    let internal_id =
        parse_number(&id).ok_or_else(|| HttpError::bad_request("Valid employee ID required"))?;
    if internal_id != identity.internal_id {
        return Err(ApiError::Forbidden.into());
    }
    let list = state
        .hr
        .pay_stubs(internal_id, query.check.as_deref())
        .await?;
    Ok(Json(list))
}

#[instrument(name = "http.me", skip_all)]
async fn me_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> HttpResult<Json<EmployeeOverview>> {
    let identity = session::load_identity(&jar)?;
    let overview = state
        .hr
        .overview(
            identity.employee_number,
            identity.internal_id,
            Utc::now().date_naive(),
        )
        .await
        .map_err(|err| not_found_as(err, "Employee not found"))?;
    Ok(Json(overview))
}

async fn graphql_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    request: GraphQLRequest,
) -> HttpResult<GraphQLResponse> {
    let identity = session::load_identity(&jar)?;
    let req = request.into_inner().data(identity);
    let response = state.schema.execute(req).await;
    Ok(GraphQLResponse::from(response))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = state.hr.store().ping().await.is_ok();
    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthResponse {
            ok: store_ok,
            store: state.hr.store().kind().as_str(),
            store_ok,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    store: &'static str,
    store_ok: bool,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

fn not_found_as(err: HrError, message: &str) -> HttpError {
    match err {
        HrError::NotFound => HttpError::new(StatusCode::NOT_FOUND, message),
        other => other.into(),
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }

    fn internal(err: anyhow::Error) -> Self {
        ApiError::internal(err).into()
    }
}

impl From<ApiError> for HttpError {
    fn from(value: ApiError) -> Self {
        match &value {
            ApiError::Internal(inner) => error!(error = %inner, "request failed"),
            ApiError::Unavailable => warn!("record store unavailable"),
            _ => {}
        }
        let status = StatusCode::from_u16(value.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match value {
            ApiError::Internal(_) => "Server error".to_string(),
            ApiError::Unavailable => {
                "Payroll records are temporarily unavailable. Please try again.".to_string()
            }
            other => other.to_string(),
        };
        Self { status, message }
    }
}

impl From<HrError> for HttpError {
    fn from(value: HrError) -> Self {
        ApiError::from(value).into()
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        if self.status == StatusCode::SERVICE_UNAVAILABLE {
            (
                self.status,
                [(http::header::RETRY_AFTER, RETRY_AFTER_SECS)],
                body,
            )
                .into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}
