//! HTTP Handlers

use crate::application::config::AttendanceConfig;
use crate::application::export::XLSX_CONTENT_TYPE;
use crate::application::{
    CatalogUseCase, CheckInChannel, CheckInInput, CheckInUseCase, ExportAttendanceUseCase,
    IssueTokenUseCase, ListAttendanceUseCase, ScanQuotaUseCase,
};
use crate::domain::clock::Clock;
use crate::domain::entities::{ClassInfo, TimetableEntry};
use crate::domain::repository::{CatalogRepository, LedgerRepository, TokenRepository};
use crate::error::AttendanceResult;
use crate::presentation::dto::{
    AttendRequest, AttendResponse, ClassRequest, DayQuery, GenerateQrRequest, GenerateQrResponse,
    RecordResponse, ScanStatusResponse, TimetableRequest,
};
use crate::presentation::extract::ApiJson;
use axum::Json;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use kernel::id::{ClassId, TimetableId};
use platform::client::client_identity;
use platform::rate_limit::SlidingWindowLimiter;
use std::net::SocketAddr;
use std::sync::Arc;

const CHECK_IN_MESSAGE: &str = "Attendance recorded successfully!";

/// Token store and ledger behind the handlers
pub trait AttendanceStore:
    TokenRepository + LedgerRepository + Clone + Send + Sync + 'static
{
}

impl<T> AttendanceStore for T where
    T: TokenRepository + LedgerRepository + Clone + Send + Sync + 'static
{
}

/// Class and timetable store behind the handlers
pub trait ReferenceCatalog: CatalogRepository + Clone + Send + Sync + 'static {}

impl<T> ReferenceCatalog for T where T: CatalogRepository + Clone + Send + Sync + 'static {}

/// Shared state for attendance handlers
#[derive(Clone)]
pub struct AttendanceAppState<S, C>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    pub store: Arc<S>,
    pub catalog: Arc<C>,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<AttendanceConfig>,
}

impl<S, C> AttendanceAppState<S, C>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    pub fn new(store: S, catalog: C, clock: Arc<dyn Clock>, config: AttendanceConfig) -> Self {
        Self {
            store: Arc::new(store),
            catalog: Arc::new(catalog),
            limiter: Arc::new(SlidingWindowLimiter::new(config.scan_rate_limit())),
            clock,
            config: Arc::new(config),
        }
    }

    fn check_in_use_case(&self) -> CheckInUseCase<S, S> {
        CheckInUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.limiter.clone(),
            self.clock.clone(),
            self.config.clone(),
        )
    }

    fn list_use_case(&self) -> ListAttendanceUseCase<S> {
        ListAttendanceUseCase::new(self.store.clone(), self.clock.clone(), self.config.clone())
    }
}

/// POST /api/generate_qr
pub async fn generate_qr<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    req: Option<Json<GenerateQrRequest>>,
) -> AttendanceResult<Json<GenerateQrResponse>>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let use_case = IssueTokenUseCase::new(
        state.store.clone(),
        state.catalog.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    let Json(req) = req.unwrap_or_default();
    let output = use_case.execute(req.into()).await?;

    Ok(Json(GenerateQrResponse {
        qr_data: output.token,
        check_in_url: output.check_in_url,
    }))
}

/// POST /api/attend
pub async fn attend<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    ApiJson(req): ApiJson<AttendRequest>,
) -> AttendanceResult<Json<AttendResponse>>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    check_in(&state, req, CheckInChannel::Direct).await
}

/// POST /api/scan
pub async fn scan<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    ApiJson(req): ApiJson<AttendRequest>,
) -> AttendanceResult<Json<AttendResponse>>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let client = client_identity(&headers, Some(addr.ip()));
    check_in(&state, req, CheckInChannel::RateLimited { client }).await
}

async fn check_in<S, C>(
    state: &AttendanceAppState<S, C>,
    req: AttendRequest,
    channel: CheckInChannel,
) -> AttendanceResult<Json<AttendResponse>>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let input = CheckInInput {
        student_id: req.student_id.unwrap_or_default(),
        student_name: req.student_name.unwrap_or_default(),
        method: req.method.unwrap_or_default(),
        token_id: req.qr_id,
        channel,
    };

    let record = state.check_in_use_case().execute(input).await?;

    Ok(Json(AttendResponse {
        message: CHECK_IN_MESSAGE.to_string(),
        record: RecordResponse::from(&record),
    }))
}

/// GET /api/scan_status
pub async fn scan_status<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Json<ScanStatusResponse>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let client = client_identity(&headers, Some(addr.ip()));
    let use_case = ScanQuotaUseCase::new(state.limiter.clone(), state.clock.clone());

    Json(use_case.execute(&client).await.into())
}

/// GET /api/attendance
pub async fn list_attendance<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    Query(query): Query<DayQuery>,
) -> AttendanceResult<Json<Vec<RecordResponse>>>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let listing = state.list_use_case().execute(query.day).await?;
    Ok(Json(listing.records.iter().map(RecordResponse::from).collect()))
}

/// GET /api/export_excel
pub async fn export_excel<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    Query(query): Query<DayQuery>,
) -> AttendanceResult<impl IntoResponse>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let use_case = ExportAttendanceUseCase::new(state.list_use_case());
    let workbook = use_case.execute(query.day).await?;

    let disposition = format!("attachment; filename=\"{}\"", workbook.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        workbook.bytes,
    ))
}

/// GET /api/classes
pub async fn list_classes<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
) -> AttendanceResult<Json<Vec<ClassInfo>>>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let use_case = CatalogUseCase::new(state.catalog.clone());
    Ok(Json(use_case.list_classes().await?))
}

/// POST /api/classes
pub async fn create_class<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    ApiJson(req): ApiJson<ClassRequest>,
) -> AttendanceResult<impl IntoResponse>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let use_case = CatalogUseCase::new(state.catalog.clone());
    let class = use_case.create_class(req.into()).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

/// DELETE /api/classes/{id}
pub async fn delete_class<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    Path(class_id): Path<ClassId>,
) -> AttendanceResult<StatusCode>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let use_case = CatalogUseCase::new(state.catalog.clone());
    use_case.delete_class(class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/timetables
pub async fn list_timetables<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
) -> AttendanceResult<Json<Vec<TimetableEntry>>>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let use_case = CatalogUseCase::new(state.catalog.clone());
    Ok(Json(use_case.list_timetables().await?))
}

/// POST /api/timetables
pub async fn create_timetable<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    ApiJson(req): ApiJson<TimetableRequest>,
) -> AttendanceResult<impl IntoResponse>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let use_case = CatalogUseCase::new(state.catalog.clone());
    let entry = use_case.create_timetable(req.into()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/timetables/{id}
pub async fn delete_timetable<S, C>(
    State(state): State<AttendanceAppState<S, C>>,
    Path(timetable_id): Path<TimetableId>,
) -> AttendanceResult<StatusCode>
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let use_case = CatalogUseCase::new(state.catalog.clone());
    use_case.delete_timetable(timetable_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
