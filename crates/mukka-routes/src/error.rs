use thiserror::Error;

/// Errors surfaced by the route-planning pipeline.
///
/// Upstream failures are not caught inside the pipeline; they propagate here
/// so the request boundary can map them to user-facing statuses.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Kakao(#[from] mukka_kakao::KakaoError),

    #[error(transparent)]
    Exdata(#[from] mukka_exdata::ExdataError),
}
