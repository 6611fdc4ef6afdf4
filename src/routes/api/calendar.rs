use axum::{
    extract::{rejection::QueryRejection, Query},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDateTime;
use serde_json::{json, Value};

use crate::{
    constants::{DEFAULT_AVAILABILITY_INTERVAL, DEFAULT_TIME_ZONE},
    graph::{GraphClient, ScheduleQuery},
    misc::error::ApiError,
    models::GRAPH_DATE_TIME_FORMAT,
    server::{AccessToken, AppContext},
};

pub fn calendar_router() -> Router {
    Router::new()
        .route("/calendar/events", get(list_events))
        .route("/calendar/availability", get(availability))
}

async fn list_events(
    AccessToken(access_token): AccessToken,
    Extension(ctx): Extension<AppContext>,
) -> Result<Json<Value>, ApiError> {
    let events: Vec<Value> = GraphClient::new(&ctx.http, &ctx.config.graph_api_url, &access_token)
        .list_events()
        .await?;

    Ok(Json(json!({ "events": events })))
}

async fn availability(
    AccessToken(access_token): AccessToken,
    Extension(ctx): Extension<AppContext>,
    params: Result<Query<AvailabilityParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let (query, _) = params.validate()?;
    let view = GraphClient::new(&ctx.http, &ctx.config.graph_api_url, &access_token)
        .get_schedule(&query)
        .await?;

    Ok(Json(json!({
        "availability": view,
        "startTime": query.start,
        "interval": query.interval,
    })))
}

/// Raw availability window as sent by the browser; every field is validated by hand
/// so a malformed value turns into a JSON error instead of a query rejection.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct AvailabilityParams {
    pub schedule: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub time_zone: Option<String>,
    pub interval: Option<String>,
}

impl AvailabilityParams {
    pub fn validate(&self) -> Result<(ScheduleQuery, NaiveDateTime), ApiError> {
        let schedule = required(&self.schedule, "schedule")?;
        let start = parse_date_time(required(&self.start, "start")?, "start")?;
        let end = parse_date_time(required(&self.end, "end")?, "end")?;

        if end <= start {
            return Err(ApiError::BadRequest(
                "'end' must be after 'start'".to_owned(),
            ));
        }

        let time_zone = self
            .time_zone
            .as_deref()
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .unwrap_or(DEFAULT_TIME_ZONE);

        let interval = match self.interval.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_AVAILABILITY_INTERVAL,
            Some(x) => x
                .parse::<u32>()
                .ok()
                .filter(|x| (5..=1440).contains(x))
                .ok_or_else(|| {
                    ApiError::BadRequest(
                        "'interval' must be a number of minutes between 5 and 1440".to_owned(),
                    )
                })?,
        };

        let query = ScheduleQuery {
            schedule: schedule.to_owned(),
            start: start.format(GRAPH_DATE_TIME_FORMAT).to_string(),
            end: end.format(GRAPH_DATE_TIME_FORMAT).to_string(),
            time_zone: time_zone.to_owned(),
            interval,
        };

        Ok((query, start))
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("Missing '{name}' parameter")))
}

// Accepts full timestamps and the minute precision html datetime inputs send
fn parse_date_time(value: &str, name: &str) -> Result<NaiveDateTime, ApiError> {
    NaiveDateTime::parse_from_str(value, GRAPH_DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|_| {
            ApiError::BadRequest(format!(
                "'{name}' must look like 2025-08-02T09:00:00, got '{value}'"
            ))
        })
}
