use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::misc::error::ApiError;

/// Bearer-authenticated calls to the Microsoft Graph calendar endpoints.
pub struct GraphClient<'a> {
    http: &'a reqwest::Client,
    base_url: &'a str,
    access_token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub schedule: String,
    pub start: String,
    pub end: String,
    pub time_zone: String,
    pub interval: u32,
}

//  Checkout the payload on: https://learn.microsoft.com/en-us/graph/api/calendar-getschedule
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRequest<'a> {
    schedules: [&'a str; 1],
    start_time: DateTimeTimeZone<'a>,
    end_time: DateTimeTimeZone<'a>,
    availability_view_interval: u32,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct DateTimeTimeZone<'a> {
    date_time: &'a str,
    time_zone: &'a str,
}

#[derive(serde::Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleInformation {
    #[serde(default)]
    availability_view: String,
}

impl<'a> GraphClient<'a> {
    pub fn new(http: &'a reqwest::Client, base_url: &'a str, access_token: &'a str) -> Self {
        GraphClient {
            http,
            base_url,
            access_token,
        }
    }

    pub async fn list_events<T: DeserializeOwned>(&self) -> Result<Vec<T>, ApiError> {
        let request = self
            .http
            .get(format!("{}/me/calendar/events", self.base_url))
            .bearer_auth(self.access_token);

        let events: Collection<T> = send(request, "Failed to fetch calendar events").await?;
        Ok(events.value)
    }

    /// Returns the `availabilityView` of the first schedule, or an empty view.
    pub async fn get_schedule(&self, query: &ScheduleQuery) -> Result<String, ApiError> {
        let body = ScheduleRequest {
            schedules: [query.schedule.as_str()],
            start_time: DateTimeTimeZone {
                date_time: &query.start,
                time_zone: &query.time_zone,
            },
            end_time: DateTimeTimeZone {
                date_time: &query.end,
                time_zone: &query.time_zone,
            },
            availability_view_interval: query.interval,
        };

        let request = self
            .http
            .post(format!("{}/me/calendar/getSchedule", self.base_url))
            .bearer_auth(self.access_token)
            .json(&body);

        let schedules: Collection<ScheduleInformation> =
            send(request, "Failed to fetch availability").await?;

        Ok(schedules
            .value
            .into_iter()
            .next()
            .map(|x| x.availability_view)
            .unwrap_or_default())
    }
}

async fn send<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    failure: &str,
) -> Result<T, ApiError> {
    let response = request.send().await.map_err(|err| {
        tracing::error!("{failure}: {err}");
        ApiError::Upstream(failure.to_owned())
    })?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!("Graph API rejected the access token");
        return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("{failure}: Graph API error {status}: {body}");
        return Err(ApiError::Upstream(failure.to_owned()));
    }

    response.json::<T>().await.map_err(|err| {
        tracing::error!("{failure}: invalid Graph API response: {err}");
        ApiError::Upstream(failure.to_owned())
    })
}
