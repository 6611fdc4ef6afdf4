use askama::Template;
use axum::{extract::Query, routing::get, Extension, Router};

use crate::{
    graph::GraphClient,
    misc::error::ApiError,
    models::{expand_availability, AvailabilityBlock, CalendarEvent, UserInfo},
    routes::api::AvailabilityParams,
    server::{AppContext, CurrentUser},
};

pub fn pages_router() -> Router {
    Router::new().route("/", get(home))
}

#[derive(Debug, Default, serde::Deserialize)]
struct HomeQuery {
    error: Option<String>,
    #[serde(flatten)]
    availability: AvailabilityParams,
}

#[derive(Template, Default)]
#[template(path = "index.html")]
struct HomeTemplate {
    user: Option<UserInfo>,
    error: Option<String>,
    events: Vec<CalendarEvent>,
    blocks: Vec<AvailabilityBlock>,
    form: AvailabilityParams,
}

async fn home(
    user: Option<CurrentUser>,
    Extension(ctx): Extension<AppContext>,
    query: Option<Query<HomeQuery>>,
) -> HomeTemplate {
    let query = query.map(|Query(x)| x).unwrap_or_default();
    let mut page = HomeTemplate {
        error: query.error.map(describe_login_error),
        ..Default::default()
    };

    let Some(CurrentUser { user, access_token }) = user else {
        return page;
    };

    let graph = GraphClient::new(&ctx.http, &ctx.config.graph_api_url, &access_token);

    match graph.list_events::<CalendarEvent>().await {
        Ok(events) => page.events = events,
        // Expired token, show the sign in button again
        Err(ApiError::Unauthorized) => return page,
        Err(err) => page.error = Some(err.to_string()),
    }

    if query.availability.schedule.is_some() {
        let result = match query.availability.validate() {
            Ok((schedule, start)) => graph
                .get_schedule(&schedule)
                .await
                .map(|view| expand_availability(&view, start, schedule.interval)),
            Err(err) => Err(err),
        };

        match result {
            Ok(blocks) => page.blocks = blocks,
            Err(err) => page.error = Some(err.to_string()),
        }
    }

    page.user = Some(user);
    page.form = query.availability;
    page
}

fn describe_login_error(indicator: String) -> String {
    match indicator.as_str() {
        "auth_failed" => "Failed to authenticate with Microsoft".to_owned(),
        "missing_verifier" => "The sign in attempt expired, please try again".to_owned(),
        "invalid_state" => "The sign in response did not match this browser, please try again"
            .to_owned(),
        "access_denied" => "Sign in was cancelled".to_owned(),
        _ => format!("Sign in failed: {indicator}"),
    }
}
