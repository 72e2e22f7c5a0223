use axum::{Router, extract::State, response::Json, routing::get};
use diesel::prelude::*;
use tracing::instrument;

use crate::error::ApiError;
use crate::models::Pizza;
use crate::schema::pizzas;
use crate::serializer::{PizzaSummary, serialize_pizza};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/pizzas", get(list_pizzas))
}

#[utoipa::path(
    get,
    path = "/pizzas",
    responses(
        (status = 200, description = "List of pizzas", body = [PizzaSummary]),
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn list_pizzas(
    State(state): State<AppState>,
) -> Result<Json<Vec<PizzaSummary>>, ApiError> {
    let results = state
        .db
        .interact(|conn| {
            Ok(pizzas::table
                .order(pizzas::id)
                .select(Pizza::as_select())
                .load::<Pizza>(conn)?)
        })
        .await?;

    Ok(Json(results.iter().map(serialize_pizza).collect()))
}
