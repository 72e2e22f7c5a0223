use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use diesel::{prelude::*, sqlite::SqliteConnection};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::models::{Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::serializer::{
    RestaurantDetails, RestaurantSummary, serialize_restaurant, serialize_restaurant_details,
};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

// Ids that are not integers can never name a restaurant.
fn parse_restaurant_id(id: &str) -> Result<i32, ApiError> {
    id.parse::<i32>().map_err(|_| ApiError::restaurant_not_found())
}

fn find_restaurant(conn: &mut SqliteConnection, id: i32) -> Result<Restaurant, ApiError> {
    restaurants::table
        .find(id)
        .select(Restaurant::as_select())
        .first::<Restaurant>(conn)
        .optional()?
        .ok_or_else(ApiError::restaurant_not_found)
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = [RestaurantSummary]),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantSummary>>, ApiError> {
    let results = state
        .db
        .interact(|conn| {
            Ok(restaurants::table
                .order(restaurants::id)
                .select(Restaurant::as_select())
                .load::<Restaurant>(conn)?)
        })
        .await?;

    Ok(Json(results.iter().map(serialize_restaurant).collect()))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant with the pizzas it offers", body = RestaurantDetails),
        (status = 404, description = "Restaurant not found", body = crate::error::ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantDetails>, ApiError> {
    let restaurant_id = parse_restaurant_id(&id)?;

    let (restaurant, offerings) = state
        .db
        .interact(move |conn| {
            let restaurant = find_restaurant(conn, restaurant_id)?;
            let offerings = restaurant_pizzas::table
                .inner_join(pizzas::table)
                .filter(restaurant_pizzas::restaurant_id.eq(restaurant.id))
                .order(restaurant_pizzas::id)
                .select((RestaurantPizza::as_select(), Pizza::as_select()))
                .load::<(RestaurantPizza, Pizza)>(conn)?;
            Ok((restaurant, offerings))
        })
        .await?;

    Ok(Json(serialize_restaurant_details(&restaurant, &offerings)))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its pizza offerings deleted"),
        (status = 404, description = "Restaurant not found", body = crate::error::ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let restaurant_id = parse_restaurant_id(&id)?;

    let removed_offerings = state
        .db
        .interact(move |conn| {
            conn.transaction::<_, ApiError, _>(|conn| {
                let restaurant = find_restaurant(conn, restaurant_id)?;
                // Children first, so no join record outlives its restaurant
                // even where the schema-level cascade is not enforced.
                let removed =
                    diesel::delete(RestaurantPizza::belonging_to(&restaurant)).execute(conn)?;
                diesel::delete(&restaurant).execute(conn)?;
                Ok(removed)
            })
        })
        .await?;

    info!(restaurant_id, removed_offerings, "deleted restaurant");
    Ok(StatusCode::NO_CONTENT)
}
