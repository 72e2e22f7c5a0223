use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::post,
};
use diesel::{insert_into, prelude::*};
use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::serializer::{RestaurantPizzaDetails, serialize_restaurant_pizza};
use crate::validation::Price;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Price in whole units, between 1 and 30
    #[schema(value_type = i64)]
    pub price: Option<Value>,
    /// Pizza being offered
    #[schema(value_type = i32)]
    pub pizza_id: Option<Value>,
    /// Restaurant offering the pizza
    #[schema(value_type = i32)]
    pub restaurant_id: Option<Value>,
}

// Non-numeric fields must still reach the price and lookup rules.
fn as_number(value: Option<&Value>) -> Option<&Number> {
    value.and_then(Value::as_number)
}

fn record_id(value: Option<&Value>) -> Option<i32> {
    as_number(value)
        .and_then(Number::as_i64)
        .and_then(|v| i32::try_from(v).ok())
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Pizza offering created", body = RestaurantPizzaDetails),
        (status = 400, description = "Invalid price or unknown pizza/restaurant", body = crate::error::ApiValidationErrorResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RestaurantPizzaDetails>), ApiError> {
    let Json(payload) =
        payload.map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;

    let price = Price::from_json(as_number(payload.price.as_ref()))?;
    let (Some(pizza_id), Some(restaurant_id)) = (
        record_id(payload.pizza_id.as_ref()),
        record_id(payload.restaurant_id.as_ref()),
    ) else {
        return Err(ApiError::invalid_references());
    };

    let (created, pizza, restaurant) = state
        .db
        .interact(move |conn| {
            conn.transaction::<_, ApiError, _>(|conn| {
                let pizza = pizzas::table
                    .find(pizza_id)
                    .select(Pizza::as_select())
                    .first::<Pizza>(conn)
                    .optional()?;
                let restaurant = restaurants::table
                    .find(restaurant_id)
                    .select(Restaurant::as_select())
                    .first::<Restaurant>(conn)
                    .optional()?;
                let (Some(pizza), Some(restaurant)) = (pizza, restaurant) else {
                    return Err(ApiError::invalid_references());
                };

                let created = insert_into(restaurant_pizzas::table)
                    .values(NewRestaurantPizza::new(price, pizza.id, restaurant.id))
                    .returning(RestaurantPizza::as_returning())
                    .get_result::<RestaurantPizza>(conn)?;
                Ok((created, pizza, restaurant))
            })
        })
        .await?;

    info!(
        restaurant_pizza_id = created.id,
        pizza_id, restaurant_id, "created restaurant pizza"
    );
    Ok((
        StatusCode::CREATED,
        Json(serialize_restaurant_pizza(&created, &pizza, &restaurant)),
    ))
}
