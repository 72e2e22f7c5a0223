pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;

pub use pizza::router as pizza_router;
pub use restaurant::router as restaurant_router;
pub use restaurant_pizza::router as restaurant_pizza_router;

use axum::{Router, response::Html, response::Json, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Builds the full HTTP surface over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api-docs/openapi.json", get(openapi))
        .merge(restaurant_router())
        .merge(pizza_router())
        .merge(restaurant_pizza_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn index() -> Html<&'static str> {
    Html("<h1>Pizza Restaurants API</h1>")
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        restaurant::list_restaurants,
        restaurant::get_restaurant,
        restaurant::delete_restaurant,
        pizza::list_pizzas,
        restaurant_pizza::create_restaurant_pizza,
    ),
    components(
        schemas(
            crate::serializer::RestaurantSummary,
            crate::serializer::RestaurantDetails,
            crate::serializer::RestaurantPizzaEntry,
            crate::serializer::PizzaSummary,
            crate::serializer::RestaurantPizzaDetails,
            crate::handlers::restaurant_pizza::CreateRestaurantPizzaRequest,
            crate::error::ApiErrorResponse,
            crate::error::ApiValidationErrorResponse
        )
    ),
    tags(
        (name = "restaurants", description = "Restaurant endpoints"),
        (name = "pizzas", description = "Pizza endpoints"),
        (name = "restaurant_pizzas", description = "Pizzas offered by restaurants, with prices")
    ),
    info(
        title = "Pizza Restaurants API",
        description = "Restaurants, pizzas and the prices restaurants charge for them",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
