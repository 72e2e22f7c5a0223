//! JSON views of the stored records.
//!
//! Restaurants and pizzas reference each other through join records, so the
//! object graph is cyclic. Instead of walking it generically, every edge has
//! its own view type, and a view reached through an edge has no field for the
//! way back:
//!
//! * restaurant -> restaurant_pizzas: [`RestaurantPizzaEntry`] omits `restaurant`
//! * restaurant_pizza -> pizza: [`PizzaSummary`] omits `restaurant_pizzas`
//! * restaurant_pizza -> restaurant: [`RestaurantSummary`] omits `restaurant_pizzas`

use serde::Serialize;
use utoipa::ToSchema;

use crate::models;

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RestaurantSummary {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct PizzaSummary {
    pub id: i32,
    pub name: String,
    /// Free-text ingredient list
    pub ingredients: String,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RestaurantDetails {
    pub id: i32,
    pub name: String,
    pub address: String,
    /// Pizzas offered by the restaurant, with their price
    pub restaurant_pizzas: Vec<RestaurantPizzaEntry>,
}

/// A join record as listed under its restaurant.
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RestaurantPizzaEntry {
    pub id: i32,
    pub pizza: PizzaSummary,
    pub pizza_id: i32,
    pub price: i32,
    pub restaurant_id: i32,
}

/// A freshly created join record with both of its parents.
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RestaurantPizzaDetails {
    pub id: i32,
    pub pizza: PizzaSummary,
    pub pizza_id: i32,
    pub price: i32,
    pub restaurant: RestaurantSummary,
    pub restaurant_id: i32,
}

pub fn serialize_restaurant(restaurant: &models::Restaurant) -> RestaurantSummary {
    RestaurantSummary {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza(pizza: &models::Pizza) -> PizzaSummary {
    PizzaSummary {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

pub fn serialize_restaurant_details(
    restaurant: &models::Restaurant,
    restaurant_pizzas: &[(models::RestaurantPizza, models::Pizza)],
) -> RestaurantDetails {
    RestaurantDetails {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: restaurant_pizzas
            .iter()
            .map(|(rp, pizza)| RestaurantPizzaEntry {
                id: rp.id,
                pizza: serialize_pizza(pizza),
                pizza_id: rp.pizza_id,
                price: rp.price,
                restaurant_id: rp.restaurant_id,
            })
            .collect(),
    }
}

pub fn serialize_restaurant_pizza(
    restaurant_pizza: &models::RestaurantPizza,
    pizza: &models::Pizza,
    restaurant: &models::Restaurant,
) -> RestaurantPizzaDetails {
    RestaurantPizzaDetails {
        id: restaurant_pizza.id,
        pizza: serialize_pizza(pizza),
        pizza_id: restaurant_pizza.pizza_id,
        price: restaurant_pizza.price,
        restaurant: serialize_restaurant(restaurant),
        restaurant_id: restaurant_pizza.restaurant_id,
    }
}
