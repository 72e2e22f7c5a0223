use diesel::prelude::*;

use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::validation::Price;

#[derive(Queryable, Selectable, Identifiable, Debug, PartialEq, Clone)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, PartialEq, Clone)]
#[diesel(table_name = pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Pizza {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, PartialEq, Clone)]
#[diesel(belongs_to(Restaurant))]
#[diesel(belongs_to(Pizza))]
#[diesel(table_name = restaurant_pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RestaurantPizza {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant<'a> {
    pub name: &'a str,
    pub address: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = pizzas)]
pub struct NewPizza<'a> {
    pub name: &'a str,
    pub ingredients: &'a str,
}

/// Join record about to be inserted. Only constructible from a validated
/// [`Price`].
#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = restaurant_pizzas)]
pub struct NewRestaurantPizza {
    price: i32,
    pizza_id: i32,
    restaurant_id: i32,
}

impl NewRestaurantPizza {
    pub fn new(price: Price, pizza_id: i32, restaurant_id: i32) -> Self {
        Self {
            price: price.get(),
            pizza_id,
            restaurant_id,
        }
    }
}
