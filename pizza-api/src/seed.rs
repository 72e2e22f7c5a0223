use diesel::{insert_into, prelude::*, sqlite::SqliteConnection};
use tracing::info;

use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::validation::Price;

const RESTAURANTS: [(&str, &str); 3] = [
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: [(&str, &str); 3] = [
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

// One offering per restaurant, as (restaurant index, pizza index, price).
const OFFERINGS: [(usize, usize, i64); 3] = [(0, 0, 1), (1, 1, 4), (2, 2, 5)];

#[derive(Debug, PartialEq, Eq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub pizzas: usize,
    pub restaurant_pizzas: usize,
}

/// Replaces every record with the sample data set.
pub fn seed(conn: &mut SqliteConnection) -> QueryResult<SeedSummary> {
    conn.transaction(|conn| {
        diesel::delete(restaurant_pizzas::table).execute(conn)?;
        diesel::delete(restaurants::table).execute(conn)?;
        diesel::delete(pizzas::table).execute(conn)?;

        let mut restaurant_ids = Vec::with_capacity(RESTAURANTS.len());
        for (name, address) in RESTAURANTS {
            let id = insert_into(restaurants::table)
                .values(NewRestaurant { name, address })
                .returning(restaurants::id)
                .get_result::<i32>(conn)?;
            restaurant_ids.push(id);
        }

        let mut pizza_ids = Vec::with_capacity(PIZZAS.len());
        for (name, ingredients) in PIZZAS {
            let id = insert_into(pizzas::table)
                .values(NewPizza { name, ingredients })
                .returning(pizzas::id)
                .get_result::<i32>(conn)?;
            pizza_ids.push(id);
        }

        for (restaurant, pizza, price) in OFFERINGS {
            let price = Price::try_from(price)
                .map_err(|e| diesel::result::Error::QueryBuilderError(Box::new(e)))?;
            insert_into(restaurant_pizzas::table)
                .values(NewRestaurantPizza::new(
                    price,
                    pizza_ids[pizza],
                    restaurant_ids[restaurant],
                ))
                .execute(conn)?;
        }

        let summary = SeedSummary {
            restaurants: restaurant_ids.len(),
            pizzas: pizza_ids.len(),
            restaurant_pizzas: OFFERINGS.len(),
        };
        info!(?summary, "seeded sample data");
        Ok(summary)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn seed_replaces_existing_rows() {
        let db = Database::open(":memory:").unwrap();
        let (first, second, count) = db
            .run(|conn| {
                let first = seed(conn)?;
                let second = seed(conn)?;
                let count = restaurant_pizzas::table.count().get_result::<i64>(conn)?;
                Ok((first, second, count))
            })
            .unwrap();

        assert_eq!(
            first,
            SeedSummary {
                restaurants: 3,
                pizzas: 3,
                restaurant_pizzas: 3,
            }
        );
        assert_eq!(first, second);
        assert_eq!(count, 3);
    }
}
