use diesel::prelude::*;
use tracing::info;

use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::store::{Store, StoreError};

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

const SEED_PRICE: i64 = 1;

/// Replaces all stored data with the demo restaurants and pizzas.
/// Restaurant `n` is given pizza `n` at [`SEED_PRICE`].
pub fn seed(store: &Store) -> Result<(), StoreError> {
    store.transaction(|conn| {
        diesel::delete(restaurant_pizzas::table).execute(conn)?;
        diesel::delete(pizzas::table).execute(conn)?;
        diesel::delete(restaurants::table).execute(conn)?;

        let new_restaurants = RESTAURANTS
            .iter()
            .map(|(name, address)| NewRestaurant::new(*name, *address))
            .collect::<Result<Vec<_>, _>>()?;
        let new_pizzas = PIZZAS
            .iter()
            .map(|(name, ingredients)| NewPizza::new(*name, *ingredients))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seeded_restaurants: Vec<Restaurant> = Vec::with_capacity(new_restaurants.len());
        for new_restaurant in &new_restaurants {
            seeded_restaurants.push(
                diesel::insert_into(restaurants::table)
                    .values(new_restaurant)
                    .returning(Restaurant::as_returning())
                    .get_result(conn)?,
            );
        }
        let mut seeded_pizzas: Vec<Pizza> = Vec::with_capacity(new_pizzas.len());
        for new_pizza in &new_pizzas {
            seeded_pizzas.push(
                diesel::insert_into(pizzas::table)
                    .values(new_pizza)
                    .returning(Pizza::as_returning())
                    .get_result(conn)?,
            );
        }

        let menu = seeded_restaurants
            .iter()
            .zip(&seeded_pizzas)
            .map(|(r, p)| NewRestaurantPizza::new(SEED_PRICE, p.id, r.id))
            .collect::<Result<Vec<_>, _>>()?;
        for item in &menu {
            diesel::insert_into(restaurant_pizzas::table)
                .values(item)
                .execute(conn)?;
        }

        info!(
            restaurants = seeded_restaurants.len(),
            pizzas = seeded_pizzas.len(),
            restaurant_pizzas = menu.len(),
            "seeded store"
        );
        Ok(())
    })
}
