use std::sync::{Arc, Mutex, MutexGuard};

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;
use tracing::{debug, info};

use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
    ValidationError,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::{establish_connection, MIGRATIONS};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid pizza or restaurant")]
    InvalidReference,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection error: {0}")]
    Connection(#[from] diesel::result::ConnectionError),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("store connection is poisoned")]
    Poisoned,
}

/// Handle to the relational store shared by every request handler.
///
/// All access goes through a single connection, so each operation below is
/// serialized and runs inside its own transaction where it writes.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl Store {
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        let conn = establish_connection(database_url)?;
        info!(database_url, "opened store");
        Ok(Self::from_connection(conn))
    }

    /// Private in-memory database, already migrated.
    pub fn in_memory() -> Result<Self, StoreError> {
        let store = Self::open(":memory:")?;
        store.run_migrations()?;
        Ok(store)
    }

    pub fn from_connection(conn: SqliteConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        for version in applied {
            info!(%version, "applied migration");
        }
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, SqliteConnection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Runs `f` in a transaction; any error rolls back everything `f` wrote.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError>,
    {
        let mut conn = self.conn()?;
        conn.transaction(f)
    }

    pub fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        let mut conn = self.conn()?;
        let results = restaurants::table
            .order(restaurants::id.asc())
            .select(Restaurant::as_select())
            .load(&mut *conn)?;
        Ok(results)
    }

    #[cfg(test)]
    pub(crate) fn find_restaurant(&self, id: i32) -> Result<Option<Restaurant>, StoreError> {
        let mut conn = self.conn()?;
        let result = restaurants::table
            .find(id)
            .select(Restaurant::as_select())
            .first(&mut *conn)
            .optional()?;
        Ok(result)
    }

    /// Restaurant together with each of its price records and the pizza it prices.
    pub fn find_restaurant_details(
        &self,
        id: i32,
    ) -> Result<Option<(Restaurant, Vec<(RestaurantPizza, Pizza)>)>, StoreError> {
        let mut conn = self.conn()?;
        let Some(restaurant) = restaurants::table
            .find(id)
            .select(Restaurant::as_select())
            .first(&mut *conn)
            .optional()?
        else {
            return Ok(None);
        };

        let menu = RestaurantPizza::belonging_to(&restaurant)
            .inner_join(pizzas::table)
            .order(restaurant_pizzas::id.asc())
            .select((RestaurantPizza::as_select(), Pizza::as_select()))
            .load::<(RestaurantPizza, Pizza)>(&mut *conn)?;

        Ok(Some((restaurant, menu)))
    }

    /// Deletes the restaurant's price records and then the restaurant itself,
    /// as one unit.
    pub fn delete_restaurant(&self, id: i32) -> Result<(), StoreError> {
        self.transaction(|conn| {
            let dependents = diesel::delete(
                restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(id)),
            )
            .execute(conn)?;
            let deleted = diesel::delete(restaurants::table.find(id)).execute(conn)?;
            if deleted == 0 {
                return Err(StoreError::NotFound("Restaurant"));
            }
            debug!(id, dependents, "deleted restaurant");
            Ok(())
        })
    }

    pub fn list_pizzas(&self) -> Result<Vec<Pizza>, StoreError> {
        let mut conn = self.conn()?;
        let results = pizzas::table
            .order(pizzas::id.asc())
            .select(Pizza::as_select())
            .load(&mut *conn)?;
        Ok(results)
    }

    #[cfg(test)]
    pub(crate) fn find_pizza(&self, id: i32) -> Result<Option<Pizza>, StoreError> {
        let mut conn = self.conn()?;
        let result = pizzas::table
            .find(id)
            .select(Pizza::as_select())
            .first(&mut *conn)
            .optional()?;
        Ok(result)
    }

    /// Resolves both references, validates the price and inserts the record.
    /// Nothing is written unless every step succeeds.
    pub fn create_restaurant_pizza(
        &self,
        price: i64,
        pizza_id: i32,
        restaurant_id: i32,
    ) -> Result<(RestaurantPizza, Pizza, Restaurant), StoreError> {
        self.transaction(|conn| {
            let pizza = pizzas::table
                .find(pizza_id)
                .select(Pizza::as_select())
                .first(conn)
                .optional()?;
            let restaurant = restaurants::table
                .find(restaurant_id)
                .select(Restaurant::as_select())
                .first(conn)
                .optional()?;
            let (Some(pizza), Some(restaurant)) = (pizza, restaurant) else {
                return Err(StoreError::InvalidReference);
            };

            let new_restaurant_pizza = NewRestaurantPizza::new(price, pizza.id, restaurant.id)?;
            let restaurant_pizza = diesel::insert_into(restaurant_pizzas::table)
                .values(&new_restaurant_pizza)
                .returning(RestaurantPizza::as_returning())
                .get_result(conn)?;

            Ok((restaurant_pizza, pizza, restaurant))
        })
    }

    pub fn list_restaurant_pizzas(&self) -> Result<Vec<RestaurantPizza>, StoreError> {
        let mut conn = self.conn()?;
        let results = restaurant_pizzas::table
            .order(restaurant_pizzas::id.asc())
            .select(RestaurantPizza::as_select())
            .load(&mut *conn)?;
        Ok(results)
    }

    pub fn create_restaurant(&self, restaurant: &NewRestaurant) -> Result<Restaurant, StoreError> {
        let mut conn = self.conn()?;
        let result = diesel::insert_into(restaurants::table)
            .values(restaurant)
            .returning(Restaurant::as_returning())
            .get_result(&mut *conn)?;
        Ok(result)
    }

    pub fn create_pizza(&self, pizza: &NewPizza) -> Result<Pizza, StoreError> {
        let mut conn = self.conn()?;
        let result = diesel::insert_into(pizzas::table)
            .values(pizza)
            .returning(Pizza::as_returning())
            .get_result(&mut *conn)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_store() -> (Store, Restaurant, Pizza) {
        let store = Store::in_memory().unwrap();
        let restaurant = store
            .create_restaurant(&NewRestaurant::new("Sanjay's Pizza", "address2").unwrap())
            .unwrap();
        let pizza = store
            .create_pizza(&NewPizza::new("Melanie", "Dough, Sauce, Ricotta").unwrap())
            .unwrap();
        (store, restaurant, pizza)
    }

    #[test]
    fn test_list_in_insertion_order() {
        let store = Store::in_memory().unwrap();
        for name in ["B", "A", "C"] {
            store
                .create_restaurant(&NewRestaurant::new(name, "addr").unwrap())
                .unwrap();
        }
        let names = store
            .list_restaurants()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_create_restaurant_pizza() {
        let (store, restaurant, pizza) = setup_store();

        let (rp, rp_pizza, rp_restaurant) = store
            .create_restaurant_pizza(3, pizza.id, restaurant.id)
            .unwrap();

        assert_eq!(rp.price, 3);
        assert_eq!(rp_pizza, pizza);
        assert_eq!(rp_restaurant, restaurant);
        assert_eq!(store.list_restaurant_pizzas().unwrap(), vec![rp]);
    }

    #[test]
    fn test_create_restaurant_pizza_rejects_bad_input() {
        let (store, restaurant, pizza) = setup_store();

        let err = store
            .create_restaurant_pizza(31, pizza.id, restaurant.id)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::PriceOutOfRange)
        ));

        let err = store
            .create_restaurant_pizza(3, pizza.id + 100, restaurant.id)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference));

        assert!(store.list_restaurant_pizzas().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_pairs_are_allowed() {
        let (store, restaurant, pizza) = setup_store();
        store
            .create_restaurant_pizza(3, pizza.id, restaurant.id)
            .unwrap();
        store
            .create_restaurant_pizza(4, pizza.id, restaurant.id)
            .unwrap();
        assert_eq!(store.list_restaurant_pizzas().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_restaurant_removes_dependents() {
        let (store, restaurant, pizza) = setup_store();
        let other = store
            .create_restaurant(&NewRestaurant::new("Kiki's Pizza", "address3").unwrap())
            .unwrap();
        store
            .create_restaurant_pizza(3, pizza.id, restaurant.id)
            .unwrap();
        let kept = store
            .create_restaurant_pizza(9, pizza.id, other.id)
            .unwrap()
            .0;

        store.delete_restaurant(restaurant.id).unwrap();

        assert_eq!(store.find_restaurant(restaurant.id).unwrap(), None);
        assert_eq!(store.list_restaurant_pizzas().unwrap(), vec![kept]);
        assert!(store.find_pizza(pizza.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_missing_restaurant() {
        let store = Store::in_memory().unwrap();
        let err = store.delete_restaurant(0).unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Restaurant")));
    }

    #[test]
    fn test_find_restaurant_details() {
        let (store, restaurant, pizza) = setup_store();
        store
            .create_restaurant_pizza(12, pizza.id, restaurant.id)
            .unwrap();

        let (found, menu) = store.find_restaurant_details(restaurant.id).unwrap().unwrap();
        assert_eq!(found, restaurant);
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].0.price, 12);
        assert_eq!(menu[0].1, pizza);

        assert!(store.find_restaurant_details(0).unwrap().is_none());
    }
}
