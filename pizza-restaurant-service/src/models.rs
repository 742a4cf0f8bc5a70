use diesel::prelude::*;

use crate::schema::{pizzas, restaurant_pizzas, restaurants};

pub const MIN_PRICE: i64 = 1;
pub const MAX_PRICE: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Price must be between 1 and 30")]
    PriceOutOfRange,
    #[error("Name must not be empty")]
    EmptyName,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Pizza {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Restaurant))]
#[diesel(belongs_to(Pizza))]
#[diesel(table_name = restaurant_pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RestaurantPizza {
    pub id: i32,
    pub price: i32,
    pub restaurant_id: i32,
    pub pizza_id: i32,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant {
    name: String,
    address: String,
}

impl NewRestaurant {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            name,
            address: address.into(),
        })
    }
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = pizzas)]
pub struct NewPizza {
    name: String,
    ingredients: String,
}

impl NewPizza {
    pub fn new(
        name: impl Into<String>,
        ingredients: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            name,
            ingredients: ingredients.into(),
        })
    }
}

/// A price record that has passed validation and may be written to the store.
///
/// Fields are private so the only way to obtain one is through [`NewRestaurantPizza::new`].
#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = restaurant_pizzas)]
pub struct NewRestaurantPizza {
    price: i32,
    restaurant_id: i32,
    pizza_id: i32,
}

impl NewRestaurantPizza {
    pub fn new(price: i64, pizza_id: i32, restaurant_id: i32) -> Result<Self, ValidationError> {
        if !(MIN_PRICE..=MAX_PRICE).contains(&price) {
            return Err(ValidationError::PriceOutOfRange);
        }
        Ok(Self {
            price: i32::try_from(price).map_err(|_| ValidationError::PriceOutOfRange)?,
            restaurant_id,
            pizza_id,
        })
    }

    #[cfg(test)]
    pub fn price(&self) -> i32 {
        self.price
    }
}
