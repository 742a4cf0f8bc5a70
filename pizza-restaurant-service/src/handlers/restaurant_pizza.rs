use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::Number;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiValidationErrorResponse};
use crate::serializer::{self, RestaurantPizza};
use crate::store::StoreError;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

/// Request body as received; every field may be absent until validated.
///
/// Numbers are kept untyped so that integers wider than the stored columns
/// still reach the reference and price checks.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Price in whole currency units, 1 to 30
    #[schema(value_type = Option<i64>)]
    pub price: Option<Number>,
    #[schema(value_type = Option<i32>)]
    pub pizza_id: Option<Number>,
    #[schema(value_type = Option<i32>)]
    pub restaurant_id: Option<Number>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreateRestaurantPizzaPayload {
    pub price: i64,
    pub pizza_id: i64,
    pub restaurant_id: i64,
}

/// Integral value of `n`, saturated to the `i64` range. `None` for fractions.
fn integer(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

impl CreateRestaurantPizzaRequest {
    pub fn validate(self) -> Result<CreateRestaurantPizzaPayload, Vec<String>> {
        let (Some(price), Some(pizza_id), Some(restaurant_id)) =
            (self.price, self.pizza_id, self.restaurant_id)
        else {
            return Err(vec!["Missing required fields".to_string()]);
        };
        match (integer(&price), integer(&pizza_id), integer(&restaurant_id)) {
            (Some(price), Some(pizza_id), Some(restaurant_id)) => {
                Ok(CreateRestaurantPizzaPayload {
                    price,
                    pizza_id,
                    restaurant_id,
                })
            }
            _ => Err(vec!["Invalid request body".to_string()]),
        }
    }
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Pizza price created", body = RestaurantPizza),
        (status = 400, description = "Invalid request", body = ApiValidationErrorResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RestaurantPizza>), ApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "rejected request body");
        ApiError::Validation(vec!["Invalid request body".to_string()])
    })?;
    let payload = payload.validate().map_err(ApiError::Validation)?;

    // ids outside the column range can never resolve
    let (Ok(pizza_id), Ok(restaurant_id)) = (
        i32::try_from(payload.pizza_id),
        i32::try_from(payload.restaurant_id),
    ) else {
        return Err(StoreError::InvalidReference.into());
    };

    let (restaurant_pizza, pizza, restaurant) =
        state
            .store
            .create_restaurant_pizza(payload.price, pizza_id, restaurant_id)?;
    info!(id = restaurant_pizza.id, "restaurant pizza created");

    Ok((
        StatusCode::CREATED,
        Json(serializer::serialize_restaurant_pizza(
            &restaurant_pizza,
            &pizza,
            &restaurant,
        )),
    ))
}
