use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tracing::{info, instrument};

use crate::error::{ApiError, ApiErrorResponse};
use crate::serializer::{self, Restaurant, RestaurantDetails};

use super::{parse_id, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = [Restaurant]),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Restaurant>>, ApiError> {
    let restaurants = state.store.list_restaurants()?;
    Ok(Json(
        restaurants
            .iter()
            .map(serializer::serialize_restaurant)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant details", body = RestaurantDetails),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
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
    let id = parse_id(&id).ok_or(ApiError::NotFound("Restaurant"))?;
    let (restaurant, restaurant_pizzas) = state
        .store
        .find_restaurant_details(id)?
        .ok_or(ApiError::NotFound("Restaurant"))?;

    Ok(Json(serializer::serialize_restaurant_details(
        &restaurant,
        &restaurant_pizzas,
    )))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its pizza prices deleted"),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
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
    let id = parse_id(&id).ok_or(ApiError::NotFound("Restaurant"))?;
    state.store.delete_restaurant(id)?;
    info!(id, "restaurant deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };

    use crate::handlers::testing::*;

    #[tokio::test]
    async fn test_list_restaurants() {
        let (app, store) = setup();
        add_restaurant(&store, "Karen's Pizza Shack", "address1");
        add_restaurant(&store, "Sanjay's Pizza", "address2");

        let response = get(&app, "/restaurants").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));

        let stored = store.list_restaurants().unwrap();
        let body = response.json();
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), stored.len());
        for (item, restaurant) in items.iter().zip(&stored) {
            assert_eq!(item["id"], restaurant.id);
            assert_eq!(item["name"], restaurant.name.as_str());
            assert_eq!(item["address"], restaurant.address.as_str());
            assert!(item.get("restaurant_pizzas").is_none());
        }
    }

    #[tokio::test]
    async fn test_get_restaurant() {
        let (app, store) = setup();
        let restaurant = add_restaurant(&store, "Kiki's Pizza", "address3");
        let pizza = add_pizza(&store, "Emma", "Dough, Tomato Sauce, Cheese");
        store
            .create_restaurant_pizza(8, pizza.id, restaurant.id)
            .unwrap();

        let response = get(&app, &format!("/restaurants/{}", restaurant.id)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));

        let body = response.json();
        assert_eq!(body["id"], restaurant.id);
        assert_eq!(body["name"], "Kiki's Pizza");
        assert_eq!(body["address"], "address3");
        let restaurant_pizzas = body["restaurant_pizzas"].as_array().unwrap();
        assert_eq!(restaurant_pizzas.len(), 1);
        assert_eq!(restaurant_pizzas[0]["price"], 8);
        assert_eq!(restaurant_pizzas[0]["pizza"]["name"], "Emma");
        assert_eq!(restaurant_pizzas[0]["restaurant"]["id"], restaurant.id);
    }

    #[tokio::test]
    async fn test_get_restaurant_is_repeatable() {
        let (app, store) = setup();
        let restaurant = add_restaurant(&store, "Kiki's Pizza", "address3");
        let uri = format!("/restaurants/{}", restaurant.id);

        let first = get(&app, &uri).await;
        let second = get(&app, &uri).await;
        assert_eq!(first.body, second.body);
    }

    #[tokio::test]
    async fn test_get_missing_restaurant() {
        let (app, _) = setup();
        for uri in ["/restaurants/0", "/restaurants/not-a-number"] {
            let response = get(&app, uri).await;
            assert_eq!(response.status, StatusCode::NOT_FOUND);
            assert_eq!(response.content_type.as_deref(), Some("application/json"));
            assert_eq!(
                response.json(),
                serde_json::json!({"error": "Restaurant not found"})
            );
        }
    }

    #[tokio::test]
    async fn test_delete_restaurant() {
        let (app, store) = setup();
        let restaurant = add_restaurant(&store, "Karen's Pizza Shack", "address1");
        let pizza = add_pizza(&store, "Geri", "Dough, Tomato Sauce, Cheese, Pepperoni");
        store
            .create_restaurant_pizza(5, pizza.id, restaurant.id)
            .unwrap();

        let request = Request::delete(format!("/restaurants/{}", restaurant.id))
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_empty());
        assert_eq!(store.find_restaurant(restaurant.id).unwrap(), None);
        assert!(store.list_restaurant_pizzas().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_restaurant() {
        let (app, _) = setup();
        let request = Request::delete("/restaurants/0").body(Body::empty()).unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.json()["error"], "Restaurant not found");
    }
}
