use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::auth::{DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks, RequirePermission};
use crate::domain::{
    CreateDrinkRequest, Drink, DrinkChanges, NewDrink, ShortDrink, UpdateDrinkRequest,
    MAX_TITLE_LEN,
};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T: Serialize> {
    pub success: bool,
    pub drinks: T,
}

fn success<T: Serialize>(drinks: T) -> Json<DrinksResponse<T>> {
    Json(DrinksResponse {
        success: true,
        drinks,
    })
}

fn no_such_drink() -> ApiError {
    ApiError::NotFound("no drink exists with this id".into())
}

fn check_title(title: &str) -> ApiResult<()> {
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::BadRequest(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// List drinks, short view - public
pub async fn list_drinks(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DrinksResponse<Vec<ShortDrink>>>> {
    let drinks = state.drinks.list().await?;

    Ok(success(drinks.iter().map(Drink::short).collect()))
}

/// List drinks with full recipes
pub async fn list_drinks_detail(
    auth: RequirePermission<GetDrinksDetail>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DrinksResponse<Vec<Drink>>>> {
    tracing::debug!(sub = ?auth.subject(), "Listing drink details");

    Ok(success(state.drinks.list().await?))
}

/// Create a drink
pub async fn create_drink(
    auth: RequirePermission<PostDrinks>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<CreateDrinkRequest>, ApiError>,
) -> ApiResult<Json<DrinksResponse<Vec<Drink>>>> {
    let recipe = req
        .recipe
        .ok_or_else(|| ApiError::BadRequest("request body doesn't have a recipe".into()))?;
    let title = req
        .title
        .ok_or_else(|| ApiError::BadRequest("request body doesn't have a title".into()))?;
    check_title(&title)?;

    if state.drinks.find_by_title(&title).await?.is_some() {
        return Err(ApiError::Forbidden("a drink exists with this title".into()));
    }

    let drink = state
        .drinks
        .insert(NewDrink {
            title,
            recipe: recipe.into_ingredients(),
        })
        .await?;

    tracing::info!(sub = ?auth.subject(), drink_id = drink.id, title = %drink.title, "Created drink");
    Ok(success(vec![drink]))
}

/// Update a drink's title and/or recipe
pub async fn update_drink(
    auth: RequirePermission<PatchDrinks>,
    State(state): State<Arc<AppState>>,
    WithRejection(Path(drink_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateDrinkRequest>, ApiError>,
) -> ApiResult<Json<DrinksResponse<Vec<Drink>>>> {
    if state.drinks.get(drink_id).await?.is_none() {
        return Err(no_such_drink());
    }

    let changes = DrinkChanges::from(req);
    if changes.is_empty() {
        return Err(ApiError::BadRequest(
            "request body has neither a title nor a recipe".into(),
        ));
    }
    if let Some(title) = &changes.title {
        check_title(title)?;
    }

    let drink = state
        .drinks
        .update(drink_id, changes)
        .await?
        .ok_or_else(no_such_drink)?;

    tracing::info!(sub = ?auth.subject(), drink_id, "Updated drink");
    Ok(success(vec![drink]))
}

/// Delete a drink
pub async fn delete_drink(
    auth: RequirePermission<DeleteDrinks>,
    State(state): State<Arc<AppState>>,
    WithRejection(Path(drink_id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<DrinksResponse<i64>>> {
    if !state.drinks.delete(drink_id).await? {
        return Err(no_such_drink());
    }

    tracing::info!(sub = ?auth.subject(), drink_id, "Deleted drink");
    Ok(success(drink_id))
}
