use serde::{Deserialize, Serialize};

/// One line of a recipe, e.g. two parts of espresso
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

/// Drink entity. Its serialized form is the long (detail) view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Public view: recipe without ingredient names
#[derive(Debug, Serialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| ShortIngredient {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }

    pub fn long(&self) -> &Self {
        self
    }
}

/// Recipe as submitted: a single ingredient or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_ingredients(self) -> Vec<Ingredient> {
        match self {
            Self::Many(ingredients) => ingredients,
            Self::One(ingredient) => vec![ingredient],
        }
    }
}

/// Request DTO for creating a drink
///
/// Both fields are optional at the type level so a missing one is reported
/// as a bad request rather than an unprocessable body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

/// Request DTO for updating a drink
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

#[derive(Debug, Clone)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Longest title the `drinks.title` column holds, in characters.
pub const MAX_TITLE_LEN: usize = 80;

#[derive(Debug, Clone, Default)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl DrinkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

impl From<UpdateDrinkRequest> for DrinkChanges {
    fn from(req: UpdateDrinkRequest) -> Self {
        Self {
            title: req.title,
            recipe: req.recipe.map(RecipeInput::into_ingredients),
        }
    }
}
