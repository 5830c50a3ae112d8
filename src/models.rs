//! Data models for the records held by the store

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A store-side value shown as-is: ids and counts may be numbers of any size
/// or strings, depending on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// A registered guest as returned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    #[serde(default)]
    pub id: Option<Scalar>,
    pub first_name: String,
    pub last_name: String,
}

/// Body of a guest create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
}

/// Kind of dish a meal is, stored lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DishType {
    Entree,
    Side,
    Snack,
    Dessert,
    Drink,
}

impl DishType {
    pub const ALL: [DishType; 5] = [
        DishType::Entree,
        DishType::Side,
        DishType::Snack,
        DishType::Dessert,
        DishType::Drink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DishType::Entree => "entree",
            DishType::Side => "side",
            DishType::Snack => "snack",
            DishType::Dessert => "dessert",
            DishType::Drink => "drink",
        }
    }
}

impl fmt::Display for DishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DishType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        DishType::ALL
            .into_iter()
            .find(|d| d.as_str() == lowered)
            .ok_or_else(|| {
                format!(
                    "'{}' is not one of entree, side, snack, dessert, drink",
                    s.trim()
                )
            })
    }
}

/// A meal row. The listing endpoint may return either the plain table columns
/// or one row per guest with the items pre-joined into `meal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default)]
    pub id: Option<Scalar>,
    pub guest_name: String,
    #[serde(default)]
    pub meal: Option<String>,
    #[serde(default)]
    pub meal_name: Option<String>,
    /// Whatever the store holds; only create bodies are restricted to `DishType`
    #[serde(default)]
    pub dish_type: Option<String>,
    #[serde(default)]
    pub serves: Option<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMeal {
    pub guest_name: String,
    pub meal_name: String,
    pub dish_type: DishType,
    pub serves: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beverage {
    #[serde(default)]
    pub id: Option<Scalar>,
    pub guest_name: String,
    #[serde(default)]
    pub beverage: Option<String>,
    #[serde(default)]
    pub beverage_name: Option<String>,
    #[serde(default)]
    pub serves: Option<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBeverage {
    pub guest_name: String,
    pub beverage_name: String,
    pub serves: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utensil {
    #[serde(default)]
    pub id: Option<Scalar>,
    pub guest_name: String,
    #[serde(default)]
    pub utensil: Option<String>,
    #[serde(default)]
    pub utensil_name: Option<String>,
    #[serde(default)]
    pub serves: Option<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUtensil {
    pub guest_name: String,
    pub utensil_name: String,
    pub serves: u32,
}
