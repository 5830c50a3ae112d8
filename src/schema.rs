//! Entity schema descriptors
//!
//! Each entity kind on the board is described once: where it lives in the
//! store, which form fields create it, how a row is displayed and how the
//! collection is ordered. The list-sync controller is generic over these.

use std::collections::BTreeMap;
use std::cmp::Ordering;
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::models::{
    Beverage, DishType, Guest, Meal, NewBeverage, NewGuest, NewMeal, NewUtensil, Scalar, Utensil,
};

/// Raw form input, field name to the string the user typed
pub type FormValues = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Number,
    Select { options: &'static [&'static str] },
}

/// One input of an entity's create form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    /// Prefilled value when the board runs in seed mode
    pub seed: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Guests,
    Meals,
    Beverages,
    Utensils,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Guests,
        EntityKind::Meals,
        EntityKind::Beverages,
        EntityKind::Utensils,
    ];

    /// Path segment under the store's base URL
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::Guests => "guests",
            EntityKind::Meals => "meals",
            EntityKind::Beverages => "beverages",
            EntityKind::Utensils => "utensils",
        }
    }

    /// Plural noun used in user-facing messages
    pub fn label(&self) -> &'static str {
        self.path()
    }

    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::Guests => "Who's Coming",
            EntityKind::Meals => "Meals",
            EntityKind::Beverages => "Beverages",
            EntityKind::Utensils => "Utensils",
        }
    }

    pub fn add_label(&self) -> &'static str {
        match self {
            EntityKind::Guests => "Add Guest",
            EntityKind::Meals => "Add Meal",
            EntityKind::Beverages => "Add Beverage",
            EntityKind::Utensils => "Add Utensil",
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            EntityKind::Guests => Guests::FIELDS,
            EntityKind::Meals => Meals::FIELDS,
            EntityKind::Beverages => Beverages::FIELDS,
            EntityKind::Utensils => Utensils::FIELDS,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_matches('/').to_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|k| k.path() == wanted)
            .ok_or_else(|| format!("Unknown entity kind: {}", s))
    }
}

/// Describes one entity kind to the generic list-sync controller
pub trait Entity: Send + Sync + 'static {
    /// A row as returned by the listing endpoint
    type Row: DeserializeOwned + Serialize + Clone + fmt::Debug + Send + Sync + 'static;
    /// The body sent to the create endpoint
    type Draft: Serialize + fmt::Debug + Send;

    const KIND: EntityKind;
    const FIELDS: &'static [FieldSpec];

    /// Builds a create body from raw form input, trimming every value
    fn parse_form(form: &FormValues) -> Result<Self::Draft, SyncError>;

    fn display(row: &Self::Row) -> String;

    /// Orders a freshly fetched collection; store order is kept by default
    fn sort(_rows: &mut [Self::Row]) {}
}

pub struct Guests;
pub struct Meals;
pub struct Beverages;
pub struct Utensils;

const GUEST_NAME: FieldSpec = FieldSpec {
    name: "guestName",
    label: "What is your name?",
    input: InputKind::Text,
    seed: "Bob",
};

const SERVES: FieldSpec = FieldSpec {
    name: "serves",
    label: "How many people will it feed?",
    input: InputKind::Number,
    seed: "6",
};

impl Entity for Guests {
    type Row = Guest;
    type Draft = NewGuest;

    const KIND: EntityKind = EntityKind::Guests;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec {
            name: "firstName",
            label: "What is your first name?",
            input: InputKind::Text,
            seed: "Bob",
        },
        FieldSpec {
            name: "lastName",
            label: "What is your last name?",
            input: InputKind::Text,
            seed: "Newman",
        },
    ];

    fn parse_form(form: &FormValues) -> Result<NewGuest, SyncError> {
        Ok(NewGuest {
            first_name: text(form, "firstName")?,
            last_name: text(form, "lastName")?,
        })
    }

    fn display(row: &Guest) -> String {
        format!("{} {}", row.first_name, row.last_name)
    }

    // Case-insensitive so a store collating "ada" before "Bob" keeps that order
    fn sort(rows: &mut [Guest]) {
        rows.sort_by(|a, b| {
            caseless(&a.first_name, &b.first_name)
                .then_with(|| caseless(&a.last_name, &b.last_name))
        });
    }
}

impl Entity for Meals {
    type Row = Meal;
    type Draft = NewMeal;

    const KIND: EntityKind = EntityKind::Meals;
    const FIELDS: &'static [FieldSpec] = &[
        GUEST_NAME,
        FieldSpec {
            name: "mealName",
            label: "What are you bringing?",
            input: InputKind::Text,
            seed: "dirt",
        },
        FieldSpec {
            name: "dishType",
            label: "What type of dish is this?",
            input: InputKind::Select {
                options: &["entree", "side", "snack", "dessert", "drink"],
            },
            seed: "entree",
        },
        SERVES,
    ];

    fn parse_form(form: &FormValues) -> Result<NewMeal, SyncError> {
        let dish_type = text(form, "dishType")?
            .parse::<DishType>()
            .map_err(|e| SyncError::validation("dishType", e))?;
        Ok(NewMeal {
            guest_name: text(form, "guestName")?,
            meal_name: text(form, "mealName")?,
            dish_type,
            serves: serves(form)?,
        })
    }

    fn display(row: &Meal) -> String {
        let detail = match (row.dish_type.as_deref(), row.serves.as_ref()) {
            (Some(dish), Some(n)) => Some(format!("{}, serves {}", dish, n)),
            (Some(dish), None) => Some(dish.to_string()),
            (None, Some(n)) => Some(format!("serves {}", n)),
            (None, None) => None,
        };
        item_line(
            &row.guest_name,
            row.meal.as_deref(),
            row.meal_name.as_deref(),
            detail,
        )
    }
}

impl Entity for Beverages {
    type Row = Beverage;
    type Draft = NewBeverage;

    const KIND: EntityKind = EntityKind::Beverages;
    const FIELDS: &'static [FieldSpec] = &[
        GUEST_NAME,
        FieldSpec {
            name: "beverageName",
            label: "What are you bringing?",
            input: InputKind::Text,
            seed: "some liquid",
        },
        SERVES,
    ];

    fn parse_form(form: &FormValues) -> Result<NewBeverage, SyncError> {
        Ok(NewBeverage {
            guest_name: text(form, "guestName")?,
            beverage_name: text(form, "beverageName")?,
            serves: serves(form)?,
        })
    }

    fn display(row: &Beverage) -> String {
        item_line(
            &row.guest_name,
            row.beverage.as_deref(),
            row.beverage_name.as_deref(),
            serves_detail(row.serves.as_ref()),
        )
    }
}

impl Entity for Utensils {
    type Row = Utensil;
    type Draft = NewUtensil;

    const KIND: EntityKind = EntityKind::Utensils;
    const FIELDS: &'static [FieldSpec] = &[
        GUEST_NAME,
        FieldSpec {
            name: "utensilName",
            label: "What are you bringing?",
            input: InputKind::Text,
            seed: "pitch fork",
        },
        SERVES,
    ];

    fn parse_form(form: &FormValues) -> Result<NewUtensil, SyncError> {
        Ok(NewUtensil {
            guest_name: text(form, "guestName")?,
            utensil_name: text(form, "utensilName")?,
            serves: serves(form)?,
        })
    }

    fn display(row: &Utensil) -> String {
        item_line(
            &row.guest_name,
            row.utensil.as_deref(),
            row.utensil_name.as_deref(),
            serves_detail(row.serves.as_ref()),
        )
    }
}

/// Seed-mode prefill for a form
pub fn seed_values(fields: &[FieldSpec]) -> FormValues {
    fields
        .iter()
        .map(|f| (f.name.to_string(), f.seed.to_string()))
        .collect()
}

fn text(form: &FormValues, field: &str) -> Result<String, SyncError> {
    form.get(field)
        .map(|v| v.trim().to_string())
        .ok_or_else(|| SyncError::validation(field, "missing from the form"))
}

fn serves(form: &FormValues) -> Result<u32, SyncError> {
    let raw = text(form, "serves")?;
    raw.parse::<u32>().map_err(|e| {
        let message = match e.kind() {
            IntErrorKind::PosOverflow => format!("'{}' is too large", raw),
            _ => format!("'{}' is not a whole number", raw),
        };
        SyncError::validation("serves", message)
    })
}

fn serves_detail(serves: Option<&Scalar>) -> Option<String> {
    serves.map(|n| format!("serves {}", n))
}

fn caseless(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// Aggregated text from the store wins over the per-item columns
fn item_line(
    guest_name: &str,
    aggregated: Option<&str>,
    name: Option<&str>,
    detail: Option<String>,
) -> String {
    let item = match (aggregated, name) {
        (Some(text), _) => text.to_string(),
        (None, Some(name)) => match detail {
            Some(detail) => format!("{} ({})", name, detail),
            None => name.to_string(),
        },
        (None, None) => String::new(),
    };
    if item.is_empty() {
        guest_name.to_string()
    } else {
        format!("{}: {}", guest_name, item)
    }
}
