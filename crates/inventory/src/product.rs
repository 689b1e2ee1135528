use serde::{Deserialize, Deserializer, Serialize, Serializer};

use stockbook_core::{Entity, InventoryError, ProductId};

/// Reorder level a fresh product form starts with.
pub const DEFAULT_REORDER_LEVEL: i64 = 5;

/// Catalog record: one stock-keeping unit and its running balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    sku: String,
    /// Absent categories are written as `""`; `null` and `""` both load as none.
    #[serde(
        default,
        serialize_with = "serialize_category",
        deserialize_with = "deserialize_category"
    )]
    category: Option<String>,
    quantity: i64,
    reorder_level: i64,
    price: f64,
}

impl Product {
    /// Build a record from an already validated input.
    pub(crate) fn from_input(id: ProductId, input: &ProductInput) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            sku: input.sku.trim().to_string(),
            category: normalize_optional(input.category.as_deref()),
            quantity: input.quantity,
            reorder_level: input.reorder_level,
            price: input.price,
        }
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn reorder_level(&self) -> i64 {
        self.reorder_level
    }

    /// Unit cost.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// `quantity × price` for this product.
    pub fn stock_value(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    /// `"name (sku)"`, the label used wherever a product is referenced.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.sku)
    }

    pub(crate) fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Typed input for a catalog upsert.
///
/// `id: None` (or an id no product carries) creates a new product; a matching id
/// replaces that record wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub id: Option<ProductId>,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub reorder_level: i64,
    pub price: f64,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            sku: sku.into(),
            category: None,
            quantity: 0,
            reorder_level: DEFAULT_REORDER_LEVEL,
            price: 0.0,
        }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_reorder_level(mut self, reorder_level: i64) -> Self {
        self.reorder_level = reorder_level;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Edit input pre-filled from an existing record.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            name: product.name.clone(),
            sku: product.sku.clone(),
            category: product.category.clone(),
            quantity: product.quantity,
            reorder_level: product.reorder_level,
            price: product.price,
        }
    }

    /// Convert raw form values, coercing numbers that fail to parse to 0.
    pub fn from_form(form: &ProductForm) -> Self {
        Self {
            id: normalize_optional(Some(&form.id)).map(ProductId::from),
            name: form.name.trim().to_string(),
            sku: form.sku.trim().to_string(),
            category: normalize_optional(Some(&form.category)),
            quantity: coerce_integer(&form.quantity),
            reorder_level: coerce_integer(&form.reorder_level),
            price: coerce_price(&form.price),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), InventoryError> {
        if self.name.trim().is_empty() {
            return Err(InventoryError::validation("name cannot be empty"));
        }
        if self.sku.trim().is_empty() {
            return Err(InventoryError::validation("SKU cannot be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(InventoryError::validation("price must be a non-negative number"));
        }
        Ok(())
    }
}

/// Raw product form values, exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductForm {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub quantity: String,
    pub reorder_level: String,
    pub price: String,
}

/// Integer coercion: decimals truncate toward zero, anything unparsable is 0.
pub fn coerce_integer(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return value;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() < i64::MAX as f64 => value.trunc() as i64,
        _ => 0,
    }
}

/// Price coercion: unparsable, non-finite or negative values become 0.
pub fn coerce_price(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

fn serialize_category<S>(category: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(category.as_deref().unwrap_or(""))
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_optional(raw.as_deref()))
}

fn normalize_optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
