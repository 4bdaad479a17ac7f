//! Catalog products

use crate::ids::{ProductId, VendorId};
use crate::lenient::null_as_default;
use crate::numeric::Numeric;
use crate::ModelError;
use serde::{Deserialize, Serialize};

/// A catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,
    /// Owning vendor
    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor_id: VendorId,
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Unit price
    #[serde(default)]
    pub price: Numeric,
    /// Menu section
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Long description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Photo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body of `POST /products` and `PUT /products/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Owning vendor
    pub vendor_id: VendorId,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Menu section
    pub category: String,
    /// Long description, sent as an empty string when unset
    #[serde(default)]
    pub description: String,
    /// Photo URL, sent as an empty string when unset
    #[serde(default)]
    pub image_url: String,
}

impl ProductDraft {
    /// Start a draft for `vendor_id`
    #[must_use]
    pub fn new(
        vendor_id: VendorId,
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            vendor_id,
            name: name.into(),
            price,
            category: category.into(),
            description: String::new(),
            image_url: String::new(),
        }
    }

    /// Prefill a draft from an existing product for editing
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            vendor_id: product.vendor_id.clone(),
            name: product.name.clone(),
            price: product.price.or_zero(),
            category: product.category.clone(),
            description: product.description.clone().unwrap_or_default(),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With image URL
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Check the required fields before the draft is sent
    ///
    /// # Errors
    /// - `ModelError::MissingField` for an empty name or category
    /// - `ModelError::InvalidField` for a negative or non-finite price
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::MissingField("name"));
        }
        if self.category.trim().is_empty() {
            return Err(ModelError::MissingField("category"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ModelError::InvalidField {
                field: "price",
                reason: format!("{} is not a valid price", self.price),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft::new(VendorId::new("v-1"), "Paneer Wrap", 149.0, "Wraps")
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut d = draft();
        d.name = "  ".to_string();
        assert_eq!(d.validate(), Err(ModelError::MissingField("name")));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut d = draft();
        d.price = -1.0;
        assert!(matches!(
            d.validate(),
            Err(ModelError::InvalidField { field: "price", .. })
        ));
    }

    #[test]
    fn edit_draft_copies_product_fields() {
        let product: Product = serde_json::from_str(
            r#"{"id":"p-1","vendor_id":"v-1","name":"Lassi","price":"60.5",
                "category":"Drinks","description":null}"#,
        )
        .unwrap();

        let d = ProductDraft::from_product(&product);
        assert_eq!(d.price, 60.5);
        assert_eq!(d.description, "");
        assert_eq!(d.category, "Drinks");
    }

    #[test]
    fn null_fields_read_as_blank() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[{"id":"p-1","vendor_id":"v-1","name":"Naan","price":"40","category":"Breads"},
                {"id":"p-2","vendor_id":null,"name":null,"price":null,"category":null},
                {"id":"p-3"}]"#,
        )
        .unwrap();

        assert_eq!(products.len(), 3);
        assert_eq!(products[0].category, "Breads");
        assert_eq!(products[1].category, "");
        assert_eq!(products[1].name, "");
        assert_eq!(products[1].vendor_id.as_str(), "");
        assert_eq!(products[2].price.or_zero(), 0.0);
    }
}
