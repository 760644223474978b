use serde::{Deserialize, Serialize};

/// Body of the session endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub session_token: String,
}

/// Body of the product lookup endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Products,
}

impl ProductsResponse {
    /// The first product record, if the store returned any
    pub fn first(&self) -> Option<&Product> {
        self.products.product.first()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Products {
    #[serde(default)]
    pub product: Vec<Product>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub inventory_status: InventoryStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub product_is_in_stock: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddToCartRequest {
    pub products: Vec<CartLine>,
}

impl AddToCartRequest {
    /// One unit of a single SKU
    pub fn single(sku: u64) -> Self {
        Self {
            products: vec![CartLine {
                product_id: sku,
                quantity: 1,
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddToCartResponse {
    #[serde(default)]
    pub location: Option<String>,
}
