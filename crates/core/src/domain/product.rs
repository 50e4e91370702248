use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    #[serde(rename = "preco", alias = "price")]
    pub price: Decimal,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self { name: name.into(), price }
    }

    /// Menu line for this product, e.g. `Bolo de Cenoura - R$25.00`.
    pub fn menu_line(&self) -> String {
        format!("{} - R${:.2}", self.name, self.price.round_dp(2))
    }
}
