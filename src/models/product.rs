use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single product tile.
///
/// Only `id`, `name`, `price` and `image` are required. Anything else the data
/// source sends is kept in `extra` so new fields survive a decode/encode pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Price with thousands separators, e.g. `10,000`.
    pub fn formatted_price(&self) -> String {
        let digits = self.price.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: u64) -> Product {
        Product {
            id: "p1".into(),
            name: "Shoe".into(),
            price,
            image: "img.png".into(),
            extra: Map::new(),
        }
    }

    #[test]
    fn formats_price_with_separators() {
        assert_eq!(product(0).formatted_price(), "0");
        assert_eq!(product(999).formatted_price(), "999");
        assert_eq!(product(10000).formatted_price(), "10,000");
        assert_eq!(product(1234567).formatted_price(), "1,234,567");
    }

    #[test]
    fn unknown_fields_land_in_extra() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "p2",
            "name": "Hat",
            "price": 500,
            "image": "hat.png",
            "discount": 10,
        }))
        .unwrap();

        assert_eq!(product.extra.get("discount"), Some(&Value::from(10)));
    }
}
