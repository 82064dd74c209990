use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::FieldErrors;
use crate::entities::ProductModel;

fn validate_price(price: i64) -> Result<(), ValidationError> {
    if price <= 0 {
        let mut err = ValidationError::new("price");
        err.message = Some("price must not be less than 0.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<(), ValidationError> {
    if stock < 0 {
        let mut err = ValidationError::new("stock");
        err.message = Some("stock must not be negative.".into());
        return Err(err);
    }
    Ok(())
}

/// Payload accepted by create and update.
///
/// Missing fields decode to zero values and are then rejected by validation.
/// Keys match case-insensitively, see [`ProductRequest::from_json_slice`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
#[schema(example = json!({ "name": "Pen", "price": 100, "stock": 10 }))]
pub struct ProductRequest {
    /// Product display name
    #[validate(length(min = 1, message = "name must not be empty."))]
    pub name: String,
    /// Price in the smallest currency unit, strictly positive
    #[validate(custom = "validate_price")]
    pub price: i64,
    /// Units on hand, never negative
    #[validate(custom = "validate_stock")]
    pub stock: i32,
}

impl ProductRequest {
    /// Decodes a request body regardless of how its keys are cased.
    ///
    /// `{"NAME": "Pen"}` and `{"Name": "Pen"}` both fill `name`. When a key
    /// appears more than once the last occurrence wins, and `null` leaves
    /// the field at its zero value.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value = match serde_json::from_slice::<Value>(body)? {
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k.to_lowercase(), v))
                    .collect::<Map<String, Value>>(),
            ),
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        serde_json::from_value(value)
    }

    /// Runs every rule and reports all violations at once.
    pub fn validate_fields(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }

    /// Builds an unsaved product; id and timestamps are assigned on insert.
    pub fn into_model(self) -> ProductModel {
        let now = Utc::now();
        ProductModel {
            id: String::new(),
            name: self.name,
            price: self.price,
            stock: self.stock,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Overwrites the business fields of an existing product.
    pub fn apply_to(self, product: &mut ProductModel) {
        product.name = self.name;
        product.price = self.price;
        product.stock = self.stock;
    }
}

/// Product as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "0b7d3c8e-5f4e-4b43-9a55-2f4cf3a1d2b1",
    "name": "Pen",
    "price": 100,
    "stock": 10,
    "createdAt": "2024-01-01T00:00:00Z",
    "updatedAt": "2024-01-01T00:00:00Z"
}))]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductModel> for ProductResponse {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            stock: model.stock,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl ProductResponse {
    pub fn from_list(products: Vec<ProductModel>) -> Vec<Self> {
        products.into_iter().map(Self::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn request(name: &str, price: i64, stock: i32) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            price,
            stock,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request("Pen", 100, 10).validate_fields().is_ok());
        assert!(request("Pen", 1, 0).validate_fields().is_ok());
    }

    #[rstest]
    #[case::empty_name(request("", 100, 10), &["name"])]
    #[case::zero_price(request("Pen", 0, 10), &["price"])]
    #[case::negative_price(request("Pen", -5, 10), &["price"])]
    #[case::negative_stock(request("Pen", 100, -1), &["stock"])]
    #[case::name_and_stock(request("", 100, -1), &["name", "stock"])]
    #[case::everything(request("", 0, -3), &["name", "price", "stock"])]
    fn reports_every_violated_field(#[case] req: ProductRequest, #[case] expected: &[&str]) {
        let errors = req.validate_fields().unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, expected);
    }

    #[test]
    fn messages_match_rules() {
        let errors = request("", 0, -1).validate_fields().unwrap_err();
        assert_eq!(errors.get("name"), Some("name must not be empty."));
        assert_eq!(errors.get("price"), Some("price must not be less than 0."));
        assert_eq!(errors.get("stock"), Some("stock must not be negative."));
    }

    #[rstest]
    #[case::lowercase(r#"{"name":"Pen","price":100,"stock":10}"#)]
    #[case::capitalised(r#"{"Name":"Pen","Price":100,"Stock":10}"#)]
    #[case::upper(r#"{"NAME":"Pen","PRICE":100,"STOCK":10}"#)]
    #[case::mixed(r#"{"nAmE":"Pen","pRiCe":100,"Stock":10}"#)]
    fn decodes_keys_in_any_case(#[case] body: &str) {
        let req = ProductRequest::from_json_slice(body.as_bytes()).unwrap();
        assert_eq!(req, request("Pen", 100, 10));
    }

    #[test]
    fn last_duplicate_key_wins() {
        let req =
            ProductRequest::from_json_slice(br#"{"name":"Pen","NAME":"Ink","price":1}"#).unwrap();
        assert_eq!(req.name, "Ink");
    }

    #[test]
    fn null_values_and_null_body_decode_as_zero_values() {
        let req =
            ProductRequest::from_json_slice(br#"{"name":null,"price":5,"stock":null}"#).unwrap();
        assert_eq!(req, request("", 5, 0));

        let req = ProductRequest::from_json_slice(b"null").unwrap();
        assert_eq!(req, ProductRequest::default());
    }

    #[rstest]
    #[case::syntax("{not json")]
    #[case::empty("")]
    #[case::wrong_type(r#"{"name":"Pen","price":"cheap","stock":1}"#)]
    #[case::not_an_object("[1,2,3]")]
    fn undecodable_bodies_are_errors(#[case] body: &str) {
        assert!(ProductRequest::from_json_slice(body.as_bytes()).is_err());
    }

    #[test]
    fn missing_fields_decode_as_zero_values() {
        let req = ProductRequest::from_json_slice(b"{}").unwrap();
        assert_eq!(req, ProductRequest::default());

        let errors = req.validate_fields().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.get("stock").is_none());
    }

    #[test]
    fn into_model_leaves_id_unassigned() {
        let model = request("Pen", 100, 10).into_model();
        assert!(model.id.is_empty());
        assert_eq!(model.name, "Pen");
        assert_eq!(model.price, 100);
        assert_eq!(model.stock, 10);
        assert!(model.deleted_at.is_none());
    }

    #[test]
    fn apply_to_keeps_identity_and_timestamps() {
        let mut model = request("Pen", 100, 10).into_model();
        model.id = "abc".into();
        let created_at = model.created_at;

        request("Pencil", 150, 5).apply_to(&mut model);

        assert_eq!(model.id, "abc");
        assert_eq!(model.created_at, created_at);
        assert_eq!(model.name, "Pencil");
        assert_eq!(model.price, 150);
        assert_eq!(model.stock, 5);
    }

    #[test]
    fn response_serializes_camel_case() {
        let mut model = request("Pen", 100, 10).into_model();
        model.id = "abc".into();

        let json = serde_json::to_value(ProductResponse::from(model)).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["price"], 100);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("deletedAt").is_none());
    }

    #[test]
    fn from_list_preserves_order() {
        let models: Vec<ProductModel> = ["a", "b", "c"]
            .into_iter()
            .map(|id| {
                let mut m = request("Pen", 1, 1).into_model();
                m.id = id.into();
                m
            })
            .collect();

        let ids: Vec<String> = ProductResponse::from_list(models)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn violated_fields_are_exactly_reported(
            name in prop_oneof![Just(String::new()), "[a-zA-Z ]{1,20}"],
            price in -1_000i64..1_000,
            stock in -1_000i32..1_000,
        ) {
            let req = ProductRequest { name: name.clone(), price, stock };
            let mut expected = Vec::new();
            if name.is_empty() { expected.push("name"); }
            if price <= 0 { expected.push("price"); }
            if stock < 0 { expected.push("stock"); }

            match req.validate_fields() {
                Ok(()) => prop_assert!(expected.is_empty()),
                Err(errors) => {
                    let fields: Vec<&str> = errors.fields().collect();
                    prop_assert_eq!(fields, expected);
                }
            }
        }
    }
}
