//! Request, response, and stored-document models.
//!
//! Stored documents use `_id` for their identifier so the JSON matches what
//! the web client already consumes.

use crate::auth::ownership::Owned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Auth Models
// ============================================================================

/// Login body. Only `email` is read; anything else the client sends is ignored.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Generic success marker returned by login and logout.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

// ============================================================================
// Query Models
// ============================================================================

/// `?email=` query parameter.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// `?id=` query parameter.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Count response. The count is a string, as the web client expects.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: String,
}

impl From<usize> for CountResponse {
    fn from(count: usize) -> Self {
        Self {
            count: count.to_string(),
        }
    }
}

// ============================================================================
// Book Models
// ============================================================================

/// Keys the server sets on every stored document.
const RESERVED_KEYS: &[&str] = &["_id", "created_at"];

/// Remove server-managed keys from free-form client fields.
pub fn strip_reserved(fields: &mut Map<String, Value>) {
    for key in RESERVED_KEYS {
        fields.remove(*key);
    }
}

/// Editable book listing fields. Every field is optional so the same type
/// serves as an insert body and a partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Seller identity; the owner field for listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Number or string, whichever the client sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_img: Option<String>,
    /// Anything else the client attached to the listing
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookFields {
    /// Overwrite every field that `update` sets; leave the rest alone.
    pub fn apply(&mut self, update: &BookFields) {
        fn set<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }
        set(&mut self.book_name, &update.book_name);
        set(&mut self.img, &update.img);
        set(&mut self.username, &update.username);
        set(&mut self.email, &update.email);
        set(&mut self.price, &update.price);
        set(&mut self.area, &update.area);
        set(&mut self.description, &update.description);
        set(&mut self.profile_img, &update.profile_img);
        for (key, value) in &update.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    /// Drop client-supplied copies of server-managed keys.
    pub fn strip_reserved(&mut self) {
        strip_reserved(&mut self.extra);
    }
}

/// Book listing as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: BookFields,
    pub created_at: i64,
}

/// Identity fields on a book listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOwner {
    Seller,
}

impl Owned for Book {
    type Field = BookOwner;

    fn owner_identity(&self, field: BookOwner) -> Option<&str> {
        match field {
            BookOwner::Seller => self.fields.email.as_deref(),
        }
    }
}

// ============================================================================
// Order Models
// ============================================================================

/// Order body as posted by a customer.
#[derive(Debug, Deserialize)]
pub struct NewOrder {
    pub customer_email: Option<String>,
    pub provider_email: Option<String>,
    pub status: Option<String>,
    /// Everything else the client attached (book reference, price, dates...)
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Order as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_email: String,
    pub provider_email: String,
    pub status: String,
    pub created_at: i64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Identity fields on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderParty {
    /// The buyer who placed the order
    Customer,
    /// The seller who fulfils it
    Provider,
}

impl Owned for Order {
    type Field = OrderParty;

    fn owner_identity(&self, field: OrderParty) -> Option<&str> {
        match field {
            OrderParty::Customer => Some(&self.customer_email),
            OrderParty::Provider => Some(&self.provider_email),
        }
    }
}

/// Body for `PATCH /orderStatus`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub const DEFAULT_ORDER_STATUS: &str = "pending";

// ============================================================================
// Write Results
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertResult {
    pub fn new(id: String) -> Self {
        Self {
            acknowledged: true,
            inserted_id: id,
        }
    }
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            ..Self::default()
        }
    }

    pub fn upserted(id: String) -> Self {
        Self {
            acknowledged: true,
            upserted_count: 1,
            upserted_id: Some(id),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted: bool) -> Self {
        Self {
            acknowledged: true,
            deleted_count: u64::from(deleted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ownership::Identity;
    use serde_json::json;

    #[test]
    fn test_book_serializes_with_flat_fields() {
        let book = Book {
            id: "abcdefghijkl".to_string(),
            fields: BookFields {
                book_name: Some("Dune".to_string()),
                email: Some("seller@x.com".to_string()),
                price: Some(json!(12.5)),
                ..BookFields::default()
            },
            created_at: 1,
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["_id"], "abcdefghijkl");
        assert_eq!(value["book_name"], "Dune");
        assert_eq!(value["email"], "seller@x.com");
        assert_eq!(value["price"], 12.5);
        assert!(value.get("img").is_none());

        let back: Book = serde_json::from_value(value).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn test_book_fields_apply_keeps_unset() {
        let mut fields = BookFields {
            book_name: Some("Old".to_string()),
            area: Some("Dhaka".to_string()),
            ..BookFields::default()
        };
        fields.apply(&BookFields {
            book_name: Some("New".to_string()),
            price: Some(json!("300")),
            ..BookFields::default()
        });
        assert_eq!(fields.book_name.as_deref(), Some("New"));
        assert_eq!(fields.area.as_deref(), Some("Dhaka"));
        assert_eq!(fields.price, Some(json!("300")));
    }

    #[test]
    fn test_book_keeps_extra_fields() {
        let mut fields: BookFields = serde_json::from_value(json!({
            "book_name": "Dune",
            "email": "seller@x.com",
            "condition": "used",
            "tags": ["sci-fi"],
            "_id": "smuggled",
            "created_at": 0
        }))
        .unwrap();
        assert_eq!(fields.extra["condition"], "used");

        fields.strip_reserved();
        assert!(fields.extra.get("_id").is_none());
        assert!(fields.extra.get("created_at").is_none());

        let book = Book {
            id: "abcdefghijkl".to_string(),
            fields,
            created_at: 7,
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["_id"], "abcdefghijkl");
        assert_eq!(value["created_at"], 7);
        assert_eq!(value["condition"], "used");
        assert_eq!(value["tags"], json!(["sci-fi"]));

        let back: Book = serde_json::from_value(value).unwrap();
        assert_eq!(back, book);
        assert!(back.fields.extra.get("_id").is_none());
    }

    #[test]
    fn test_apply_merges_extra_fields() {
        let mut fields = BookFields::default();
        fields.extra.insert("condition".to_string(), json!("new"));
        fields.extra.insert("edition".to_string(), json!(1));

        let mut update = BookFields::default();
        update.extra.insert("condition".to_string(), json!("used"));
        fields.apply(&update);

        assert_eq!(fields.extra["condition"], "used");
        assert_eq!(fields.extra["edition"], 1);
    }

    #[test]
    fn test_book_owner_is_seller_email() {
        let book = Book {
            id: "abcdefghijkl".to_string(),
            fields: BookFields {
                email: Some("seller@x.com".to_string()),
                ..BookFields::default()
            },
            created_at: 0,
        };
        assert!(Identity::new("seller@x.com")
            .ensure_owns(&book, BookOwner::Seller)
            .is_ok());
        assert!(Identity::new("other@x.com")
            .ensure_owns(&book, BookOwner::Seller)
            .is_err());
    }

    #[test]
    fn test_new_order_keeps_extra_details() {
        let order: NewOrder = serde_json::from_value(json!({
            "customer_email": "buyer@x.com",
            "provider_email": "seller@x.com",
            "book_id": "abcdefghijkl",
            "price": 300
        }))
        .unwrap();
        assert_eq!(order.customer_email.as_deref(), Some("buyer@x.com"));
        assert!(order.status.is_none());
        assert_eq!(order.details["book_id"], "abcdefghijkl");
        assert_eq!(order.details["price"], 300);
    }

    #[test]
    fn test_order_parties() {
        let order = Order {
            id: "abcdefghijkl".to_string(),
            customer_email: "buyer@x.com".to_string(),
            provider_email: "seller@x.com".to_string(),
            status: DEFAULT_ORDER_STATUS.to_string(),
            created_at: 0,
            details: Map::new(),
        };
        let buyer = Identity::new("buyer@x.com");
        assert!(buyer.ensure_owns(&order, OrderParty::Customer).is_ok());
        assert!(buyer.ensure_owns(&order, OrderParty::Provider).is_err());
    }

    #[test]
    fn test_write_results_use_camel_case() {
        let value = serde_json::to_value(UpdateResult::upserted("id".to_string())).unwrap();
        assert_eq!(value["upsertedId"], "id");
        assert_eq!(value["matchedCount"], 0);
        assert_eq!(value["upsertedCount"], 1);

        let value = serde_json::to_value(InsertResult::new("id".to_string())).unwrap();
        assert_eq!(value["insertedId"], "id");

        let value = serde_json::to_value(DeleteResult::new(true)).unwrap();
        assert_eq!(value["deletedCount"], 1);

        let value = serde_json::to_value(CountResponse::from(3)).unwrap();
        assert_eq!(value["count"], "3");
    }
}
