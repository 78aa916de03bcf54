use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use super::errors::FieldError;

pub const NAME_MIN_CHARS: usize = 5;
pub const NAME_MAX_CHARS: usize = 100;
/// Fractional digits carried by every price, subtotal and total.
pub const PRICE_SCALE: i64 = 2;
/// Exclusive upper bound on a price; the column is `NUMERIC(10,2)`.
pub const PRICE_MAX: i64 = 100_000_000;

/// Renders an amount with exactly [`PRICE_SCALE`] fractional digits, zero included.
pub fn format_amount(amount: &BigDecimal) -> String {
    format!("{:.*}", PRICE_SCALE as usize, amount)
}

pub fn serialize_amount<S>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_amount(amount))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "19.99")]
    #[serde(serialize_with = "serialize_amount")]
    pub price: BigDecimal,
    pub category_id: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A product joined with the category it references.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryCreateRequest {
    pub name: String,
    /// URL-safe identifier: lowercase ASCII letters, digits and `-`.
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductCreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal price, at most two fractional digits, e.g. "9.99"
    #[schema(value_type = String, example = "9.99")]
    pub price: BigDecimal,
    pub category_id: i32,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<i32>,
}

/// One page of a product listing. Pages are computed independently, so a
/// listing can always be restarted from page 1.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;
    /// Highest page whose offset fits in an `i64` at any allowed limit.
    pub const MAX_PAGE: i64 = i64::MAX / Self::MAX_LIMIT;

    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.clamp(1, Self::MAX_PAGE),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_LIMIT)
    }
}

fn check_name_length(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    let len = value.chars().count();
    if len < NAME_MIN_CHARS {
        errors.push(FieldError::new(
            field,
            format!("must be at least {NAME_MIN_CHARS} characters"),
        ));
    } else if len > NAME_MAX_CHARS {
        errors.push(FieldError::new(
            field,
            format!("must be at most {NAME_MAX_CHARS} characters"),
        ));
    }
}

fn is_url_safe(slug: &str) -> bool {
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl CategoryCreateRequest {
    /// Returns every violated constraint; empty when the request is valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name_length("name", &self.name, &mut errors);
        check_name_length("slug", &self.slug, &mut errors);
        if !is_url_safe(&self.slug) {
            errors.push(FieldError::new(
                "slug",
                "may only contain lowercase letters, digits and '-'",
            ));
        }
        errors
    }
}

impl ProductCreateRequest {
    /// Checks field-local constraints. Whether `category_id` exists is left to
    /// the catalog, which can see the store.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name_length("name", &self.name, &mut errors);
        if self.price <= BigDecimal::zero() {
            errors.push(FieldError::new("price", "must be greater than 0"));
        } else if self.price >= BigDecimal::from(PRICE_MAX) {
            errors.push(FieldError::new(
                "price",
                format!("must be less than {PRICE_MAX}"),
            ));
        } else if self.price.normalized().as_bigint_and_exponent().1 > PRICE_SCALE {
            errors.push(FieldError::new(
                "price",
                format!("must have at most {PRICE_SCALE} decimal places"),
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product_request(name: &str, price: &str) -> ProductCreateRequest {
        ProductCreateRequest {
            name: name.to_string(),
            description: None,
            price: BigDecimal::from_str(price).expect("valid decimal"),
            category_id: 1,
            image_url: None,
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_category_passes() {
        let req = CategoryCreateRequest {
            name: "Electronics".to_string(),
            slug: "electronics".to_string(),
        };
        assert!(req.validate().is_empty());
    }

    #[test]
    fn short_slug_is_rejected() {
        let req = CategoryCreateRequest {
            name: "Books and more".to_string(),
            slug: "bks".to_string(),
        };
        assert_eq!(fields(&req.validate()), vec!["slug"]);
    }

    #[test]
    fn slug_with_spaces_or_uppercase_is_rejected() {
        let req = CategoryCreateRequest {
            name: "Garden tools".to_string(),
            slug: "Garden Tools".to_string(),
        };
        assert_eq!(fields(&req.validate()), vec!["slug"]);
    }

    #[test]
    fn category_reports_all_violations() {
        let req = CategoryCreateRequest {
            name: "ab".to_string(),
            slug: "x".repeat(101),
        };
        assert_eq!(fields(&req.validate()), vec!["name", "slug"]);
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        // five two-byte characters
        let req = product_request("ééééé", "1.00");
        assert!(req.validate().is_empty());
    }

    #[test]
    fn zero_and_negative_prices_are_rejected() {
        assert_eq!(fields(&product_request("Laptop", "0").validate()), vec!["price"]);
        assert_eq!(
            fields(&product_request("Laptop", "-5.00").validate()),
            vec!["price"]
        );
    }

    #[test]
    fn price_with_too_many_decimals_is_rejected() {
        let errors = product_request("Laptop", "1.999").validate();
        assert_eq!(fields(&errors), vec!["price"]);
        assert!(errors[0].message.contains("decimal places"));
    }

    #[test]
    fn trailing_zeros_do_not_count_as_decimal_places() {
        assert!(product_request("Laptop", "12.5000").validate().is_empty());
    }

    #[test]
    fn price_beyond_column_range_is_rejected() {
        let errors = product_request("Laptop", "123456789012.00").validate();
        assert_eq!(fields(&errors), vec!["price"]);
        assert!(errors[0].message.contains("less than"));
        assert_eq!(fields(&product_request("Laptop", "100000000").validate()), vec!["price"]);
        assert!(product_request("Laptop", "99999999.99").validate().is_empty());
    }

    #[test]
    fn product_reports_name_and_price_together() {
        let errors = product_request("TV", "0.00").validate();
        assert_eq!(fields(&errors), vec!["name", "price"]);
    }

    #[test]
    fn page_request_clamps_bounds() {
        let page = PageRequest::new(0, 1000);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, PageRequest::MAX_LIMIT);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(2, 0).limit, 1);
    }

    #[test]
    fn huge_page_number_does_not_overflow_offset() {
        let page = PageRequest::new(i64::MAX, 20);
        assert_eq!(page.page, PageRequest::MAX_PAGE);
        assert!(page.offset() > 0);
        let widest = PageRequest::new(i64::MAX, PageRequest::MAX_LIMIT);
        assert_eq!(widest.offset(), (PageRequest::MAX_PAGE - 1) * PageRequest::MAX_LIMIT);
    }

    #[test]
    fn amounts_always_show_two_decimals() {
        assert_eq!(format_amount(&BigDecimal::zero()), "0.00");
        assert_eq!(format_amount(&BigDecimal::zero().with_scale(PRICE_SCALE)), "0.00");
        assert_eq!(format_amount(&BigDecimal::from_str("7.5").expect("valid decimal")), "7.50");
        assert_eq!(format_amount(&BigDecimal::from(12)), "12.00");
    }
}
