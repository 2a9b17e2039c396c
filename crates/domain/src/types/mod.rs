//! Request payloads and query parameters for the marketplace API
//!
//! Response bodies are left to the caller (`R: DeserializeOwned`); only the
//! shapes the client sends, plus the few responses it has to read itself,
//! live here.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod reviews;
pub mod upload;
pub mod users;

pub use auth::{
    AuthSession, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterData,
    ResetPasswordRequest, Role,
};
pub use cart::{
    AddCartItem, CartItemWithProduct, CartMergeStrategy, CartRecommendation, CartSyncItem,
    CartSyncRequest, CartTotals, CartValidationIssue, CartValidationResult, CartValidationSummary,
    ValidatedCart,
    ConflictResolution, IssueKind, RecommendationKind, UpdateCartItem,
};
pub use catalog::{
    CreateFarmData, CreateProductData, FarmQueryParams, NearbyQuery, ProductFilters,
    ProductQueryParams, SearchQuery, SortOrder, UpdateFarmData, UpdateProductData,
};
pub use notifications::{NotificationPreferences, PushTokenRegistration};
pub use orders::{CreateOrderData, OrderItemInput, OrderQueryParams, UpdateOrderStatus};
pub use payments::{AddPaymentMethod, ConfirmPayment, CreatePaymentIntent};
pub use reviews::{CreateReviewData, UpdateReviewData};
pub use upload::ImageUpload;
pub use users::{AddressData, ChangePassword, UpdateProfileData};

use serde::{Deserialize, Serialize};

/// Reporting window for sales analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesPeriod {
    Day,
    Week,
    Month,
    Year,
}

impl SalesPeriod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}
