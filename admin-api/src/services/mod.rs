mod auth_service;
mod billing_service;
mod catalog_service;
mod dashboard_service;
mod user_service;

pub use auth_service::AuthService;
pub use billing_service::{BillingService, ListBillingParams, Payment, Subscription};
pub use catalog_service::{
    CatalogService, Category, CreateCategory, CreateCreator, CreateVideo, Creator,
    ListVideosParams, UpdateCategory, UpdateCreator, UpdateVideo, Video,
};
pub use dashboard_service::DashboardService;
pub use user_service::{ListUsersParams, User, UserService};
