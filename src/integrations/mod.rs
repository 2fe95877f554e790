// Third-party integrations and the shared item model

pub mod hubspot;
pub mod item;
pub mod search;

pub use hubspot::HubSpotIntegration;
pub use item::IntegrationItem;
pub use search::find_field;
