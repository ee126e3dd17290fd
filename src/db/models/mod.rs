pub mod email_route;
pub mod owner;
pub mod subdomain;

pub use email_route::EmailRouteRecord;
pub use owner::{OwnerRecord, OwnerSummary, SummarySort};
pub use subdomain::SubdomainRecord;
