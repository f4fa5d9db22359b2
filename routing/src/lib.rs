pub mod plan;
pub mod route;
pub mod table;

pub use plan::{plan_multi_leg, transit_hours, MultiLegPlan};
pub use route::Route;
pub use table::RouteTable;
