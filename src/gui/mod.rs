//! GUI module - User interface components

mod app;
mod chart_view;
mod sidebar;

pub use app::RestoLensApp;
pub use chart_view::ChartView;
pub use sidebar::{Sidebar, SidebarAction};
