pub mod convergence;
pub mod loader;
pub mod overlays;
pub mod panel;
pub mod strategy;
