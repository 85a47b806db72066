pub mod estimator;
pub mod fit;
pub mod manager;
pub mod traits;

pub use estimator::EstimatorConfig;
pub use fit::FitConfig;
pub use manager::AppConfig;
pub use traits::ConfigSection;
