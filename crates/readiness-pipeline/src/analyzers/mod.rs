pub mod lines_of_code;
pub mod refactor;
pub mod version_availability;

pub use lines_of_code::LinesOfCodeAnalyzer;
pub use refactor::{RefactorAnalyzer, RefactorTarget};
pub use version_availability::VersionAvailabilityAnalyzer;
